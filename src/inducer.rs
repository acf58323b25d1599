//! Rule inducer - drives the Induction Learning Algorithm over a
//! labelled training set.

use log::debug;

use crate::{
    error::{Error, Result},
    index::TrainingIndex,
    record::{Label, RecordGroup},
    ruleset::RuleSet
};

/// # Overview
///
/// Learns the filter rules that separate invalid training records from
/// valid ones.
///
/// The algorithm searches general-to-specific: starting from single-field
/// filters, it emits every filter that covers only invalid records,
/// removes the records such a filter explains, and raises the filter
/// arity once no further filter at the current level is safe. A filter is
/// safe to emit exactly when the valid-label index, grown in lock-step,
/// does not contain it.
///
/// Fields known a priori to carry no signal can be excluded; the learned
/// rules are printed by the driver so operators can tune that list.
///
/// # Examples
///
/// ```
/// use ila_rs::{Inducer, RecordGroup};
///
/// let mut training = RecordGroup::new();
/// training.push(vec!["value1".into(), "value2".into(), "true".into()]);
/// training.push(vec!["value1".into(), "value3".into(), "false".into()]);
///
/// let rules = Inducer::new().induce(&training).unwrap();
/// assert_eq!(rules.to_string(), "[1->value3]\n");
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Inducer {
    exclude: Vec<usize>
}

impl Inducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field indices excluded from rule induction. The label
    /// column is always excluded and need not be listed.
    pub fn exclude_fields(mut self, fields: &[usize]) -> Self {
        self.exclude = fields.to_vec();
        self
    }

    /// # Overview
    ///
    /// Runs induction over the training set and returns the learned rule
    /// set.
    ///
    /// The training set must be non-empty, rectangular, at least two
    /// fields wide, and contain both labels in its final field. Fails
    /// with [`Error::ContradictoryTraining`] when a valid and an invalid
    /// record agree on every classify field, since no filter can separate
    /// them.
    pub fn induce(&self, training: &RecordGroup) -> Result<RuleSet> {
        let field_count = training.uniform_field_count()?;
        if field_count < 2 {
            return Err(Error::TooFewFields {
                got: field_count
            });
        }
        let label_field = field_count - 1;

        let mut valid_records = RecordGroup::new();
        let mut invalid_records = RecordGroup::new();
        for record in training {
            match Label::parse(&record[label_field])? {
                Label::Valid => valid_records.push(record.clone()),
                Label::Invalid => invalid_records.push(record.clone())
            }
        }
        if valid_records.is_empty() {
            return Err(Error::MissingLabel(Label::Valid));
        }
        if invalid_records.is_empty() {
            return Err(Error::MissingLabel(Label::Invalid));
        }
        debug!(
            "inducing from {} valid and {} invalid records",
            valid_records.len(),
            invalid_records.len()
        );

        // The label column never contributes to rules
        let mut exclude = self.exclude.clone();
        exclude.push(label_field);

        // Both indexes share the classify fields and grow in lock-step,
        // so membership in the valid index answers "would this filter
        // also select a valid record?" at every arity level
        let mut valid = TrainingIndex::new(valid_records, &exclude)?;
        let mut invalid = TrainingIndex::new(invalid_records, &exclude)?;

        let mut rules = RuleSet::new();
        while !invalid.is_empty() && !invalid.one_filters_all_fields() {
            let mut candidate = invalid.select_largest();
            while let Some(group) = candidate {
                if valid.has_group(&group) {
                    // Also covers a valid record, keep scanning
                    candidate = invalid.select_next_largest();
                } else {
                    debug!("emitting rule {group}");
                    rules.add(group);
                    candidate = invalid.delete_last()?;
                }
            }
            if !invalid.is_empty() && !invalid.one_filters_all_fields() {
                invalid.incr_arity()?;
                valid.incr_arity()?;
                debug!(
                    "raised filter arity to {}, {} records uncovered",
                    invalid.arity(),
                    invalid.record_count()
                );
            }
        }

        // Records left over can only mean a valid and an invalid record
        // with identical classify-field values
        if !invalid.is_empty() {
            return Err(Error::ContradictoryTraining);
        }
        debug!("induction complete, {} rules", rules.len());
        Ok(rules)
    }
}

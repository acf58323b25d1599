//! Record classifier - applies a learned rule set to unlabelled records.

use crate::{
    error::Result,
    record::{Label, RecordGroup},
    ruleset::RuleSet
};

/// # Overview
///
/// Classifies records as valid or invalid with a learned [`RuleSet`].
///
/// The rule set describes invalid coverage, so a record is valid exactly
/// when no rule passes it. A record too short for a rule simply fails
/// that rule; absent fields never make a record invalid on their own.
///
/// # Examples
///
/// ```
/// use ila_rs::{Classifier, Label, RecordGroup};
///
/// let mut training = RecordGroup::new();
/// training.push(vec!["value1".into(), "value2".into(), "true".into()]);
/// training.push(vec!["value1".into(), "value3".into(), "false".into()]);
///
/// let classifier = Classifier::learn(&training, &[]).unwrap();
/// let record = vec!["value5".to_string(), "value3".to_string()];
/// assert_eq!(classifier.classify(&record), Label::Invalid);
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet
}

impl Classifier {
    /// Learns a classifier from a labelled training set, excluding the
    /// given fields from rule induction.
    pub fn learn(training: &RecordGroup, exclude: &[usize]) -> Result<Self> {
        let rules = crate::Inducer::new()
            .exclude_fields(exclude)
            .induce(training)?;
        Ok(Self {
            rules
        })
    }

    /// Wraps an already learned rule set.
    #[must_use]
    pub const fn from_rules(rules: RuleSet) -> Self {
        Self {
            rules
        }
    }

    #[inline]
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Classifies one record: invalid iff any rule passes it.
    #[inline]
    #[must_use]
    pub fn classify(&self, record: &[String]) -> Label {
        if self.rules.passes(record) {
            Label::Invalid
        } else {
            Label::Valid
        }
    }

    /// # Overview
    ///
    /// Classifies every record in place, appending the label literal as a
    /// new final field. Records are neither removed nor reordered.
    pub fn classify_records(&self, records: &mut RecordGroup) {
        for record in records.records_mut() {
            let label = self.classify(record);
            record.push(label.as_str().to_string());
        }
    }
}

impl From<RuleSet> for Classifier {
    fn from(rules: RuleSet) -> Self {
        Self::from_rules(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{group::PredicateGroup, predicate::FieldPredicate, record::Record};

    fn record(values: &[&str]) -> Record {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn classifier() -> Classifier {
        let mut rules = RuleSet::new();
        rules.add(PredicateGroup::from_predicate(FieldPredicate::new(1, "bad")));
        Classifier::from_rules(rules)
    }

    #[test]
    fn invalid_when_a_rule_passes() {
        let c = classifier();
        assert_eq!(c.classify(&record(&["x", "bad"])), Label::Invalid);
        assert_eq!(c.classify(&record(&["x", "good"])), Label::Valid);
    }

    #[test]
    fn short_record_is_valid() {
        // The rule tests field 1; a one-field record cannot match it
        let c = classifier();
        assert_eq!(c.classify(&record(&["x"])), Label::Valid);
    }

    #[test]
    fn classify_records_appends_labels() {
        let c = classifier();
        let mut group = RecordGroup::from_records(vec![
            record(&["x", "bad"]),
            record(&["x", "good"]),
        ]);
        c.classify_records(&mut group);

        assert_eq!(group.records()[0], record(&["x", "bad", "false"]));
        assert_eq!(group.records()[1], record(&["x", "good", "true"]));
    }

    #[test]
    fn learn_and_classify_end_to_end() {
        let training = RecordGroup::from_records(vec![
            record(&["value1", "value2", "true"]),
            record(&["value1", "value3", "false"]),
        ]);
        let c = Classifier::learn(&training, &[]).unwrap();

        assert_eq!(c.classify(&record(&["value1", "value4"])), Label::Valid);
        assert_eq!(c.classify(&record(&["value5", "value3"])), Label::Invalid);
    }
}

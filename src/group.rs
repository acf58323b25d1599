//! Predicate group - a conjunction of field predicates on distinct fields.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    predicate::FieldPredicate
};

/// Inline capacity covers the vast majority of learned rules; groups only
/// spill when a rule needs more than four fields.
type PredicateList = SmallVec<[FieldPredicate; 4]>;

/// # Overview
///
/// A sorted, non-empty conjunction of [`FieldPredicate`]s with at most one
/// predicate per field. A record passes the group iff it passes every
/// member predicate.
///
/// Groups are immutable value types: construction sorts and validates,
/// and extension produces a new group.
///
/// # Examples
///
/// ```
/// use ila_rs::{FieldPredicate, PredicateGroup};
///
/// let group = PredicateGroup::new(vec![
///     FieldPredicate::new(2, "test3"),
///     FieldPredicate::new(0, "test1"),
/// ])
/// .unwrap();
///
/// assert_eq!(group.arity(), 2);
/// assert_eq!(group.last_field(), 2);
/// assert_eq!(group.to_string(), "[0->test1, 2->test3]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PredicateGroup {
    predicates: PredicateList
}

impl PredicateGroup {
    /// Creates a group holding a single predicate.
    #[must_use]
    pub fn from_predicate(predicate: FieldPredicate) -> Self {
        let mut predicates = PredicateList::new();
        predicates.push(predicate);
        Self {
            predicates
        }
    }

    /// # Overview
    ///
    /// Creates a group from a list of predicates. The list must be
    /// non-empty and contain at most one predicate per field; it is
    /// sorted internally.
    pub fn new(predicates: Vec<FieldPredicate>) -> Result<Self> {
        if predicates.is_empty() {
            return Err(Error::EmptyPredicateList);
        }
        let mut predicates = PredicateList::from_vec(predicates);
        predicates.sort();
        // Sorted by field first, so duplicates are adjacent
        for pair in predicates.windows(2) {
            if pair[0].same_field(&pair[1]) {
                return Err(Error::DuplicateField(pair[0].field()));
            }
        }
        Ok(Self {
            predicates
        })
    }

    /// # Overview
    ///
    /// Creates the group that matches the given fields of an existing
    /// record, one predicate per requested field.
    pub fn from_record(record: &[String], fields: &[usize]) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::EmptyPredicateList);
        }
        let predicates = fields
            .iter()
            .map(|&field| FieldPredicate::from_record(record, field))
            .collect::<Result<Vec<_>>>()?;
        Self::new(predicates)
    }

    /// # Overview
    ///
    /// Returns a copy of this group extended with one more predicate. The
    /// new predicate must be on a field the group does not already test.
    pub fn with_predicate(&self, predicate: FieldPredicate) -> Result<Self> {
        let slot = self.predicates.partition_point(|p| *p < predicate);
        if slot > 0 && self.predicates[slot - 1].same_field(&predicate) {
            return Err(Error::DuplicateField(predicate.field()));
        }
        if slot < self.predicates.len() && self.predicates[slot].same_field(&predicate) {
            return Err(Error::DuplicateField(predicate.field()));
        }
        let mut predicates = self.predicates.clone();
        predicates.insert(slot, predicate);
        Ok(Self {
            predicates
        })
    }

    /// Number of predicates in the conjunction.
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.predicates.len()
    }

    /// Highest field index the group tests. Predicates are sorted by
    /// field, so this is the last entry.
    #[inline]
    #[must_use]
    pub fn last_field(&self) -> usize {
        self.predicates[self.predicates.len() - 1].field()
    }

    #[inline]
    #[must_use]
    pub fn predicates(&self) -> &[FieldPredicate] {
        &self.predicates
    }

    /// Returns `true` iff every member predicate passes the record.
    #[inline]
    #[must_use]
    pub fn passes(&self, record: &[String]) -> bool {
        self.predicates.iter().all(|p| p.passes(record))
    }
}

impl fmt::Display for PredicateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{predicate}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Vec<String> {
        vec!["test1".into(), "test2".into(), "test3".into()]
    }

    #[test]
    fn single_predicate_group() {
        let group = PredicateGroup::from_predicate(FieldPredicate::new(1, "test2"));
        assert_eq!(group.arity(), 1);
        assert_eq!(group.last_field(), 1);
    }

    #[test]
    fn new_sorts_predicates() {
        let group = PredicateGroup::new(vec![
            FieldPredicate::new(2, "c"),
            FieldPredicate::new(0, "a"),
        ])
        .unwrap();
        assert_eq!(group.predicates()[0].field(), 0);
        assert_eq!(group.last_field(), 2);
    }

    #[test]
    fn new_rejects_empty_list() {
        assert_eq!(PredicateGroup::new(vec![]), Err(Error::EmptyPredicateList));
    }

    #[test]
    fn new_rejects_duplicate_field() {
        let result = PredicateGroup::new(vec![
            FieldPredicate::new(1, "a"),
            FieldPredicate::new(1, "b"),
        ]);
        assert_eq!(result, Err(Error::DuplicateField(1)));
    }

    #[test]
    fn from_record_derives_values() {
        let group = PredicateGroup::from_record(&record(), &[2, 1]).unwrap();
        assert_eq!(group.arity(), 2);
        assert_eq!(group.to_string(), "[1->test2, 2->test3]");
    }

    #[test]
    fn from_record_rejects_bad_field() {
        assert!(PredicateGroup::from_record(&record(), &[0, 9]).is_err());
    }

    #[test]
    fn with_predicate_extends() {
        let group = PredicateGroup::from_predicate(FieldPredicate::new(1, "test2"));
        let extended = group
            .with_predicate(FieldPredicate::new(0, "test1"))
            .unwrap();
        assert_eq!(extended.arity(), 2);
        assert_eq!(extended.last_field(), 1);
        // Original is untouched
        assert_eq!(group.arity(), 1);
    }

    #[test]
    fn with_predicate_rejects_occupied_field() {
        let group = PredicateGroup::from_record(&record(), &[1, 2]).unwrap();
        let result = group.with_predicate(FieldPredicate::new(1, "other"));
        assert_eq!(result, Err(Error::DuplicateField(1)));
    }

    #[test]
    fn passes_needs_every_predicate() {
        let group = PredicateGroup::from_record(&record(), &[1, 2]).unwrap();
        assert!(group.passes(&record()));

        let mut wrong = record();
        wrong[2] = "other".into();
        assert!(!group.passes(&wrong));
    }

    #[test]
    fn passes_fails_short_record() {
        let group = PredicateGroup::from_record(&record(), &[1, 2]).unwrap();
        let short = vec!["test1".to_string(), "test2".to_string()];
        assert!(!group.passes(&short));
    }

    #[test]
    fn equality_is_value_based() {
        let a = PredicateGroup::from_record(&record(), &[1, 2]).unwrap();
        let b = PredicateGroup::new(vec![
            FieldPredicate::new(2, "test3"),
            FieldPredicate::new(1, "test2"),
        ])
        .unwrap();
        assert_eq!(a, b);
    }
}

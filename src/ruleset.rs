//! Rule set - the learned disjunction of predicate groups.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::group::PredicateGroup;

/// # Overview
///
/// An append-only, insertion-ordered collection of [`PredicateGroup`]s. A
/// record passes the set iff it passes any member group.
///
/// The learned set describes *invalid* coverage: the classifier declares
/// a record valid exactly when the set fails on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleSet {
    groups: Vec<PredicateGroup>
}

impl RuleSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            groups: Vec::new()
        }
    }

    pub fn add(&mut self, group: PredicateGroup) {
        self.groups.push(group);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[PredicateGroup] {
        &self.groups
    }

    pub fn iter(&self) -> core::slice::Iter<'_, PredicateGroup> {
        self.groups.iter()
    }

    /// Returns `true` iff any member group passes the record.
    #[inline]
    #[must_use]
    pub fn passes(&self, record: &[String]) -> bool {
        self.groups.iter().any(|g| g.passes(record))
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type IntoIter = core::slice::Iter<'a, PredicateGroup>;
    type Item = &'a PredicateGroup;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl fmt::Display for RuleSet {
    /// One group per line, in insertion order. This rendering is the
    /// stable surface operators inspect to tune the exclusion list.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            writeln!(f, "{group}")?;
        }
        Ok(())
    }
}

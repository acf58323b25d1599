//! Records, record groups, and the binary classification label.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An ordered sequence of string fields. All records in one dataset share
/// the same field count; training records carry their label in the final
/// field.
pub type Record = Vec<String>;

/// # Overview
///
/// Binary verdict on a record. The wire literals `"true"` / `"false"`
/// exist only at the boundary; everything inside the learner uses this
/// tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Label {
    Valid,
    Invalid
}

impl Label {
    /// # Overview
    ///
    /// Parses a label field. Anything but the exact literals `"true"` and
    /// `"false"` is an input error.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "true" => Ok(Self::Valid),
            "false" => Ok(Self::Invalid),
            other => Err(Error::BadLabel(other.to_string()))
        }
    }

    /// Returns the wire literal written to classified output.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "true",
            Self::Invalid => "false"
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid")
        }
    }
}

/// # Overview
///
/// An owned group of records, the unit of exchange at the crate boundary.
///
/// # Examples
///
/// ```
/// use ila_rs::RecordGroup;
///
/// let mut group = RecordGroup::new();
/// group.push(vec!["a".into(), "b".into()]);
/// assert_eq!(group.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordGroup {
    records: Vec<Record>
}

impl RecordGroup {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new()
        }
    }

    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access to the records, for in-place classification.
    #[inline]
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// # Overview
    ///
    /// Returns the shared field count of the records, failing on an empty
    /// group or on records of differing lengths.
    pub fn uniform_field_count(&self) -> Result<usize> {
        let first = self.records.first().ok_or(Error::EmptyDataset)?;
        let expected = first.len();
        for record in &self.records {
            if record.len() != expected {
                return Err(Error::RaggedDataset {
                    expected,
                    got: record.len()
                });
            }
        }
        Ok(expected)
    }
}

impl<'a> IntoIterator for &'a RecordGroup {
    type IntoIter = core::slice::Iter<'a, Record>;
    type Item = &'a Record;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

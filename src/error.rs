//! Error types for rule induction and the record boundary.

use core::fmt;

use crate::record::Label;

/// # Overview
///
/// Errors that can occur while reading records, learning rules, or
/// applying the boundary utilities.
///
/// Input problems, contradictory training data, and I/O failures are
/// caller errors; `InvariantViolation` signals that the dual filter index
/// drifted out of sync, which is a bug and leaves the index unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    EmptyDataset,
    RaggedDataset { expected: usize, got: usize },
    NoFields,
    TooFewFields { got: usize },
    AllFieldsExcluded,
    FieldOutOfRange { field: usize, len: usize },
    DuplicateField(usize),
    EmptyPredicateList,
    MissingLabel(Label),
    BadLabel(String),
    BadIgnoreFields(String),
    SliceBounds,
    SliceOutOfRange { lines: usize },
    RecordCountMismatch,
    RecordBodyMismatch { line: usize },
    MissingSeparator { line: usize },
    ContradictoryTraining,
    InvariantViolation(&'static str),
    Read { path: String, message: String },
    Write { path: String, message: String }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDataset => write!(f, "dataset contains no records"),
            Self::RaggedDataset {
                expected,
                got
            } => {
                write!(
                    f,
                    "records have inconsistent field counts: expected {expected}, got {got}"
                )
            }
            Self::NoFields => write!(f, "records have no fields"),
            Self::TooFewFields {
                got
            } => {
                write!(
                    f,
                    "training records need a label and at least one data field, got {got} fields"
                )
            }
            Self::AllFieldsExcluded => {
                write!(f, "exclusion list removes every classifiable field")
            }
            Self::FieldOutOfRange {
                field,
                len
            } => {
                write!(f, "field {field} out of range for record with {len} fields")
            }
            Self::DuplicateField(field) => {
                write!(f, "filter group has two predicates for field {field}")
            }
            Self::EmptyPredicateList => write!(f, "predicate list is empty"),
            Self::MissingLabel(label) => {
                write!(f, "training set has no {label} examples")
            }
            Self::BadLabel(value) => {
                write!(f, "label field must be \"true\" or \"false\", got \"{value}\"")
            }
            Self::BadIgnoreFields(arg) => {
                write!(f, "cannot parse ignore-fields list \"{arg}\"")
            }
            Self::SliceBounds => {
                write!(f, "first slice line and line count must be positive")
            }
            Self::SliceOutOfRange {
                lines
            } => {
                write!(f, "input file has only {lines} lines, not sliced")
            }
            Self::RecordCountMismatch => {
                write!(f, "baseline and result files have unequal record counts")
            }
            Self::RecordBodyMismatch {
                line
            } => {
                write!(f, "records in baseline and result files differ at line {line}")
            }
            Self::MissingSeparator {
                line
            } => {
                write!(f, "record at line {line} has no field separator")
            }
            Self::ContradictoryTraining => {
                write!(
                    f,
                    "training data is contradictory: a valid and an invalid record share every classify-field value"
                )
            }
            Self::InvariantViolation(detail) => {
                write!(f, "filter index consistency violated: {detail}")
            }
            Self::Read {
                path,
                message
            } => write!(f, "cannot read {path}: {message}"),
            Self::Write {
                path,
                message
            } => write!(f, "cannot write {path}: {message}")
        }
    }
}

impl std::error::Error for Error {}

/// # Overview
///
/// Result type for all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

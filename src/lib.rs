//! # ILA record classifier
//!
//! Learns categorical filter rules from a labelled training set with the
//! Induction Learning Algorithm, then classifies unlabelled records with
//! them.
//!
//! Records are ordered sequences of opaque string fields; labels are
//! binary. The learned classifier is a set of conjunctive filters: a
//! record is invalid iff any filter matches it. The learner prefers the
//! most general filters (fewest fields) that select only invalid
//! training records, making them specific one field at a time until
//! every invalid record is explained.
//!
//! # Features
//!
//! - `serde`: Serialization support for the rule types
//! - `parallel`: Parallel selection scan via rayon
//!
//! # Examples
//!
//! ```
//! use ila_rs::{Classifier, Label, RecordGroup};
//!
//! let mut training = RecordGroup::new();
//! training.push(vec!["value1".into(), "value2".into(), "true".into()]);
//! training.push(vec!["value1".into(), "value3".into(), "false".into()]);
//!
//! let classifier = Classifier::learn(&training, &[]).unwrap();
//!
//! let record = vec!["value1".to_string(), "value4".to_string()];
//! assert_eq!(classifier.classify(&record), Label::Valid);
//! ```

mod classifier;
mod group;
mod index;
mod inducer;
mod predicate;
mod record;
mod ruleset;

pub mod csv;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod utils;

pub use classifier::Classifier;
pub use error::{Error, Result};
pub use group::PredicateGroup;
pub use index::TrainingIndex;
pub use inducer::Inducer;
pub use predicate::FieldPredicate;
pub use record::{Label, Record, RecordGroup};
pub use ruleset::RuleSet;

//! Synthetic record generation: field sources produce values, validity
//! rules label the finished record.

use log::trace;
use rand::Rng;

use crate::{
    error::{Error, Result},
    record::{Label, Record, RecordGroup},
    utils::FastRng
};

/// Produces the value of one field, one record at a time. Sources are
/// listed in field order when building a generator.
pub trait FieldSource {
    fn next_value(&mut self, rng: &mut FastRng) -> String;
}

/// # Overview
///
/// Chooses uniformly from a fixed pool of values. Inserting a value twice
/// doubles its probability; an empty pool yields the empty string.
#[derive(Debug, Clone, Default)]
pub struct ValuePool {
    values: Vec<String>
}

impl ValuePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<String>) -> &mut Self {
        self.values.push(value.into());
        self
    }
}

impl FieldSource for ValuePool {
    fn next_value(&mut self, rng: &mut FastRng) -> String {
        if self.values.is_empty() {
            String::new()
        } else {
            self.values[rng.random_range(0..self.values.len())].clone()
        }
    }
}

/// # Overview
///
/// Chooses from a pool of values with given weights. Weights need not
/// sum to one; they are normalised lazily and the cumulative form is
/// cached between draws. Non-positive weights are ignored on insert.
#[derive(Debug, Clone, Default)]
pub struct WeightedPool {
    values:     Vec<String>,
    weights:    Vec<f64>,
    cumulative: Option<Vec<f64>>
}

impl WeightedPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<String>, weight: f64) -> &mut Self {
        if weight > 0.0 {
            self.values.push(value.into());
            self.weights.push(weight);
            self.cumulative = None;
        }
        self
    }

    fn cumulative(&mut self) -> &[f64] {
        if self.cumulative.is_none() {
            let total: f64 = self.weights.iter().sum();
            let mut so_far = 0.0;
            let cumulative = self
                .weights
                .iter()
                .map(|w| {
                    so_far += w;
                    so_far / total
                })
                .collect();
            self.cumulative = Some(cumulative);
        }
        self.cumulative.as_deref().unwrap_or(&[])
    }
}

impl FieldSource for WeightedPool {
    fn next_value(&mut self, rng: &mut FastRng) -> String {
        if self.values.is_empty() {
            return String::new();
        }
        let draw = rng.random::<f64>();
        let slot = self.cumulative().partition_point(|&p| p < draw);
        self.values[slot.min(self.values.len() - 1)].clone()
    }
}

/// Emits an increasing integer sequence from a starting value. Distinct
/// counters do not coordinate, so two of them will repeat values.
#[derive(Debug, Clone)]
pub struct Counter {
    next: i64
}

impl Counter {
    #[must_use]
    pub const fn new(start: i64) -> Self {
        Self {
            next: start
        }
    }
}

impl FieldSource for Counter {
    fn next_value(&mut self, _rng: &mut FastRng) -> String {
        let value = self.next;
        self.next += 1;
        value.to_string()
    }
}

/// Emits a uniform integer from an inclusive range.
#[derive(Debug, Clone)]
pub struct NumericRange {
    low:  i64,
    high: i64
}

impl NumericRange {
    /// Bounds may be given in either order.
    #[must_use]
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            low:  a.min(b),
            high: a.max(b)
        }
    }
}

impl FieldSource for NumericRange {
    fn next_value(&mut self, rng: &mut FastRng) -> String {
        rng.random_range(self.low..=self.high).to_string()
    }
}

/// Flags a generated record as invalid. Rules are applied in order and
/// the first rejection wins.
pub trait ValidityRule {
    /// Returns `true` if the record is NOT valid.
    fn rejects(&self, record: &[String]) -> bool;
}

/// # Overview
///
/// Tests one field against a value list that is either required or
/// prohibited. A record without the field is always rejected.
#[derive(Debug, Clone)]
pub struct ValueRule {
    field:      usize,
    values:     Vec<String>,
    prohibited: bool
}

impl ValueRule {
    #[must_use]
    pub fn new(field: usize, prohibited: bool) -> Self {
        Self {
            field,
            values: Vec::new(),
            prohibited
        }
    }

    pub fn push(&mut self, value: impl Into<String>) -> &mut Self {
        self.values.push(value.into());
        self
    }
}

impl ValidityRule for ValueRule {
    fn rejects(&self, record: &[String]) -> bool {
        let Some(value) = record.get(self.field) else {
            return true;
        };
        let listed = self.values.contains(value);
        // Prohibited and listed, or required and absent
        listed == self.prohibited
    }
}

/// # Overview
///
/// Conditional version of [`ValueRule`]: when two guard fields carry
/// their guard values, a third field is tested against a required or
/// prohibited list. Records missing any referenced field are rejected.
#[derive(Debug, Clone)]
pub struct ComboRule {
    first:      (usize, String),
    second:     (usize, String),
    test_field: usize,
    values:     Vec<String>,
    prohibited: bool
}

impl ComboRule {
    /// The guard fields and the tested field must be three distinct
    /// fields.
    pub fn new(
        first_field: usize,
        first_value: impl Into<String>,
        second_field: usize,
        second_value: impl Into<String>,
        test_field: usize,
        prohibited: bool
    ) -> Result<Self> {
        if first_field == second_field {
            return Err(Error::DuplicateField(first_field));
        }
        if first_field == test_field || second_field == test_field {
            return Err(Error::DuplicateField(test_field));
        }
        Ok(Self {
            first: (first_field, first_value.into()),
            second: (second_field, second_value.into()),
            test_field,
            values: Vec::new(),
            prohibited
        })
    }

    pub fn push(&mut self, value: impl Into<String>) -> &mut Self {
        self.values.push(value.into());
        self
    }
}

impl ValidityRule for ComboRule {
    fn rejects(&self, record: &[String]) -> bool {
        let fields = (
            record.get(self.first.0),
            record.get(self.second.0),
            record.get(self.test_field)
        );
        let (Some(first), Some(second), Some(tested)) = fields else {
            return true;
        };
        if *first != self.first.1 || *second != self.second.1 {
            return false; // Guards not met, rule does not apply
        }
        let listed = self.values.contains(tested);
        listed == self.prohibited
    }
}

/// Requires a field to parse as a positive integer.
#[derive(Debug, Clone)]
pub struct PositiveNumericRule {
    field: usize
}

impl PositiveNumericRule {
    #[must_use]
    pub const fn new(field: usize) -> Self {
        Self {
            field
        }
    }
}

impl ValidityRule for PositiveNumericRule {
    fn rejects(&self, record: &[String]) -> bool {
        record
            .get(self.field)
            .and_then(|value| value.parse::<i64>().ok())
            .map_or(true, |value| value <= 0)
    }
}

/// # Overview
///
/// Generates labelled records: field sources produce the values in
/// order, validity rules decide the label appended as the final field.
///
/// An empty rule list makes every record valid; at least one field
/// source is required.
pub struct RecordGenerator {
    sources: Vec<Box<dyn FieldSource>>,
    rules:   Vec<Box<dyn ValidityRule>>
}

impl std::fmt::Debug for RecordGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordGenerator")
            .field("sources", &self.sources.len())
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl RecordGenerator {
    pub fn new(
        sources: Vec<Box<dyn FieldSource>>,
        rules: Vec<Box<dyn ValidityRule>>
    ) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::NoFields);
        }
        Ok(Self {
            sources,
            rules
        })
    }

    /// # Overview
    ///
    /// Generates `count` labelled records. A record is valid until the
    /// first rule rejects it.
    pub fn generate(&mut self, count: usize, rng: &mut FastRng) -> RecordGroup {
        let mut records = RecordGroup::new();
        for number in 0..count {
            let mut record: Record = self
                .sources
                .iter_mut()
                .map(|source| source.next_value(rng))
                .collect();

            let failed = self.rules.iter().position(|rule| rule.rejects(&record));
            if let Some(rule) = failed {
                trace!("record {number} rejected by rule {rule}: {record:?}");
            }
            let label = if failed.is_some() {
                Label::Invalid
            } else {
                Label::Valid
            };
            record.push(label.as_str().to_string());
            records.push(record);
        }
        records
    }
}

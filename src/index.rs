//! Training index - the dual filter/record index driving rule discovery.

use std::{
    collections::{HashMap, HashSet},
    hash::BuildHasherDefault
};

use seahash::SeaHasher;

use crate::{
    error::{Error, Result},
    group::PredicateGroup,
    predicate::FieldPredicate,
    record::{Record, RecordGroup}
};

/// Dense id into the index's record arena. Records are stored once and
/// never move, so both maps refer to them by id.
type RecordId = usize;

/// Fixed-seed hasher so map iteration order is a pure function of the
/// insertion sequence, making selection and emitted rule order
/// reproducible run-to-run.
type FixedState = BuildHasherDefault<SeaHasher>;

type ForwardMap = HashMap<PredicateGroup, Vec<RecordId>, FixedState>;
type ReverseIndex = Vec<Option<Vec<PredicateGroup>>>;

/// # Overview
///
/// Training records for one label class, indexed both ways: filter group
/// to the records it covers, and record to the groups covering it.
///
/// Every group in the index has the same arity at any moment. The index
/// is driven through a fixed protocol: select the group covering the most
/// records (`select_largest` / `select_next_largest`), delete the
/// selection together with its records (`delete_last`), and raise the
/// arity of every group in lock-step (`incr_arity`) once no further
/// selection succeeds. Processing stops when the index is empty or the
/// groups cannot become more specific.
///
/// An [`Error::InvariantViolation`] from any operation means the two maps
/// drifted apart; the index is unusable afterwards and no recovery is
/// attempted.
#[derive(Debug, Clone)]
pub struct TrainingIndex {
    records:         Vec<Record>,
    forward:         ForwardMap,
    reverse:         ReverseIndex,
    ignored:         HashSet<PredicateGroup, FixedState>,
    cursor:          Option<PredicateGroup>,
    classify_fields: Vec<usize>,
    arity:           usize
}

impl TrainingIndex {
    /// # Overview
    ///
    /// Builds the arity-1 index over a group of records: one
    /// single-predicate group per record per classify field.
    ///
    /// `exclude` lists field indices to leave out of rule induction; the
    /// caller is responsible for excluding the label column. Rejects an
    /// empty or ragged record group, records with no fields, and an
    /// exclusion list that removes every field.
    pub fn new(records: RecordGroup, exclude: &[usize]) -> Result<Self> {
        let field_count = records.uniform_field_count()?;
        if field_count == 0 {
            return Err(Error::NoFields);
        }
        let classify_fields: Vec<usize> =
            (0..field_count).filter(|f| !exclude.contains(f)).collect();
        if classify_fields.is_empty() {
            return Err(Error::AllFieldsExcluded);
        }

        let records = records.into_records();
        // Distinct single-field groups are bounded by records x fields;
        // values repeat, so half is a workable starting capacity
        let capacity = records.len() * classify_fields.len() / 2 + 1;
        let mut forward = ForwardMap::with_capacity_and_hasher(capacity, FixedState::default());
        let mut reverse: ReverseIndex = vec![None; records.len()];

        for (id, record) in records.iter().enumerate() {
            for &field in &classify_fields {
                let group =
                    PredicateGroup::from_predicate(FieldPredicate::from_record(record, field)?);
                Self::link(&mut forward, &mut reverse, group, id);
            }
        }

        Ok(Self {
            records,
            forward,
            reverse,
            ignored: HashSet::with_hasher(FixedState::default()),
            cursor: None,
            classify_fields,
            arity: 1
        })
    }

    /// Inserts one (group, record) pair into both maps.
    fn link(forward: &mut ForwardMap, reverse: &mut ReverseIndex, group: PredicateGroup, id: RecordId) {
        reverse[id].get_or_insert_with(Vec::new).push(group.clone());
        forward.entry(group).or_default().push(id);
    }

    /// True iff no filter groups, and therefore no records, remain.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Number of filter groups currently in the index.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Number of records still covered by some group.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.reverse.iter().filter(|entry| entry.is_some()).count()
    }

    #[inline]
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    #[must_use]
    pub fn classify_fields(&self) -> &[usize] {
        &self.classify_fields
    }

    /// # Overview
    ///
    /// True iff the groups cannot become more specific: a further
    /// [`incr_arity`](Self::incr_arity) would need more fields than the
    /// classify set has.
    ///
    /// While this is false, every group can still grow. A group may
    /// already end on the last classify field, but the way groups are
    /// generated guarantees a sibling on earlier fields also covers its
    /// records unless the group tests every classify field.
    #[inline]
    #[must_use]
    pub fn one_filters_all_fields(&self) -> bool {
        self.arity >= self.classify_fields.len()
    }

    /// Returns whether the exact group is a key of the index. This is
    /// how the inducer asks "does this filter also select records of the
    /// other label?".
    #[inline]
    #[must_use]
    pub fn has_group(&self, group: &PredicateGroup) -> bool {
        self.forward.contains_key(group)
    }

    /// # Overview
    ///
    /// Starts a selection pass: clears the ignore set and returns the
    /// group covering the most records, or `None` on an empty index.
    pub fn select_largest(&mut self) -> Option<PredicateGroup> {
        self.ignored.clear();
        self.cursor = None;
        self.select_next_largest()
    }

    /// # Overview
    ///
    /// Moves the previous selection to the ignore set and returns the
    /// largest group not yet ignored, or `None` when every remaining
    /// group has been returned already.
    ///
    /// Ties go to the first maximum the scan encounters; callers needing
    /// a stricter order must impose their own tie-break.
    pub fn select_next_largest(&mut self) -> Option<PredicateGroup> {
        if let Some(last) = self.cursor.take() {
            self.ignored.insert(last);
        }
        if self.forward.is_empty() || self.ignored.len() == self.forward.len() {
            return None;
        }
        self.cursor = self.scan_largest();
        self.cursor.clone()
    }

    /// Linear scan for the non-ignored group with the most records.
    ///
    /// A scan per selection beats a priority heap here: every deletion
    /// touches all groups covering any record of the deleted group, which
    /// would reorganise a heap once per touched group, while the scan
    /// costs one pass over the forward map per selection.
    #[cfg(not(feature = "parallel"))]
    fn scan_largest(&self) -> Option<PredicateGroup> {
        let mut best: Option<(&PredicateGroup, usize)> = None;
        for (group, ids) in &self.forward {
            if self.ignored.contains(group) {
                continue;
            }
            // Strict comparison keeps the first maximum encountered
            if best.map_or(true, |(_, count)| ids.len() > count) {
                best = Some((group, ids.len()));
            }
        }
        best.map(|(group, _)| group.clone())
    }

    /// Parallel scan over the forward map. Scan order is not available
    /// as a tie-break here, so ties go to the smallest group.
    #[cfg(feature = "parallel")]
    fn scan_largest(&self) -> Option<PredicateGroup> {
        use rayon::prelude::*;

        self.forward
            .par_iter()
            .filter(|(group, _)| !self.ignored.contains(*group))
            .max_by(|a, b| a.1.len().cmp(&b.1.len()).then_with(|| b.0.cmp(a.0)))
            .map(|(group, _)| group.clone())
    }

    /// # Overview
    ///
    /// Deletes the last selected group and every record it covers, then
    /// returns the next largest group so callers can drive the discovery
    /// loop with a single call.
    ///
    /// Removing a record detaches it from every other group covering it;
    /// groups left with no records disappear entirely. Returns `None`
    /// without effect when nothing is selected.
    pub fn delete_last(&mut self) -> Result<Option<PredicateGroup>> {
        let Some(group) = self.cursor.take() else {
            return Ok(None);
        };
        let covered = self.forward.remove(&group).ok_or(Error::InvariantViolation(
            "selected group missing from forward index"
        ))?;
        // The selection was never on the ignore set, nothing to clear there
        for id in covered {
            let covering = self.reverse[id].take().ok_or(Error::InvariantViolation(
                "covered record missing from reverse index"
            ))?;
            for other in covering {
                if other == group {
                    continue; // Removed above
                }
                let remaining = self.forward.get_mut(&other).ok_or(Error::InvariantViolation(
                    "covering group missing from forward index"
                ))?;
                if remaining.len() > 1 {
                    remaining.retain(|&r| r != id);
                } else {
                    self.forward.remove(&other);
                    self.ignored.remove(&other);
                }
            }
        }
        Ok(self.select_next_largest())
    }

    /// # Overview
    ///
    /// Rebuilds the index one arity level up: every group is replaced by
    /// all one-larger super-groups reachable by adding a predicate on a
    /// higher classify field taken from a record it covers.
    ///
    /// Covered records are preserved exactly; a group that already tests
    /// the last classify field contributes no descendants unless it tests
    /// *every* classify field, in which case extending would drop its
    /// records from the index and the operation fails. On any failure the
    /// index is left observably unchanged.
    pub fn incr_arity(&mut self) -> Result<()> {
        let last_classify = self.classify_fields[self.classify_fields.len() - 1];
        // Each group fans out into at most one descendant per remaining field
        let fan_out = self.classify_fields.len().saturating_sub(self.arity);
        let capacity = self.forward.len() * fan_out + 1;
        let mut forward = ForwardMap::with_capacity_and_hasher(capacity, FixedState::default());
        let mut reverse: ReverseIndex = vec![None; self.records.len()];

        for (group, ids) in &self.forward {
            if group.last_field() < last_classify {
                for &id in ids {
                    for extended in self.extend_group(group, &self.records[id])? {
                        Self::link(&mut forward, &mut reverse, extended, id);
                    }
                }
            } else if group.arity() == self.classify_fields.len() {
                return Err(Error::InvariantViolation(
                    "specificity increase would drop a training record"
                ));
            }
            // A group ending on the last classify field without testing
            // every classify field has no descendants; its records stay
            // reachable through sibling groups on earlier fields
        }

        if forward.is_empty() {
            return Err(Error::InvariantViolation(
                "specificity increase produced no filter groups"
            ));
        }

        self.forward = forward;
        self.reverse = reverse;
        self.ignored.clear();
        self.cursor = None;
        self.arity += 1;
        Ok(())
    }

    /// All one-larger super-groups of `group` derived from `record`, one
    /// per classify field above the group's last field.
    fn extend_group(&self, group: &PredicateGroup, record: &[String]) -> Result<Vec<PredicateGroup>> {
        if !group.passes(record) {
            return Err(Error::InvariantViolation(
                "extending a group that does not pass its record"
            ));
        }
        let first = self
            .classify_fields
            .partition_point(|&f| f <= group.last_field());
        if first == self.classify_fields.len() {
            return Err(Error::InvariantViolation(
                "no classify fields left to extend the group"
            ));
        }
        self.classify_fields[first..]
            .iter()
            .map(|&field| group.with_predicate(FieldPredicate::from_record(record, field)?))
            .collect()
    }

    /// # Overview
    ///
    /// Debugging aid: verifies the dual-index invariants. Checks that
    /// forward and reverse entries mirror each other, that every indexed
    /// group passes its records, has the index arity, and tests only
    /// classify fields, and that the ignore set and cursor name live
    /// groups.
    pub fn check_consistency(&self) -> Result<()> {
        for (group, ids) in &self.forward {
            if ids.is_empty() {
                return Err(Error::InvariantViolation("forward entry with no records"));
            }
            if group.arity() != self.arity {
                return Err(Error::InvariantViolation(
                    "group arity differs from index arity"
                ));
            }
            if !group
                .predicates()
                .iter()
                .all(|p| self.classify_fields.binary_search(&p.field()).is_ok())
            {
                return Err(Error::InvariantViolation(
                    "group tests a field outside the classify fields"
                ));
            }
            for &id in ids {
                let record = self.records.get(id).ok_or(Error::InvariantViolation(
                    "record id out of range"
                ))?;
                if !group.passes(record) {
                    return Err(Error::InvariantViolation(
                        "group does not pass an indexed record"
                    ));
                }
                let covering = self
                    .reverse
                    .get(id)
                    .and_then(Option::as_ref)
                    .ok_or(Error::InvariantViolation(
                        "covered record missing from reverse index"
                    ))?;
                if !covering.contains(group) {
                    return Err(Error::InvariantViolation(
                        "forward entry missing from record's reverse list"
                    ));
                }
            }
        }
        for (id, covering) in self.reverse.iter().enumerate() {
            let Some(covering) = covering else {
                continue;
            };
            for group in covering {
                let ids = self.forward.get(group).ok_or(Error::InvariantViolation(
                    "reverse entry names a group missing from the forward index"
                ))?;
                if !ids.contains(&id) {
                    return Err(Error::InvariantViolation(
                        "reverse entry not mirrored in the forward index"
                    ));
                }
            }
        }
        for group in &self.ignored {
            if !self.forward.contains_key(group) {
                return Err(Error::InvariantViolation(
                    "ignore set names a group missing from the forward index"
                ));
            }
        }
        if let Some(cursor) = &self.cursor {
            if !self.forward.contains_key(cursor) {
                return Err(Error::InvariantViolation(
                    "cursor names a group missing from the forward index"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: &[&str]) -> Record {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    /// Fields cover a unique value, repeated values, and a value shared
    /// across fields; `1->test6` covers strictly more records than any
    /// other single-field group.
    fn test_group() -> RecordGroup {
        RecordGroup::from_records(vec![
            record(&["test1", "test2", "test3", "test4"]),
            record(&["test1", "test6", "test1", "test8"]),
            record(&["test5", "test6", "test3", "test4"]),
            record(&["test5", "test6", "test1", "test9"]),
            record(&["test9", "test7", "test5", "test2"]),
        ])
    }

    fn single(field: usize, value: &str) -> PredicateGroup {
        PredicateGroup::from_predicate(FieldPredicate::new(field, value))
    }

    #[test]
    fn new_rejects_empty_group() {
        assert_eq!(
            TrainingIndex::new(RecordGroup::new(), &[]).unwrap_err(),
            Error::EmptyDataset
        );
    }

    #[test]
    fn new_rejects_ragged_records() {
        let group = RecordGroup::from_records(vec![
            record(&["a", "b"]),
            record(&["c"]),
        ]);
        assert!(matches!(
            TrainingIndex::new(group, &[]).unwrap_err(),
            Error::RaggedDataset { .. }
        ));
    }

    #[test]
    fn new_rejects_total_exclusion() {
        assert_eq!(
            TrainingIndex::new(test_group(), &[0, 1, 2, 3]).unwrap_err(),
            Error::AllFieldsExcluded
        );
    }

    #[test]
    fn new_builds_single_field_groups() {
        let index = TrainingIndex::new(test_group(), &[]).unwrap();
        assert_eq!(index.arity(), 1);
        assert!(!index.is_empty());
        assert!(index.has_group(&single(1, "test6")));
        assert!(index.has_group(&single(2, "test1")));
        assert!(!index.has_group(&single(1, "missing")));
        index.check_consistency().unwrap();
    }

    #[test]
    fn exclusion_narrows_classify_fields() {
        let index = TrainingIndex::new(test_group(), &[1, 3]).unwrap();
        assert_eq!(index.classify_fields(), &[0, 2]);
        assert!(!index.has_group(&single(1, "test6")));
        assert!(index.has_group(&single(0, "test5")));
    }

    #[test]
    fn select_largest_returns_widest_cover() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        // 1->test6 covers three records, more than any other group
        let selected = index.select_largest().unwrap();
        assert_eq!(selected, single(1, "test6"));
    }

    #[test]
    fn selection_pass_visits_every_group_once() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        let total = index.len();
        let mut seen = Vec::new();
        let mut next = index.select_largest();
        while let Some(group) = next {
            seen.push(group);
            next = index.select_next_largest();
        }
        assert_eq!(seen.len(), total);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn selection_sizes_never_increase() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        let data = test_group();
        let mut last = usize::MAX;
        let mut next = index.select_largest();
        while let Some(group) = next {
            let size = data.iter().filter(|r| group.passes(r)).count();
            assert!(size <= last);
            last = size;
            next = index.select_next_largest();
        }
    }

    #[test]
    fn delete_last_removes_covered_records() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        let selected = index.select_largest().unwrap();
        assert_eq!(selected, single(1, "test6"));
        assert_eq!(index.record_count(), 5);

        index.delete_last().unwrap();
        index.check_consistency().unwrap();
        // The three covered records left with them every group that only
        // they supported
        assert_eq!(index.record_count(), 2);
        assert!(!index.has_group(&single(1, "test6")));
        assert!(!index.has_group(&single(3, "test8")));
        // Groups shared with surviving records remain
        assert!(index.has_group(&single(2, "test3")));
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        assert_eq!(index.delete_last().unwrap(), None);
        assert_eq!(index.record_count(), 5);
    }

    #[test]
    fn deleting_everything_empties_the_index() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        index.select_largest().unwrap();
        while index.delete_last().unwrap().is_some() {}
        assert!(index.is_empty());
        assert_eq!(index.record_count(), 0);
        index.check_consistency().unwrap();
    }

    #[test]
    fn incr_arity_replaces_groups_with_supergroups() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        index.incr_arity().unwrap();
        index.check_consistency().unwrap();

        assert_eq!(index.arity(), 2);
        assert!(!index.has_group(&single(1, "test6")));
        let pair = single(1, "test6")
            .with_predicate(FieldPredicate::new(2, "test1"))
            .unwrap();
        assert!(index.has_group(&pair));
        // Records survive the rebuild
        assert_eq!(index.record_count(), 5);
    }

    #[test]
    fn incr_arity_to_limit_then_refuses() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        for _ in 1..4 {
            index.incr_arity().unwrap();
        }
        assert_eq!(index.arity(), 4);
        assert!(index.one_filters_all_fields());

        // Every group now tests every classify field; extending further
        // must fail and leave the index unchanged
        let before = index.len();
        assert!(matches!(
            index.incr_arity().unwrap_err(),
            Error::InvariantViolation(_)
        ));
        assert_eq!(index.arity(), 4);
        assert_eq!(index.len(), before);
        index.check_consistency().unwrap();
    }

    #[test]
    fn selection_resets_after_incr_arity() {
        let mut index = TrainingIndex::new(test_group(), &[]).unwrap();
        index.select_largest().unwrap();
        index.select_next_largest().unwrap();
        index.incr_arity().unwrap();
        // Fresh pass over the rebuilt groups
        let total = index.len();
        let mut count = 0;
        let mut next = index.select_largest();
        while next.is_some() {
            count += 1;
            next = index.select_next_largest();
        }
        assert_eq!(count, total);
    }

    #[test]
    fn identical_inputs_select_identically() {
        let mut a = TrainingIndex::new(test_group(), &[]).unwrap();
        let mut b = TrainingIndex::new(test_group(), &[]).unwrap();
        let mut next_a = a.select_largest();
        let mut next_b = b.select_largest();
        while next_a.is_some() || next_b.is_some() {
            assert_eq!(next_a, next_b);
            next_a = a.select_next_largest();
            next_b = b.select_next_largest();
        }
    }
}

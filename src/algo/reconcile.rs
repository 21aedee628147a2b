//! Sequence Reconciler
//!
//! Computes the structural operations that turn an `old` list into a `new`
//! list, comparing elements by value equality only.
//!
//! # Passes
//!
//! ```text
//! classify(old, new)            -> removed / added flags
//! old  scan  -> Deletion(old_idx)            ascending old index
//! new  scan  -> Insertion(new_idx)           ascending new index
//! old  walk  -> Move(old_idx, new_idx) | Update(new_idx)
//! ```
//!
//! # Move vs Update
//!
//! While walking `old`, `delta` counts removed elements skipped so far. For a
//! surviving element matched at `new_idx`, every added element in
//! `new[..new_idx]` takes one slot back:
//!
//! ```text
//! adjusted = new_idx + delta - added_before(new_idx)
//! ```
//!
//! A shift fully explained by surrounding insertions and deletions
//! (`adjusted == old_idx`) is an `Update`, as is an unchanged index. Anything
//! else is a `Move`.
//!
//! This is a single-pass heuristic. It does not minimise the number of moves:
//! `[A, B, C] -> [C, A, B]` reports three moves where one would do.
//!
//! # Complexity
//!
//! - Hashed (`Eq + Hash`): O(n + m) time, O(n + m) space
//! - Equality-only (`PartialEq`): O(n * m) time, O(n + m) space

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::{ReconcileError, ReconcileResult, Side};

use super::classify::{
    Classification, Positions, position_index, reject_duplicates_by_eq, reject_duplicates_hashed,
};

/// Default number of structural edits above which a full reset is preferred.
const DEFAULT_MAX_OPS: usize = 2000;

// =============================================================================
// Public Types
// =============================================================================

/// One structural difference between two sequences.
///
/// `old_idx` always indexes the old sequence, `new_idx` the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Element at `new_idx` has no counterpart in the old sequence
    Insertion { new_idx: usize },
    /// Element at `old_idx` has no counterpart in the new sequence
    Deletion { old_idx: usize },
    /// Element changed its effective position
    Move { old_idx: usize, new_idx: usize },
    /// Element kept its effective position; its value may still differ
    Update { new_idx: usize },
}

/// Operation tag, ordered the way consumers apply operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    Deletion,
    Insertion,
    Move,
    Update,
}

impl Operation {
    impl_variant_predicates!(Insertion, Deletion, Move, Update);

    /// Get the operation tag
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Insertion { .. } => OperationKind::Insertion,
            Self::Deletion { .. } => OperationKind::Deletion,
            Self::Move { .. } => OperationKind::Move,
            Self::Update { .. } => OperationKind::Update,
        }
    }

    /// Old-space index, if this operation refers to one
    pub fn old_idx(&self) -> Option<usize> {
        match self {
            Self::Deletion { old_idx } | Self::Move { old_idx, .. } => Some(*old_idx),
            Self::Insertion { .. } | Self::Update { .. } => None,
        }
    }

    /// New-space index, if this operation refers to one
    pub fn new_idx(&self) -> Option<usize> {
        match self {
            Self::Insertion { new_idx } | Self::Move { new_idx, .. } | Self::Update { new_idx } => {
                Some(*new_idx)
            }
            Self::Deletion { .. } => None,
        }
    }
}

/// How equal values repeated within one sequence are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Pair the k-th occurrence in `old` with the k-th occurrence in `new`.
    /// Surplus occurrences are deleted or inserted.
    #[default]
    Pair,
    /// Fail with [`ReconcileError::DuplicateElement`] on any repeated value.
    Reject,
}

/// Configuration for reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileConfig {
    /// Treatment of repeated values.
    /// Default: `Pair`
    pub duplicates: DuplicatePolicy,
    /// Structural edit count above which consumers should reset instead of patch.
    /// Default: 2000
    pub max_ops: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            max_ops: DEFAULT_MAX_OPS,
        }
    }
}

impl ReconcileConfig {
    /// Create config with explicit settings.
    pub fn new(duplicates: DuplicatePolicy, max_ops: usize) -> Self {
        Self { duplicates, max_ops }
    }

    /// Config that rejects repeated values.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            ..Self::default()
        }
    }

    /// Replace the edit threshold.
    pub fn with_max_ops(mut self, max_ops: usize) -> Self {
        self.max_ops = max_ops;
        self
    }
}

/// Statistics from a reconciliation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub deleted: usize,
    pub inserted: usize,
    pub moved: usize,
    pub updated: usize,
}

impl ReconcileStats {
    /// Structural edits (not counting updates)
    pub fn edit_count(&self) -> usize {
        self.deleted + self.inserted + self.moved
    }

    /// Check if the sequences hold the same elements in the same effective order
    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }

    fn record(&mut self, op: &Operation) {
        match op {
            Operation::Deletion { .. } => self.deleted += 1,
            Operation::Insertion { .. } => self.inserted += 1,
            Operation::Move { .. } => self.moved += 1,
            Operation::Update { .. } => self.updated += 1,
        }
    }
}

/// Result of a reconciliation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[must_use]
pub struct Reconciliation {
    /// Deletions, then insertions, then moves and updates in old order
    pub ops: Vec<Operation>,
    /// `(old_idx, new_idx)` for every surviving element, in old order
    pub matches: Vec<(usize, usize)>,
    pub stats: ReconcileStats,
}

impl Reconciliation {
    /// Check if the structural edit count is above `max_ops`
    pub fn exceeds(&self, max_ops: usize) -> bool {
        self.stats.edit_count() > max_ops
    }

    /// Consume and return the operations only
    pub fn into_ops(self) -> Vec<Operation> {
        self.ops
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Reconcile two sequences of hashable elements.
///
/// # Example
///
/// ```
/// use list_reconcile::{Operation, reconcile};
///
/// let ops = reconcile(&['a', 'b', 'c'], &['a', 'c', 'd']).unwrap();
/// assert_eq!(ops, vec![
///     Operation::Deletion { old_idx: 1 },
///     Operation::Insertion { new_idx: 2 },
///     Operation::Update { new_idx: 0 },
///     Operation::Update { new_idx: 1 },
/// ]);
/// ```
pub fn reconcile<T: Eq + Hash>(old: &[T], new: &[T]) -> ReconcileResult<Vec<Operation>> {
    reconcile_with_config(old, new, &ReconcileConfig::default()).map(Reconciliation::into_ops)
}

/// Reconcile two sequences of hashable elements with custom configuration.
pub fn reconcile_with_config<T: Eq + Hash>(
    old: &[T],
    new: &[T],
    config: &ReconcileConfig,
) -> ReconcileResult<Reconciliation> {
    if config.duplicates == DuplicatePolicy::Reject {
        reject_duplicates_hashed(old, Side::Old)?;
        reject_duplicates_hashed(new, Side::New)?;
    }

    let cls = Classification::hashed(old, new);
    let locator = HashLocator::new(new, &cls);
    run_passes(old, new.len(), &cls, locator)
}

/// Reconcile two sequences whose elements only support `PartialEq`.
///
/// Output is identical to [`reconcile`] for elements that are also `Eq + Hash`.
pub fn reconcile_by_eq<T: PartialEq>(old: &[T], new: &[T]) -> ReconcileResult<Vec<Operation>> {
    reconcile_by_eq_with_config(old, new, &ReconcileConfig::default()).map(Reconciliation::into_ops)
}

/// Equality-only reconciliation with custom configuration.
pub fn reconcile_by_eq_with_config<T: PartialEq>(
    old: &[T],
    new: &[T],
    config: &ReconcileConfig,
) -> ReconcileResult<Reconciliation> {
    if config.duplicates == DuplicatePolicy::Reject {
        reject_duplicates_by_eq(old, Side::Old)?;
        reject_duplicates_by_eq(new, Side::New)?;
    }

    let cls = Classification::by_eq(old, new);
    let locator = ScanLocator::new(new, &cls);
    run_passes(old, new.len(), &cls, locator)
}

// =============================================================================
// Passes
// =============================================================================

/// Finds the counterpart of a surviving old element in `new`.
trait Locator<T> {
    /// First unclaimed, non-added position in `new` equal to `item`.
    /// Claims it before returning.
    fn locate(&mut self, item: &T) -> Option<usize>;
}

fn run_passes<T, L: Locator<T>>(
    old: &[T],
    new_len: usize,
    cls: &Classification,
    mut locator: L,
) -> ReconcileResult<Reconciliation> {
    // Quick path: nothing on one side means nothing to pair
    if old.is_empty() || new_len == 0 {
        let ops: Vec<Operation> = (0..old.len())
            .map(|old_idx| Operation::Deletion { old_idx })
            .chain((0..new_len).map(|new_idx| Operation::Insertion { new_idx }))
            .collect();
        let stats = ReconcileStats { deleted: old.len(), inserted: new_len, ..Default::default() };
        trace_summary(&stats);
        return Ok(Reconciliation { ops, matches: Vec::new(), stats });
    }

    let surviving = old.len() - cls.removed_count();
    let mut ops = Vec::with_capacity(cls.removed_count() + cls.added_count() + surviving);
    let mut matches = Vec::with_capacity(surviving);
    let mut stats = ReconcileStats::default();

    // Deletions, in old order
    ops.extend(cls.removed_indices().map(|old_idx| Operation::Deletion { old_idx }));

    // Insertions, in new order
    ops.extend(cls.added_indices().map(|new_idx| Operation::Insertion { new_idx }));

    // Moves and updates, in old order
    let added_before = cls.added_prefix();
    let mut delta = 0usize;

    for (old_idx, item) in old.iter().enumerate() {
        if cls.is_removed(old_idx) {
            delta += 1;
            continue;
        }

        let new_idx = locator
            .locate(item)
            .ok_or(ReconcileError::InvariantViolation { old_idx })?;

        // added_before[new_idx] <= new_idx, so this cannot underflow
        let adjusted = new_idx - added_before[new_idx] + delta;

        let op = if old_idx != new_idx && adjusted != old_idx {
            Operation::Move { old_idx, new_idx }
        } else {
            Operation::Update { new_idx }
        };
        tracing::trace!(old_idx, new_idx, adjusted, ?op, "paired element");

        matches.push((old_idx, new_idx));
        ops.push(op);
    }

    for op in &ops {
        stats.record(op);
    }
    trace_summary(&stats);

    Ok(Reconciliation { ops, matches, stats })
}

fn trace_summary(stats: &ReconcileStats) {
    tracing::debug!(
        deleted = stats.deleted,
        inserted = stats.inserted,
        moved = stats.moved,
        updated = stats.updated,
        "reconciled sequences"
    );
}

// =============================================================================
// Locators
// =============================================================================

/// Ascending scan over `new`, skipping added and already-claimed positions.
struct ScanLocator<'a, T> {
    new: &'a [T],
    cls: &'a Classification,
    claimed: Vec<bool>,
}

impl<'a, T> ScanLocator<'a, T> {
    fn new(new: &'a [T], cls: &'a Classification) -> Self {
        Self { new, cls, claimed: vec![false; new.len()] }
    }
}

impl<T: PartialEq> Locator<T> for ScanLocator<'_, T> {
    fn locate(&mut self, item: &T) -> Option<usize> {
        let found = self.new.iter().enumerate().position(|(new_idx, candidate)| {
            !self.cls.is_added(new_idx) && !self.claimed[new_idx] && candidate == item
        })?;
        self.claimed[found] = true;
        Some(found)
    }
}

/// Hash index over the non-added positions of `new`.
struct HashLocator<'a, T> {
    index: FxHashMap<&'a T, (Positions, usize)>,
}

impl<'a, T: Eq + Hash> HashLocator<'a, T> {
    fn new(new: &'a [T], cls: &Classification) -> Self {
        let survivors = new.iter().enumerate().filter(|(new_idx, _)| !cls.is_added(*new_idx));
        Self { index: position_index(survivors) }
    }
}

impl<T: Eq + Hash> Locator<T> for HashLocator<'_, T> {
    fn locate(&mut self, item: &T) -> Option<usize> {
        let (positions, cursor) = self.index.get_mut(item)?;
        let found = positions.get(*cursor).copied()?;
        *cursor += 1;
        Some(found)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    use super::Operation::{Deletion, Insertion, Move, Update};

    /// Run both strategies and check they agree
    fn ops(old: &[char], new: &[char]) -> Vec<Operation> {
        let hashed = reconcile(old, new).unwrap();
        let by_eq = reconcile_by_eq(old, new).unwrap();
        assert_eq!(hashed, by_eq, "strategies disagree for {old:?} -> {new:?}");
        hashed
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_empty_sequences() {
        assert!(ops(&[], &[]).is_empty());
    }

    #[test]
    fn test_insert_all() {
        assert_eq!(
            ops(&[], &chars("abc")),
            vec![Insertion { new_idx: 0 }, Insertion { new_idx: 1 }, Insertion { new_idx: 2 }]
        );
    }

    #[test]
    fn test_delete_all() {
        assert_eq!(
            ops(&chars("abc"), &[]),
            vec![Deletion { old_idx: 0 }, Deletion { old_idx: 1 }, Deletion { old_idx: 2 }]
        );
    }

    #[test]
    fn test_no_changes() {
        assert_eq!(
            ops(&chars("abcd"), &chars("abcd")),
            vec![
                Update { new_idx: 0 },
                Update { new_idx: 1 },
                Update { new_idx: 2 },
                Update { new_idx: 3 }
            ]
        );
    }

    #[test]
    fn test_full_replacement() {
        assert_eq!(
            ops(&chars("ab"), &chars("xyz")),
            vec![
                Deletion { old_idx: 0 },
                Deletion { old_idx: 1 },
                Insertion { new_idx: 0 },
                Insertion { new_idx: 1 },
                Insertion { new_idx: 2 }
            ]
        );
    }

    #[test]
    fn test_swap_adjacent() {
        assert_eq!(
            ops(&chars("ABCD"), &chars("ACBD")),
            vec![
                Update { new_idx: 0 },
                Move { old_idx: 1, new_idx: 2 },
                Move { old_idx: 2, new_idx: 1 },
                Update { new_idx: 3 }
            ]
        );
    }

    #[test]
    fn test_insertion_discounts_shift() {
        // X pushes everything right by one; only B and C really reorder
        assert_eq!(
            ops(&chars("ABC"), &chars("XACB")),
            vec![
                Insertion { new_idx: 0 },
                Update { new_idx: 1 },
                Move { old_idx: 1, new_idx: 3 },
                Update { new_idx: 2 }
            ]
        );
    }

    #[test]
    fn test_insertion_only_shift_is_update() {
        assert_eq!(
            ops(&chars("AB"), &chars("XAB")),
            vec![Insertion { new_idx: 0 }, Update { new_idx: 1 }, Update { new_idx: 2 }]
        );
    }

    #[test]
    fn test_deletion_only_shift_is_update() {
        assert_eq!(
            ops(&chars("XAB"), &chars("AB")),
            vec![Deletion { old_idx: 0 }, Update { new_idx: 0 }, Update { new_idx: 1 }]
        );
    }

    #[test]
    fn test_rotation_is_not_minimal() {
        assert_eq!(
            ops(&chars("ABC"), &chars("CAB")),
            vec![
                Move { old_idx: 0, new_idx: 1 },
                Move { old_idx: 1, new_idx: 2 },
                Move { old_idx: 2, new_idx: 0 }
            ]
        );
    }

    #[test]
    fn test_mixed_operations() {
        // Old: [A, B, C, D]  New: [A, E, C]  (delete B, delete D, insert E)
        let result = reconcile_with_config(
            &chars("ABCD"),
            &chars("AEC"),
            &ReconcileConfig::default(),
        )
        .unwrap();
        assert_eq!(result.stats, ReconcileStats { deleted: 2, inserted: 1, moved: 0, updated: 2 });
        assert_eq!(result.matches, vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn test_duplicates_are_paired_by_occurrence() {
        assert_eq!(
            ops(&chars("AXA"), &chars("AX")),
            vec![Deletion { old_idx: 2 }, Update { new_idx: 0 }, Update { new_idx: 1 }]
        );
        assert_eq!(
            ops(&chars("AA"), &chars("AAA")),
            vec![Insertion { new_idx: 2 }, Update { new_idx: 0 }, Update { new_idx: 1 }]
        );
    }

    #[test]
    fn test_strict_rejects_duplicates() {
        let config = ReconcileConfig::strict();
        let err = reconcile_with_config(&chars("ABA"), &chars("AB"), &config).unwrap_err();
        assert_eq!(err, ReconcileError::DuplicateElement { side: Side::Old, first: 0, second: 2 });

        let err = reconcile_by_eq_with_config(&chars("AB"), &chars("BB"), &config).unwrap_err();
        assert_eq!(err, ReconcileError::DuplicateElement { side: Side::New, first: 0, second: 1 });

        assert!(reconcile_with_config(&chars("AB"), &chars("BA"), &config).is_ok());
    }

    #[test]
    fn test_by_eq_accepts_partial_eq_only() {
        let old = [1.0f64, 2.0, 3.0];
        let new = [3.0f64, 1.0];
        let result = reconcile_by_eq(&old, &new).unwrap();
        assert_eq!(
            result,
            vec![Deletion { old_idx: 1 }, Move { old_idx: 0, new_idx: 1 }, Move { old_idx: 2, new_idx: 0 }]
        );
    }

    #[test]
    fn test_nan_is_never_matched() {
        let result = reconcile_by_eq(&[f64::NAN], &[f64::NAN]).unwrap();
        assert_eq!(result, vec![Deletion { old_idx: 0 }, Insertion { new_idx: 0 }]);
    }

    /// Equality that stops holding once its comparison budget is spent
    struct Fickle {
        id: u32,
        budget: Rc<Cell<usize>>,
    }

    impl PartialEq for Fickle {
        fn eq(&self, other: &Self) -> bool {
            let left = self.budget.get();
            if left == 0 {
                return false;
            }
            self.budget.set(left - 1);
            self.id == other.id
        }
    }

    #[test]
    fn test_inconsistent_equality_is_reported() {
        // One comparison: classification pairs the elements, the move pass cannot
        let budget = Rc::new(Cell::new(1));
        let old = [Fickle { id: 1, budget: budget.clone() }];
        let new = [Fickle { id: 1, budget: budget.clone() }];

        let err = reconcile_by_eq(&old, &new).unwrap_err();
        assert_eq!(err, ReconcileError::InvariantViolation { old_idx: 0 });
    }

    /// Hashes and compares by `current`, which shifts on the second hash
    /// when `drifts` is set.
    struct Drifting {
        id: u32,
        drifts: bool,
        hashed: Cell<usize>,
        current: Cell<u32>,
    }

    impl Drifting {
        fn new(id: u32, drifts: bool) -> Self {
            Self { id, drifts, hashed: Cell::new(0), current: Cell::new(id) }
        }
    }

    impl PartialEq for Drifting {
        fn eq(&self, other: &Self) -> bool {
            self.current.get() == other.current.get()
        }
    }

    impl Eq for Drifting {}

    impl Hash for Drifting {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            let seen = self.hashed.get();
            self.hashed.set(seen + 1);
            if self.drifts && seen >= 1 {
                self.current.set(self.id + 1000);
            }
            self.current.get().hash(state);
        }
    }

    #[test]
    fn test_inconsistent_hash_is_reported() {
        // Classification pairs both elements; the second no longer finds itself
        let old = [Drifting::new(1, false), Drifting::new(2, true)];
        let new = [Drifting::new(1, false), Drifting::new(2, false)];

        let result = reconcile(&old, &new);
        assert_eq!(result, Err(ReconcileError::InvariantViolation { old_idx: 1 }));
        assert_eq!(old[1].current.get(), 1002);
    }

    #[test]
    fn test_exceeds() {
        let result =
            reconcile_with_config(&chars("ABC"), &chars("XYZ"), &ReconcileConfig::default()).unwrap();
        assert!(result.exceeds(5));
        assert!(!result.exceeds(6));
    }

    #[test]
    fn test_operation_accessors() {
        let op = Move { old_idx: 2, new_idx: 5 };
        assert!(op.is_move());
        assert!(!op.is_update());
        assert_eq!(op.old_idx(), Some(2));
        assert_eq!(op.new_idx(), Some(5));
        assert_eq!(op.kind(), OperationKind::Move);

        let op = Deletion { old_idx: 1 };
        assert!(op.is_deletion());
        assert_eq!(op.new_idx(), None);

        let op = Insertion { new_idx: 0 };
        assert!(op.is_insertion());
        assert_eq!(op.old_idx(), None);
    }

    #[test]
    fn test_kind_order_matches_application_order() {
        assert!(OperationKind::Deletion < OperationKind::Insertion);
        assert!(OperationKind::Insertion < OperationKind::Move);
        assert!(OperationKind::Move < OperationKind::Update);
    }

    #[test]
    fn test_config_presets() {
        let config = ReconcileConfig::default();
        assert_eq!(config.duplicates, DuplicatePolicy::Pair);
        assert_eq!(config.max_ops, 2000);

        let config = ReconcileConfig::strict().with_max_ops(10);
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert_eq!(config.max_ops, 10);
    }

    #[test]
    fn test_types_are_send_sync() {
        static_assertions::assert_impl_all!(Operation: Send, Sync, Copy);
        static_assertions::assert_impl_all!(Reconciliation: Send, Sync);
        static_assertions::assert_impl_all!(ReconcileConfig: Send, Sync);
    }
}

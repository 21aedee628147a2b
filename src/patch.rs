//! Consumer boundary: turning operations into list-surface patches.
//!
//! ```text
//! reconcile(old, new) -> Vec<Operation>       // flat indices, pure data
//!       |
//!       v
//! PatchPlan::build(..) -> PatchPlan           // IndexPaths, consumer order
//!       |
//!       v
//! apply(surface, ..)                          // drives a ListSurface
//! ```
//!
//! Consumers apply deletions, then insertions, then moves, then updates.
//! Deletion paths and move sources are in old space; insertion paths, move
//! destinations and update paths are in new space.
//!
//! A failed reconciliation never becomes a silent no-op: the plan turns into
//! a reset and the surface reloads from the new state.

use std::fmt;
use std::hash::Hash;

use crate::algo::{Operation, ReconcileConfig, ReconcileStats, reconcile_with_config};
use crate::state::ElementState;

// =============================================================================
// IndexPath
// =============================================================================

/// Two-level row address on a list surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    /// Create a path.
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }

    /// Row in section 0.
    pub const fn row(row: usize) -> Self {
        Self::new(0, row)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.row)
    }
}

// =============================================================================
// PatchPlan
// =============================================================================

/// Value-level transition for one row.
pub struct RowUpdate<'a, T: ElementState> {
    /// New-space path of the row
    pub path: IndexPath,
    /// Element before the change
    pub old: &'a T,
    /// Element after the change
    pub new: &'a T,
    pub difference: T::Difference,
}

/// Patches for one list section, grouped in application order.
#[must_use]
pub struct PatchPlan<'a, T: ElementState> {
    /// Old-space rows to delete
    pub deletions: Vec<IndexPath>,
    /// New-space rows to insert
    pub insertions: Vec<IndexPath>,
    /// `(old path, new path)` pairs
    pub moves: Vec<(IndexPath, IndexPath)>,
    pub updates: Vec<RowUpdate<'a, T>>,
    /// Whether the consumer should reload instead of patching
    pub should_reset: bool,
    /// Reason for reset (if should_reset is true)
    pub reset_reason: Option<String>,
    pub stats: ReconcileStats,
}

impl<T> fmt::Debug for RowUpdate<'_, T>
where
    T: ElementState + fmt::Debug,
    T::Difference: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowUpdate")
            .field("path", &self.path)
            .field("old", &self.old)
            .field("new", &self.new)
            .field("difference", &self.difference)
            .finish()
    }
}

impl<T> fmt::Debug for PatchPlan<'_, T>
where
    T: ElementState + fmt::Debug,
    T::Difference: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchPlan")
            .field("deletions", &self.deletions)
            .field("insertions", &self.insertions)
            .field("moves", &self.moves)
            .field("updates", &self.updates)
            .field("should_reset", &self.should_reset)
            .field("reset_reason", &self.reset_reason)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T: ElementState> PatchPlan<'a, T> {
    /// Create a plan that triggers a full reset
    pub fn reset(reason: impl Into<String>) -> Self {
        Self {
            deletions: Vec::new(),
            insertions: Vec::new(),
            moves: Vec::new(),
            updates: Vec::new(),
            should_reset: true,
            reset_reason: Some(reason.into()),
            stats: ReconcileStats::default(),
        }
    }

    /// Check if there is anything to apply
    pub fn has_changes(&self) -> bool {
        self.should_reset
            || !self.deletions.is_empty()
            || !self.insertions.is_empty()
            || !self.moves.is_empty()
            || !self.updates.is_empty()
    }

    /// Reconcile `old` against `new` and address the result in `section`.
    ///
    /// Falls back to [`PatchPlan::reset`] when reconciliation fails or the
    /// structural edit count exceeds `config.max_ops`.
    pub fn build(old: &'a [T], new: &'a [T], section: usize, config: &ReconcileConfig) -> Self
    where
        T: Eq + Hash,
    {
        let result = match reconcile_with_config(old, new, config) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%err, section, "reconciliation failed, resetting section");
                return Self::reset(err.to_string());
            }
        };

        if result.exceeds(config.max_ops) {
            tracing::warn!(
                edits = result.stats.edit_count(),
                max_ops = config.max_ops,
                section,
                "too many edits, resetting section"
            );
            return Self::reset(format!(
                "{} edits exceed limit of {}",
                result.stats.edit_count(),
                config.max_ops
            ));
        }

        // Updates carry only new_idx; recover the old element from the matches
        let mut old_of_new: Vec<Option<usize>> = vec![None; new.len()];
        for &(old_idx, new_idx) in &result.matches {
            old_of_new[new_idx] = Some(old_idx);
        }

        let at = |row| IndexPath::new(section, row);
        let mut plan = Self {
            deletions: Vec::with_capacity(result.stats.deleted),
            insertions: Vec::with_capacity(result.stats.inserted),
            moves: Vec::with_capacity(result.stats.moved),
            updates: Vec::with_capacity(result.stats.updated),
            should_reset: false,
            reset_reason: None,
            stats: result.stats,
        };

        for op in result.ops {
            match op {
                Operation::Deletion { old_idx } => plan.deletions.push(at(old_idx)),
                Operation::Insertion { new_idx } => plan.insertions.push(at(new_idx)),
                Operation::Move { old_idx, new_idx } => plan.moves.push((at(old_idx), at(new_idx))),
                Operation::Update { new_idx } => {
                    // Every Update comes from a recorded match
                    let Some(old_idx) = old_of_new[new_idx] else {
                        tracing::warn!(
                            new_idx,
                            section,
                            "update has no matched old element, resetting section"
                        );
                        return Self::reset(format!("update at {new_idx} has no matched old element"));
                    };
                    let (old_elem, new_elem) = (&old[old_idx], &new[new_idx]);
                    plan.updates.push(RowUpdate {
                        path: at(new_idx),
                        old: old_elem,
                        new: new_elem,
                        difference: new_elem.difference_from(old_elem),
                    });
                }
            }
        }

        plan
    }
}

// =============================================================================
// ListSurface
// =============================================================================

/// A presentation surface that shows one list section.
///
/// Implementors translate calls into their own widget API. Batched calls
/// arrive between `begin_updates` and `end_updates` in consumer order.
pub trait ListSurface<T: ElementState> {
    /// Start a batch of changes
    fn begin_updates(&mut self) {}

    /// Remove rows (old-space paths)
    fn delete_rows(&mut self, paths: &[IndexPath]);

    /// Insert rows (new-space paths)
    fn insert_rows(&mut self, paths: &[IndexPath]);

    /// Move one row from an old-space path to a new-space path
    fn move_row(&mut self, from: IndexPath, to: IndexPath);

    /// Re-present a row whose position is effectively unchanged
    fn update_row(&mut self, update: &RowUpdate<'_, T>);

    /// Finish a batch of changes
    fn end_updates(&mut self) {}

    /// Discard the current rows and show `state` from scratch
    fn reload(&mut self, state: &[T]);
}

/// What [`apply`] did to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Incremental patches were applied
    Patched(ReconcileStats),
    /// The surface was reloaded
    Reset { reason: Option<String> },
}

impl Applied {
    /// Check if the surface was reloaded
    pub fn is_reset(&self) -> bool {
        matches!(self, Self::Reset { .. })
    }
}

/// Bring `surface` from showing `old` to showing `new`.
///
/// With `animated == false` the surface is simply reloaded. Otherwise the
/// lists are reconciled and patched incrementally, falling back to a reload
/// when the plan asks for a reset.
pub fn apply<T, S>(surface: &mut S, old: &[T], new: &[T], animated: bool, config: &ReconcileConfig) -> Applied
where
    T: ElementState + Eq + Hash,
    S: ListSurface<T> + ?Sized,
{
    if !animated {
        surface.reload(new);
        return Applied::Reset { reason: None };
    }

    apply_plan(surface, PatchPlan::build(old, new, 0, config), new)
}

/// Apply a prebuilt plan; `new` is used only if the plan is a reset.
pub fn apply_plan<T, S>(surface: &mut S, plan: PatchPlan<'_, T>, new: &[T]) -> Applied
where
    T: ElementState,
    S: ListSurface<T> + ?Sized,
{
    if plan.should_reset {
        surface.reload(new);
        return Applied::Reset { reason: plan.reset_reason };
    }

    surface.begin_updates();
    if !plan.deletions.is_empty() {
        surface.delete_rows(&plan.deletions);
    }
    if !plan.insertions.is_empty() {
        surface.insert_rows(&plan.insertions);
    }
    for &(from, to) in &plan.moves {
        surface.move_row(from, to);
    }
    for update in &plan.updates {
        surface.update_row(update);
    }
    surface.end_updates();

    Applied::Patched(plan.stats)
}

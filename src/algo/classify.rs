//! Membership classification
//!
//! Decides which old elements are *removed* (no counterpart in the new
//! sequence) and which new elements are *added* (no counterpart in the old
//! sequence).
//!
//! # Multiplicity
//!
//! Counterparts are claimed one-to-one: the k-th occurrence of a value in
//! `old` pairs with the k-th occurrence of an equal value in `new`. Surplus
//! occurrences on either side are removed or added. For sequences whose values
//! are unique this is a plain existence check.
//!
//! # Strategies
//!
//! | Strategy | Bound | Time |
//! |----------|-------|------|
//! | [`Classification::hashed`] | `Eq + Hash` | O(n + m) |
//! | [`Classification::by_eq`] | `PartialEq` | O(n * m) |
//!
//! Both produce identical flags for a consistent equality relation.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{ReconcileError, ReconcileResult, Side};

/// Ascending positions of equal values in one sequence.
pub(crate) type Positions = SmallVec<[usize; 2]>;

/// Removed/added flags for a pair of sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    removed: Vec<bool>,
    added: Vec<bool>,
    removed_count: usize,
    added_count: usize,
}

impl Classification {
    /// Classify using a hash index over `new`.
    pub fn hashed<T: Eq + Hash>(old: &[T], new: &[T]) -> Self {
        let mut index = position_index(new.iter().enumerate());
        let mut cls = Self::unmatched(old.len(), new.len());

        for (old_idx, item) in old.iter().enumerate() {
            let claimed = index.get_mut(item).and_then(|(positions, cursor)| {
                let pos = positions.get(*cursor).copied();
                *cursor += 1;
                pos
            });
            if let Some(new_idx) = claimed {
                cls.pair(old_idx, new_idx);
            }
        }

        cls
    }

    /// Classify with linear scans, for elements that are only `PartialEq`.
    pub fn by_eq<T: PartialEq>(old: &[T], new: &[T]) -> Self {
        let mut cls = Self::unmatched(old.len(), new.len());

        for (old_idx, item) in old.iter().enumerate() {
            let claimed = new
                .iter()
                .enumerate()
                .position(|(new_idx, candidate)| cls.added[new_idx] && candidate == item);
            if let Some(new_idx) = claimed {
                cls.pair(old_idx, new_idx);
            }
        }

        cls
    }

    /// Everything removed, everything added, until pairs are claimed
    fn unmatched(old_len: usize, new_len: usize) -> Self {
        Self {
            removed: vec![true; old_len],
            added: vec![true; new_len],
            removed_count: old_len,
            added_count: new_len,
        }
    }

    fn pair(&mut self, old_idx: usize, new_idx: usize) {
        self.removed[old_idx] = false;
        self.added[new_idx] = false;
        self.removed_count -= 1;
        self.added_count -= 1;
    }

    /// Whether the old element at `old_idx` has no counterpart
    #[inline]
    pub fn is_removed(&self, old_idx: usize) -> bool {
        self.removed[old_idx]
    }

    /// Whether the new element at `new_idx` has no counterpart
    #[inline]
    pub fn is_added(&self, new_idx: usize) -> bool {
        self.added[new_idx]
    }

    /// Number of removed old elements
    pub fn removed_count(&self) -> usize {
        self.removed_count
    }

    /// Number of added new elements
    pub fn added_count(&self) -> usize {
        self.added_count
    }

    /// Ascending old indices of removed elements
    pub fn removed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        flagged(&self.removed)
    }

    /// Ascending new indices of added elements
    pub fn added_indices(&self) -> impl Iterator<Item = usize> + '_ {
        flagged(&self.added)
    }

    /// `added_before[j]` = number of added elements in `new[..j]`
    ///
    /// Has `new.len() + 1` entries.
    pub(crate) fn added_prefix(&self) -> Vec<usize> {
        let mut prefix = Vec::with_capacity(self.added.len() + 1);
        let mut running = 0;
        prefix.push(running);
        for &added in &self.added {
            running += usize::from(added);
            prefix.push(running);
        }
        prefix
    }
}

fn flagged(flags: &[bool]) -> impl Iterator<Item = usize> + '_ {
    flags.iter().enumerate().filter(|(_, f)| **f).map(|(i, _)| i)
}

/// Map each distinct value to its ascending positions and a claim cursor.
pub(crate) fn position_index<'a, T, I>(items: I) -> FxHashMap<&'a T, (Positions, usize)>
where
    T: Eq + Hash + 'a,
    I: Iterator<Item = (usize, &'a T)>,
{
    let mut index: FxHashMap<&'a T, (Positions, usize)> = FxHashMap::default();
    for (pos, item) in items {
        index.entry(item).or_default().0.push(pos);
    }
    index
}

// =============================================================================
// Duplicate detection
// =============================================================================

/// Fail on the first value that occurs twice within `items`.
pub(crate) fn reject_duplicates_hashed<T: Eq + Hash>(items: &[T], side: Side) -> ReconcileResult<()> {
    let mut first_seen: FxHashMap<&T, usize> = FxHashMap::default();
    for (idx, item) in items.iter().enumerate() {
        if let Some(&first) = first_seen.get(item) {
            return Err(ReconcileError::DuplicateElement { side, first, second: idx });
        }
        first_seen.insert(item, idx);
    }
    Ok(())
}

/// Linear-scan variant of [`reject_duplicates_hashed`].
pub(crate) fn reject_duplicates_by_eq<T: PartialEq>(items: &[T], side: Side) -> ReconcileResult<()> {
    for (second, item) in items.iter().enumerate() {
        if let Some(first) = items[..second].iter().position(|earlier| earlier == item) {
            return Err(ReconcileError::DuplicateElement { side, first, second });
        }
    }
    Ok(())
}

//! Error types for list-reconcile.
//!
//! Every failure is reported as a value. Reconciliation never returns a
//! partial operation list.

use std::fmt;

use thiserror::Error;

/// Which input sequence an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The sequence being transformed from
    Old,
    /// The sequence being transformed into
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

/// Errors that can occur while reconciling two sequences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// A surviving old element found no counterpart in the new sequence.
    ///
    /// Happens when element equality is inconsistent (not reflexive or not
    /// symmetric) or when elements change through interior mutability while
    /// the reconciler runs.
    #[error("invariant violation: surviving old element at index {old_idx} has no counterpart in the new sequence")]
    InvariantViolation {
        /// Index of the unmatched element in the old sequence
        old_idx: usize,
    },

    /// Two equal elements were found in one sequence while duplicates are rejected
    #[error("duplicate element in {side} sequence at indices {first} and {second}")]
    DuplicateElement {
        /// Sequence containing the duplicate
        side: Side,
        /// Index of the first occurrence
        first: usize,
        /// Index of the repeated occurrence
        second: usize,
    },
}

/// Result type alias for reconciliation.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

impl ReconcileError {
    /// Check if this error signals an inconsistent equality relation.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }

    /// Check if this error was raised by duplicate rejection.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateElement { .. })
    }
}

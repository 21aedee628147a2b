//! list-reconcile - Edit scripts for ordered lists
//!
//! ## Core Concepts
//!
//! **Value-equality reconciliation**: two ordered lists are compared by element
//! equality alone. The result is a flat list of [`Operation`]s (insertion,
//! deletion, move, update) that a list surface can replay incrementally
//! instead of redrawing everything.
//!
//! ## Modules
//! - `algo`: Reconciliation passes and batch entry points
//! - `state`: Element capability traits (`ElementState`, `Keyed`)
//! - `patch`: Consumer boundary (`PatchPlan`, `ListSurface`, `apply`)
//! - `error`: Error types
//!
//! ## Usage
//!
//! ```
//! use list_reconcile::{Operation, reconcile};
//!
//! let old = ["a", "b", "c", "d"];
//! let new = ["a", "c", "b", "d"];
//!
//! let ops = reconcile(&old, &new)?;
//! assert_eq!(ops, vec![
//!     Operation::Update { new_idx: 0 },
//!     Operation::Move { old_idx: 1, new_idx: 2 },
//!     Operation::Move { old_idx: 2, new_idx: 1 },
//!     Operation::Update { new_idx: 3 },
//! ]);
//! # Ok::<(), list_reconcile::ReconcileError>(())
//! ```

// =============================================================================
// Core modules
// =============================================================================

#[macro_use]
mod macros;

/// Algorithms: classification, reconciliation, batch
pub mod algo;

/// Element capability traits
pub mod state;

/// Operation consumers: plans and surfaces
pub mod patch;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Algorithms
pub use algo::{
    Classification, DuplicatePolicy, ListPair, Operation, OperationKind, ReconcileConfig,
    ReconcileStats, Reconciliation, reconcile, reconcile_batch, reconcile_by_eq,
    reconcile_by_eq_with_config, reconcile_with_config,
};

// Element capabilities
pub use state::{ElementState, Keyed, KeyedChange};

// Consumer boundary
pub use patch::{Applied, IndexPath, ListSurface, PatchPlan, RowUpdate, apply, apply_plan};

// Error types
pub use error::{ReconcileError, ReconcileResult, Side};

// =============================================================================
// Tests
// =============================================================================

//! Prelude for common imports.
//!
//! ```
//! use list_reconcile::prelude::*;
//! ```

// Algorithms
pub use crate::algo::{
    DuplicatePolicy, Operation, OperationKind, ReconcileConfig, ReconcileStats, Reconciliation,
    reconcile, reconcile_batch, reconcile_by_eq, reconcile_by_eq_with_config, reconcile_with_config,
};

// Element capabilities
pub use crate::state::{ElementState, Keyed, KeyedChange};

// Consumer boundary
pub use crate::patch::{Applied, IndexPath, ListSurface, PatchPlan, RowUpdate, apply, apply_plan};

// Error
pub use crate::error::{ReconcileError, ReconcileResult, Side};

//! Algorithm implementations for list reconciliation.
//!
//! - `classify`: removed/added classification (hashed and equality-only)
//! - `reconcile`: deletion, insertion and move/update passes
//! - `batch`: many independent pairs, optionally in parallel

mod batch;
mod classify;
mod reconcile;

pub use batch::{ListPair, reconcile_batch};
pub use classify::Classification;
pub use reconcile::{
    DuplicatePolicy, Operation, OperationKind, ReconcileConfig, ReconcileStats, Reconciliation,
    reconcile, reconcile_by_eq, reconcile_by_eq_with_config, reconcile_with_config,
};

//! Batch reconciliation of independent list pairs.
//!
//! Each pair is reconciled on its own; nothing is shared between pairs. With
//! the `parallel` feature the pairs are spread over rayon's thread pool.

use std::hash::Hash;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::ReconcileResult;

use super::reconcile::{ReconcileConfig, Reconciliation, reconcile_with_config};

/// A borrowed `(old, new)` pair.
pub type ListPair<'a, T> = (&'a [T], &'a [T]);

/// Reconcile every pair, keeping input order in the output.
#[cfg(not(feature = "parallel"))]
pub fn reconcile_batch<T>(
    pairs: &[ListPair<'_, T>],
    config: &ReconcileConfig,
) -> Vec<ReconcileResult<Reconciliation>>
where
    T: Eq + Hash,
{
    pairs
        .iter()
        .map(|(old, new)| reconcile_with_config(old, new, config))
        .collect()
}

/// Reconcile every pair in parallel, keeping input order in the output.
#[cfg(feature = "parallel")]
pub fn reconcile_batch<T>(
    pairs: &[ListPair<'_, T>],
    config: &ReconcileConfig,
) -> Vec<ReconcileResult<Reconciliation>>
where
    T: Eq + Hash + Sync,
{
    pairs
        .par_iter()
        .map(|(old, new)| reconcile_with_config(old, new, config))
        .collect()
}

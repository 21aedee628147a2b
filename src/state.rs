//! Element capability traits.
//!
//! Reconciliation itself only needs `PartialEq` (or `Eq + Hash`). Consumers
//! that animate value changes on `Update` also need to know *what* changed;
//! [`ElementState`] adds that as an associated `Difference`.
//!
//! Equality decides identity ("is this the same row?"), while
//! `difference_from` describes how the row's value changed.

use std::hash::{Hash, Hasher};

/// An element whose value can be compared against its previous state.
pub trait ElementState: PartialEq {
    /// Description of a value-level change
    type Difference;

    /// Describe how `self` differs from `old`, an equal element of the old sequence.
    fn difference_from(&self, old: &Self) -> Self::Difference;
}

impl_plain_state!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, String,
    &'static str,
);

// =============================================================================
// Keyed
// =============================================================================

/// A payload identified by a key.
///
/// Equality and hashing look at `key` only, so two `Keyed` values with the
/// same key are the same element even when their payloads differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keyed<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Keyed<K, V> {
    /// Create a keyed element
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: PartialEq, V> PartialEq for Keyed<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Keyed<K, V> {}

impl<K: Hash, V> Hash for Keyed<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Payload change between two equal [`Keyed`] elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyedChange {
    Unchanged,
    Changed,
}

impl KeyedChange {
    /// Check if the payload changed
    pub fn is_changed(self) -> bool {
        self == Self::Changed
    }
}

impl<K: PartialEq, V: PartialEq> ElementState for Keyed<K, V> {
    type Difference = KeyedChange;

    fn difference_from(&self, old: &Self) -> KeyedChange {
        if self.value == old.value {
            KeyedChange::Unchanged
        } else {
            KeyedChange::Changed
        }
    }
}

//! Accessor and capability-impl macros
//!
//! These macros remove repetitive match and impl code. Identifier
//! concatenation goes through `paste`.

// =============================================================================
// Operation accessor generation
// =============================================================================

/// Generate `is_xxx` predicates for enum variants
///
/// # Generated methods per variant:
/// - `is_xxx(&self) -> bool` - variant check
///
/// # Example
/// ```ignore
/// impl Operation {
///     impl_variant_predicates!(Insertion, Deletion);
/// }
/// // Expands to: pub fn is_insertion(&self) -> bool { ... } ...
/// ```
#[macro_export]
macro_rules! impl_variant_predicates {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a `" $variant "` operation"]
                #[inline]
                pub fn [<is_ $variant:lower>](&self) -> bool {
                    matches!(self, Self::$variant { .. })
                }
            )*
        }
    };
}

// =============================================================================
// ElementState for plain values
// =============================================================================

/// Implement [`ElementState`](crate::state::ElementState) for types whose
/// equality already covers their whole value.
///
/// The difference is `()`: an `Update` on such a type carries no value-level
/// change beyond "re-present this row".
#[macro_export]
macro_rules! impl_plain_state {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::state::ElementState for $ty {
                type Difference = ();

                #[inline]
                fn difference_from(&self, _old: &Self) -> Self::Difference {}
            }
        )*
    };
}

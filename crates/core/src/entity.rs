//! Entity trait: identity that survives across datasets.

/// Entity marker + minimal interface.
///
/// Two records describing the same entity in different datasets share an id;
/// reconciliation joins on it.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

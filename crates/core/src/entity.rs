//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// A stock record keeps its identity (the product id) while its quantity,
/// shelf and timestamps change underneath it.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

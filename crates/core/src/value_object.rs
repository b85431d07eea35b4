//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two shelves
/// named `A1` are the same shelf, two `Casa` categories are the same category.
/// To "modify" one, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct ShelfId(String);
///
/// impl ValueObject for ShelfId {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

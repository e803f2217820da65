//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. Field values, warehouse metadata and derived inventory
//! rows are value objects: two with the same attributes are interchangeable.

/// Marker trait for value objects.
///
/// The trait requires:
/// - **Clone**: value objects are copied freely between datasets and operations
/// - **PartialEq**: they are compared by their attribute values (the delta
///   computer relies on this)
/// - **Debug**: they show up in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

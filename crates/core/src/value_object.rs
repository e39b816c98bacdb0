//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attributes
/// (`Money` is a value object; `Part` is an entity).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — two value
/// objects with the same attribute values are the same value. `Slug` is the
/// canonical example here: `acme-co` equals `acme-co` no matter which record
/// carries it, while two `Brand` entities with equal fields are still two
/// distinct records.
///
/// To "modify" a value object, construct a new one; the constructors are
/// where the validity rules live, so a held value is always well-formed.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

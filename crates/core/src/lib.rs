//! `shopadmin-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no admin-UI
//! concerns): typed identifiers, the domain error model, the entity/value
//! object traits, and the slug value object shared by catalog resources.

pub mod entity;
pub mod error;
pub mod id;
pub mod slug;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use slug::Slug;
pub use value_object::ValueObject;

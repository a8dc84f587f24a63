//! Persistence seam for the back-office.
//!
//! Repository traits describe the record upsert, lookup and relationship
//! calls the admin services need; `InMemoryStore` implements them all under
//! a single lock so composite saves (an order with its items, a product
//! with its category set) are atomic. A SQL-backed implementation would
//! plug into the same traits.

pub mod in_memory;
pub mod repository;

pub use in_memory::InMemoryStore;
pub use repository::{
    BrandRepository, CategoryRepository, CustomerRepository, OrderRepository, ProductRepository,
    StoreError, StoreResult,
};

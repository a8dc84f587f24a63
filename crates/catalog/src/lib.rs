//! Catalog domain module: brands, products, categories.
//!
//! This crate contains the business rules for the shop catalog, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).
//! Uniqueness of names, slugs and SKUs spans the whole table and is
//! therefore enforced one layer up, against the store.

pub mod brand;
pub mod category;
pub mod product;

pub use brand::{Brand, BrandId, CreateBrand, UpdateBrand};
pub use category::{Category, CategoryId, CreateCategory, UpdateCategory};
pub use product::{CreateProduct, Product, ProductId, ProductType, UpdateProduct};

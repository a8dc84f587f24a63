//! Repository traits and the store error model.

use std::sync::Arc;

use thiserror::Error;

use shopadmin_catalog::{Brand, BrandId, Category, CategoryId, Product, ProductId};
use shopadmin_core::Slug;
use shopadmin_customers::{Customer, CustomerId};
use shopadmin_orders::{Order, OrderId};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level failure.
///
/// Uniqueness and referential integrity are validated by the admin services
/// first (so they can surface field-level errors); the store enforces them
/// again as the constraint of last resort, the way a database would.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column already holds this value on another live record.
    #[error("unique constraint violated on {field}: {value}")]
    UniqueViolation { field: &'static str, value: String },

    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,

    /// A referenced record (brand, customer, product, category) is missing.
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Backend failure (e.g. poisoned lock).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Brand records. `find_by_*` lookups and `list` skip soft-deleted rows;
/// uniqueness is scoped to live rows so a deleted brand's slug can be
/// reused.
pub trait BrandRepository: Send + Sync {
    fn insert(&self, brand: Brand) -> StoreResult<()>;
    fn update(&self, brand: Brand) -> StoreResult<()>;
    fn get(&self, id: BrandId) -> Option<Brand>;
    fn find_by_name(&self, name: &str) -> Option<Brand>;
    fn find_by_slug(&self, slug: &Slug) -> Option<Brand>;
    fn list(&self) -> Vec<Brand>;
}

/// Product records plus the product↔category join.
pub trait ProductRepository: Send + Sync {
    fn insert(&self, product: Product) -> StoreResult<()>;
    fn update(&self, product: Product) -> StoreResult<()>;
    fn get(&self, id: ProductId) -> Option<Product>;
    fn find_by_name(&self, name: &str) -> Option<Product>;
    fn find_by_slug(&self, slug: &Slug) -> Option<Product>;
    fn find_by_sku(&self, sku: &str) -> Option<Product>;
    fn list(&self) -> Vec<Product>;

    /// Replace the product's category set in one call (attach/detach is a
    /// whole-set swap, mirroring how the form submits it). Fails when the
    /// product or any category is missing.
    fn replace_categories(
        &self,
        product_id: ProductId,
        category_ids: Vec<CategoryId>,
    ) -> StoreResult<()>;

    fn categories_of(&self, product_id: ProductId) -> Vec<CategoryId>;
}

pub trait CategoryRepository: Send + Sync {
    fn insert(&self, category: Category) -> StoreResult<()>;
    fn update(&self, category: Category) -> StoreResult<()>;
    fn get(&self, id: CategoryId) -> Option<Category>;
    fn find_by_name(&self, name: &str) -> Option<Category>;
    fn find_by_slug(&self, slug: &Slug) -> Option<Category>;
    fn list(&self) -> Vec<Category>;
}

pub trait CustomerRepository: Send + Sync {
    fn insert(&self, customer: Customer) -> StoreResult<()>;
    fn update(&self, customer: Customer) -> StoreResult<()>;
    fn get(&self, id: CustomerId) -> Option<Customer>;
    fn list(&self) -> Vec<Customer>;
}

/// Order records. An order embeds its items, so `insert`/`update` are the
/// composite all-or-nothing save of the parent and its lines.
pub trait OrderRepository: Send + Sync {
    fn insert(&self, order: Order) -> StoreResult<()>;
    fn update(&self, order: Order) -> StoreResult<()>;
    fn get(&self, id: OrderId) -> Option<Order>;
    fn list(&self) -> Vec<Order>;
}

macro_rules! impl_repo_for_arc {
    ($trait_:ident { $(fn $name:ident(&self $(, $arg:ident : $ty:ty)*) -> $ret:ty;)* }) => {
        impl<S> $trait_ for Arc<S>
        where
            S: $trait_ + ?Sized,
        {
            $(
                fn $name(&self $(, $arg: $ty)*) -> $ret {
                    (**self).$name($($arg),*)
                }
            )*
        }
    };
}

impl_repo_for_arc!(BrandRepository {
    fn insert(&self, brand: Brand) -> StoreResult<()>;
    fn update(&self, brand: Brand) -> StoreResult<()>;
    fn get(&self, id: BrandId) -> Option<Brand>;
    fn find_by_name(&self, name: &str) -> Option<Brand>;
    fn find_by_slug(&self, slug: &Slug) -> Option<Brand>;
    fn list(&self) -> Vec<Brand>;
});

impl_repo_for_arc!(ProductRepository {
    fn insert(&self, product: Product) -> StoreResult<()>;
    fn update(&self, product: Product) -> StoreResult<()>;
    fn get(&self, id: ProductId) -> Option<Product>;
    fn find_by_name(&self, name: &str) -> Option<Product>;
    fn find_by_slug(&self, slug: &Slug) -> Option<Product>;
    fn find_by_sku(&self, sku: &str) -> Option<Product>;
    fn list(&self) -> Vec<Product>;
    fn replace_categories(&self, product_id: ProductId, category_ids: Vec<CategoryId>) -> StoreResult<()>;
    fn categories_of(&self, product_id: ProductId) -> Vec<CategoryId>;
});

impl_repo_for_arc!(CategoryRepository {
    fn insert(&self, category: Category) -> StoreResult<()>;
    fn update(&self, category: Category) -> StoreResult<()>;
    fn get(&self, id: CategoryId) -> Option<Category>;
    fn find_by_name(&self, name: &str) -> Option<Category>;
    fn find_by_slug(&self, slug: &Slug) -> Option<Category>;
    fn list(&self) -> Vec<Category>;
});

impl_repo_for_arc!(CustomerRepository {
    fn insert(&self, customer: Customer) -> StoreResult<()>;
    fn update(&self, customer: Customer) -> StoreResult<()>;
    fn get(&self, id: CustomerId) -> Option<Customer>;
    fn list(&self) -> Vec<Customer>;
});

impl_repo_for_arc!(OrderRepository {
    fn insert(&self, order: Order) -> StoreResult<()>;
    fn update(&self, order: Order) -> StoreResult<()>;
    fn get(&self, id: OrderId) -> Option<Order>;
    fn list(&self) -> Vec<Order>;
});

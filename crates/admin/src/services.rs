//! Service wiring.
//!
//! One constructor-injected bundle of every resource service, sharing a
//! single store handle so the uniqueness and relationship passes all see
//! the same data.

use std::sync::Arc;

use shopadmin_store::{
    BrandRepository, CategoryRepository, CustomerRepository, InMemoryStore, OrderRepository,
    ProductRepository,
};

use crate::brands::BrandService;
use crate::categories::CategoryService;
use crate::customers::CustomerService;
use crate::orders::OrderService;
use crate::products::ProductService;

pub struct AdminServices<S> {
    pub brands: BrandService<S>,
    pub products: ProductService<S, S, S>,
    pub categories: CategoryService<S>,
    pub customers: CustomerService<S>,
    pub orders: OrderService<S, S, S>,
}

impl<S> AdminServices<S>
where
    S: BrandRepository
        + ProductRepository
        + CategoryRepository
        + CustomerRepository
        + OrderRepository
        + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            brands: BrandService::new(store.clone()),
            products: ProductService::new(store.clone(), store.clone(), store.clone()),
            categories: CategoryService::new(store.clone()),
            customers: CustomerService::new(store.clone()),
            orders: OrderService::new(store.clone(), store.clone(), store),
        }
    }
}

impl AdminServices<Arc<InMemoryStore>> {
    /// Dev/test wiring over the in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}

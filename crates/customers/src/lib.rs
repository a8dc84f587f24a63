//! Customers domain module.
//!
//! Customers are the order counterparty; orders require one.

pub mod customer;

pub use customer::{CreateCustomer, Customer, CustomerId, UpdateCustomer};

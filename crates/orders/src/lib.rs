//! Orders domain module.
//!
//! An order owns its line items; the two are always edited and persisted as
//! one unit. The order total is a read-time aggregate over the items, never
//! a stored field.

pub mod order;

pub use order::{CreateOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatus, UpdateOrder};

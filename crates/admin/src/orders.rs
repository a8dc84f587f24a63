//! Order resource service.
//!
//! An order and its item sub-form save as one unit: every item must resolve
//! to an existing product and a usable unit-price snapshot before anything
//! is persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopadmin_core::RecordId;
use shopadmin_customers::CustomerId;
use shopadmin_orders::{CreateOrder, NewOrderItem, Order, OrderId, OrderStatus, UpdateOrder};
use shopadmin_catalog::ProductId;
use shopadmin_store::{CustomerRepository, OrderRepository, ProductRepository};

use crate::errors::{FormRejection, RejectionKind};
use crate::forms::{OrderForm, OrderItemForm};

/// Table row for the order list view, with the read-time total aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRow {
    pub order_id: OrderId,
    pub number: String,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub total_price: u64,
    pub created_at: DateTime<Utc>,
}

pub struct OrderService<O, P, C> {
    orders: O,
    products: P,
    customers: C,
}

impl<O, P, C> OrderService<O, P, C>
where
    O: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    pub fn new(orders: O, products: P, customers: C) -> Self {
        Self {
            orders,
            products,
            customers,
        }
    }

    pub fn create(&self, form: OrderForm, now: DateTime<Utc>) -> Result<Order, FormRejection> {
        let order_id = OrderId::new(RecordId::new());
        let mut errors = BTreeMap::new();
        let mut missing = BTreeMap::new();
        let mut unpriced = BTreeMap::new();

        let customer_id = self.resolve_customer(&form.customer_id, &mut errors, &mut missing);
        let items = self.resolve_items(&form.items, &mut errors, &mut missing, &mut unpriced);

        if !errors.is_empty() {
            tracing::debug!(field_count = errors.len(), "order create rejected");
            return Err(FormRejection::validation(errors));
        }
        if !missing.is_empty() {
            return Err(FormRejection::relationship(missing));
        }
        if !unpriced.is_empty() {
            return Err(FormRejection::aggregation(unpriced));
        }
        let customer_id = customer_id.ok_or_else(|| {
            FormRejection::field(
                RejectionKind::RelationshipIntegrity,
                "customer_id",
                "customer does not exist",
            )
        })?;

        let order = Order::create(CreateOrder {
            order_id,
            customer_id,
            status: form.status,
            notes: form.notes,
            items,
            occurred_at: now,
        })
        .map_err(|e| FormRejection::from_domain("items", e))?;

        self.orders
            .insert(order.clone())
            .map_err(FormRejection::from_store)?;
        tracing::debug!(
            order_id = %order_id,
            number = %order.number(),
            total = order.total_price(),
            "order created"
        );
        Ok(order)
    }

    pub fn update(
        &self,
        id: OrderId,
        form: OrderForm,
        now: DateTime<Utc>,
    ) -> Result<Order, FormRejection> {
        let mut order = self.orders.get(id).ok_or_else(|| {
            FormRejection::field(RejectionKind::RelationshipIntegrity, "id", "order not found")
        })?;

        let mut errors = BTreeMap::new();
        let mut missing = BTreeMap::new();
        let mut unpriced = BTreeMap::new();

        // The customer selection is part of the form; re-resolve it so a
        // stale reference is caught here too.
        let customer_id = self.resolve_customer(&form.customer_id, &mut errors, &mut missing);
        let items = self.resolve_items(&form.items, &mut errors, &mut missing, &mut unpriced);

        if !errors.is_empty() {
            tracing::debug!(order_id = %id, field_count = errors.len(), "order update rejected");
            return Err(FormRejection::validation(errors));
        }
        if !missing.is_empty() {
            return Err(FormRejection::relationship(missing));
        }
        if !unpriced.is_empty() {
            return Err(FormRejection::aggregation(unpriced));
        }

        order
            .update(UpdateOrder {
                customer_id,
                status: Some(form.status),
                notes: form.notes,
                items: Some(items),
                occurred_at: now,
            })
            .map_err(|e| FormRejection::from_domain("items", e))?;

        self.orders
            .update(order.clone())
            .map_err(FormRejection::from_store)?;
        Ok(order)
    }

    pub fn delete(&self, id: OrderId, now: DateTime<Utc>) -> Result<(), FormRejection> {
        let mut order = self.orders.get(id).ok_or_else(|| {
            FormRejection::field(RejectionKind::RelationshipIntegrity, "id", "order not found")
        })?;
        order
            .soft_delete(now)
            .map_err(|e| FormRejection::from_domain("id", e))?;
        self.orders
            .update(order)
            .map_err(FormRejection::from_store)?;
        Ok(())
    }

    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.get(id)
    }

    pub fn list(&self) -> Vec<Order> {
        self.orders.list()
    }

    /// Rows for the order table, joining the customer name.
    pub fn rows(&self) -> Vec<OrderRow> {
        self.orders
            .list()
            .into_iter()
            .map(|order| OrderRow {
                order_id: order.id_typed(),
                number: order.number().to_string(),
                customer_name: self
                    .customers
                    .get(order.customer_id())
                    .map(|c| c.name().to_string()),
                status: order.status(),
                total_price: order.total_price(),
                created_at: order.created_at(),
            })
            .collect()
    }

    /// Sum of all live orders' totals — the table footer summarizer.
    pub fn total_revenue(&self) -> u64 {
        self.orders
            .list()
            .iter()
            .fold(0u64, |acc, order| acc.saturating_add(order.total_price()))
    }

    fn resolve_customer(
        &self,
        raw: &str,
        errors: &mut BTreeMap<String, String>,
        missing: &mut BTreeMap<String, String>,
    ) -> Option<CustomerId> {
        match raw.parse::<RecordId>() {
            Ok(rid) => {
                let customer_id = CustomerId::new(rid);
                if self.customers.get(customer_id).is_some() {
                    Some(customer_id)
                } else {
                    missing.insert(
                        "customer_id".to_string(),
                        "customer does not exist".to_string(),
                    );
                    None
                }
            }
            Err(_) => {
                errors.insert(
                    "customer_id".to_string(),
                    "customer_id is not a valid id".to_string(),
                );
                None
            }
        }
    }

    /// Resolve the item sub-form rows: product existence, positive
    /// quantities, and the unit-price snapshot (captured from the product
    /// when the form leaves it blank).
    fn resolve_items(
        &self,
        rows: &[OrderItemForm],
        errors: &mut BTreeMap<String, String>,
        missing: &mut BTreeMap<String, String>,
        unpriced: &mut BTreeMap<String, String>,
    ) -> Vec<NewOrderItem> {
        let mut items = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            if row.quantity <= 0 {
                errors.insert(
                    format!("items[{idx}].quantity"),
                    "quantity must be positive".to_string(),
                );
            }

            let product = match row.product_id.parse::<RecordId>() {
                Ok(rid) => {
                    let product_id = ProductId::new(rid);
                    match self.products.get(product_id) {
                        Some(product) if product.can_be_ordered() => Some(product),
                        _ => {
                            missing.insert(
                                format!("items[{idx}].product_id"),
                                "product does not exist".to_string(),
                            );
                            None
                        }
                    }
                }
                Err(_) => {
                    errors.insert(
                        format!("items[{idx}].product_id"),
                        "product id is not a valid id".to_string(),
                    );
                    None
                }
            };

            let Some(product) = product else { continue };

            let unit_price = row.unit_price.unwrap_or_else(|| product.price());
            if unit_price == 0 {
                unpriced.insert(
                    format!("items[{idx}].unit_price"),
                    "product has no usable price".to_string(),
                );
                continue;
            }

            items.push(NewOrderItem {
                product_id: product.id_typed(),
                quantity: row.quantity,
                unit_price,
            });
        }
        items
    }
}

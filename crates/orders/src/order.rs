use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopadmin_catalog::ProductId;
use shopadmin_core::{DomainError, DomainResult, Entity, RecordId};
use shopadmin_customers::CustomerId;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub RecordId);

impl OrderId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Declined,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Order line: product reference plus quantity and unit-price snapshot.
///
/// `unit_price` is copied from the product when the operator selects it and
/// is never re-read — later product price changes must not alter historical
/// orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub line_no: u32,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents), snapshotted at
    /// selection time.
    pub unit_price: u64,
}

impl OrderItem {
    /// Line subtotal: quantity × unit price.
    pub fn subtotal(&self) -> u64 {
        // Quantity is validated positive on the way in.
        self.unit_price.saturating_mul(self.quantity.max(0) as u64)
    }
}

/// Item payload for create/update commands, before line numbers are
/// assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: u64,
}

/// Aggregate root: Order, owning its ordered item collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    number: String,
    customer_id: CustomerId,
    status: OrderStatus,
    notes: Option<String>,
    items: Vec<OrderItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Order total: sum of line subtotals, recomputed from the current
    /// items on every call. Zero items means a zero total.
    pub fn total_price(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.subtotal()))
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateOrder. Items are validated and persisted with the order
/// as one unit — any invalid item rejects the whole command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateOrder. `None` fields keep their current value; supplying
/// `items` replaces the whole collection (the item sub-form is edited as a
/// unit with the parent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrder {
    pub customer_id: Option<CustomerId>,
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
    pub items: Option<Vec<NewOrderItem>>,
    pub occurred_at: DateTime<Utc>,
}

impl Order {
    pub fn create(cmd: CreateOrder) -> DomainResult<Self> {
        let items = number_lines(cmd.items)?;

        Ok(Self {
            id: cmd.order_id,
            number: order_number(cmd.order_id),
            customer_id: cmd.customer_id,
            status: cmd.status,
            notes: cmd.notes,
            items,
            created_at: cmd.occurred_at,
            updated_at: cmd.occurred_at,
            deleted_at: None,
        })
    }

    pub fn update(&mut self, cmd: UpdateOrder) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::invariant("cannot edit a deleted order"));
        }

        // Validate the replacement items before touching any state so a bad
        // item leaves the order unchanged.
        let new_items = match cmd.items {
            Some(items) => Some(number_lines(items)?),
            None => None,
        };

        if let Some(customer_id) = cmd.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(status) = cmd.status {
            self.status = status;
        }
        if let Some(notes) = cmd.notes {
            self.notes = Some(notes);
        }
        if let Some(items) = new_items {
            self.items = items;
        }
        self.updated_at = cmd.occurred_at;
        Ok(())
    }

    pub fn soft_delete(&mut self, occurred_at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::conflict("order is already deleted"));
        }
        self.deleted_at = Some(occurred_at);
        self.updated_at = occurred_at;
        Ok(())
    }
}

/// Generated order number: "OR-" plus the first six hex digits of the order
/// id, uppercased. Deterministic in the id, unique because the id is.
pub fn order_number(order_id: OrderId) -> String {
    let hex = order_id.0.short_hex();
    format!("OR-{}", hex[..6].to_uppercase())
}

fn number_lines(items: Vec<NewOrderItem>) -> DomainResult<Vec<OrderItem>> {
    let mut lines = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        if item.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if item.unit_price == 0 {
            return Err(DomainError::validation("unit_price must be positive"));
        }
        lines.push(OrderItem {
            line_no: (idx as u32) + 1,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        });
    }
    Ok(lines)
}

//! Typed form payloads.
//!
//! These are the structured form-submission shapes the admin UI posts: one
//! struct per resource, used for both create and edit. Ids arrive as
//! strings and are parsed (and reported per field) by the services.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use shopadmin_catalog::ProductType;
use shopadmin_orders::OrderStatus;

fn default_true() -> bool {
    true
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandForm {
    pub name: String,
    /// Operator-edited slug. Absent on create: derived from the name.
    /// Absent on edit: the stored slug is kept as-is.
    pub slug: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub primary_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub brand_id: Option<String>,
    pub name: String,
    pub slug: Option<String>,
    pub sku: String,
    pub description: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    /// Stock on hand.
    pub quantity: i64,
    #[serde(rename = "type")]
    pub kind: ProductType,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    /// Upload path produced by the admin-UI file handling; opaque here.
    pub image: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub slug: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerForm {
    pub name: String,
    pub email: Option<String>,
}

/// One row of the repeated order-item sub-form.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemForm {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Unit price snapshot. Absent: captured from the selected product at
    /// save time; never live-bound afterwards.
    pub unit_price: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderForm {
    pub customer_id: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemForm>,
}

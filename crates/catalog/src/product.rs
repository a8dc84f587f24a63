use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopadmin_core::{DomainError, DomainResult, Entity, RecordId, Slug};

use crate::brand::BrandId;

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub RecordId);

impl ProductId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Fulfilment kind of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Downloadable,
    Deliverable,
}

/// Entity: Product — a sellable item, optionally owned by a brand.
///
/// Category associations are a store-level join (many-to-many), not a field
/// here; see the store crate's `replace_categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    brand_id: Option<BrandId>,
    name: String,
    slug: Slug,
    sku: String,
    description: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    price: u64,
    /// Stock on hand.
    quantity: i64,
    kind: ProductType,
    is_visible: bool,
    is_featured: bool,
    published_at: Option<DateTime<Utc>>,
    /// Upload path managed by the admin-UI layer; opaque here.
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn brand_id(&self) -> Option<BrandId> {
        self.brand_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn kind(&self) -> ProductType {
        self.kind
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn is_featured(&self) -> bool {
        self.is_featured
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
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

    /// Whether new order items may reference this product.
    ///
    /// Historical order items keep their own price/quantity snapshots, so
    /// this only gates new selections.
    pub fn can_be_ordered(&self) -> bool {
        self.deleted_at.is_none()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub brand_id: Option<BrandId>,
    pub name: String,
    /// Operator-edited slug; when absent the slug is derived from the name.
    pub slug: Option<Slug>,
    pub sku: String,
    pub description: Option<String>,
    pub price: u64,
    pub quantity: i64,
    pub kind: ProductType,
    pub is_visible: bool,
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateProduct.
///
/// `None` fields keep their current value; `brand_id` is doubly optional so
/// the brand association can also be cleared (`Some(None)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub brand_id: Option<Option<BrandId>>,
    pub name: Option<String>,
    pub slug: Option<Slug>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub quantity: Option<i64>,
    pub kind: Option<ProductType>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl Product {
    pub fn create(cmd: CreateProduct) -> DomainResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let sku = cmd.sku.trim();
        if sku.is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        ensure_price(cmd.price)?;
        ensure_stock(cmd.quantity)?;

        let slug = match cmd.slug {
            Some(slug) => slug,
            None => Slug::derive(name, cmd.product_id.0),
        };

        Ok(Self {
            id: cmd.product_id,
            brand_id: cmd.brand_id,
            name: name.to_string(),
            slug,
            sku: sku.to_string(),
            description: cmd.description,
            price: cmd.price,
            quantity: cmd.quantity,
            kind: cmd.kind,
            is_visible: cmd.is_visible,
            is_featured: cmd.is_featured,
            published_at: cmd.published_at,
            image: cmd.image,
            created_at: cmd.occurred_at,
            updated_at: cmd.occurred_at,
            deleted_at: None,
        })
    }

    pub fn update(&mut self, cmd: UpdateProduct) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::invariant("cannot edit a deleted product"));
        }

        let new_name = cmd.name.unwrap_or_else(|| self.name.clone());
        if new_name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let new_sku = cmd.sku.unwrap_or_else(|| self.sku.clone());
        if new_sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if let Some(price) = cmd.price {
            ensure_price(price)?;
        }
        if let Some(quantity) = cmd.quantity {
            ensure_stock(quantity)?;
        }

        self.name = new_name.trim().to_string();
        self.sku = new_sku.trim().to_string();
        if let Some(brand_id) = cmd.brand_id {
            self.brand_id = brand_id;
        }
        if let Some(slug) = cmd.slug {
            self.slug = slug;
        }
        if let Some(description) = cmd.description {
            self.description = Some(description);
        }
        if let Some(price) = cmd.price {
            self.price = price;
        }
        if let Some(quantity) = cmd.quantity {
            self.quantity = quantity;
        }
        if let Some(kind) = cmd.kind {
            self.kind = kind;
        }
        if let Some(is_visible) = cmd.is_visible {
            self.is_visible = is_visible;
        }
        if let Some(is_featured) = cmd.is_featured {
            self.is_featured = is_featured;
        }
        if let Some(published_at) = cmd.published_at {
            self.published_at = Some(published_at);
        }
        if let Some(image) = cmd.image {
            self.image = Some(image);
        }
        self.updated_at = cmd.occurred_at;
        Ok(())
    }

    /// Soft-delete the product.
    ///
    /// Order items that reference it carry their own quantity/unit_price
    /// snapshots, so order history is preserved.
    pub fn soft_delete(&mut self, occurred_at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::conflict("product is already deleted"));
        }
        self.deleted_at = Some(occurred_at);
        self.updated_at = occurred_at;
        Ok(())
    }
}

fn ensure_price(price: u64) -> DomainResult<()> {
    if price == 0 {
        return Err(DomainError::validation("price must be positive"));
    }
    Ok(())
}

fn ensure_stock(quantity: i64) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity cannot be negative"));
    }
    Ok(())
}

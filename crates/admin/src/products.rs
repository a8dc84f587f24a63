//! Product resource service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use shopadmin_catalog::{
    Brand, BrandId, CategoryId, CreateProduct, Product, ProductId, UpdateProduct,
};
use shopadmin_core::{RecordId, Slug};
use shopadmin_store::{BrandRepository, CategoryRepository, ProductRepository};

use crate::errors::{FormRejection, RejectionKind};
use crate::forms::ProductForm;

/// Saves and queries products, including the brand association and the
/// category attach/detach set.
pub struct ProductService<P, B, C> {
    products: P,
    brands: B,
    categories: C,
}

impl<P, B, C> ProductService<P, B, C>
where
    P: ProductRepository,
    B: BrandRepository,
    C: CategoryRepository,
{
    pub fn new(products: P, brands: B, categories: C) -> Self {
        Self {
            products,
            brands,
            categories,
        }
    }

    pub fn create(&self, form: ProductForm, now: DateTime<Utc>) -> Result<Product, FormRejection> {
        let product_id = ProductId::new(RecordId::new());
        let mut errors = BTreeMap::new();
        let mut missing = BTreeMap::new();

        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "name is required".to_string());
        }
        let sku = form.sku.trim().to_string();
        if sku.is_empty() {
            errors.insert("sku".to_string(), "sku is required".to_string());
        }
        if form.price == 0 {
            errors.insert("price".to_string(), "price must be positive".to_string());
        }
        if form.quantity < 0 {
            errors.insert(
                "quantity".to_string(),
                "quantity cannot be negative".to_string(),
            );
        }
        let slug = parse_slug(form.slug.as_deref(), &mut errors);

        let brand_id = self.resolve_brand(form.brand_id.as_deref(), &mut errors, &mut missing);
        let category_ids = self.resolve_categories(&form.category_ids, &mut errors, &mut missing);

        if !name.is_empty() && !sku.is_empty() {
            let slug = slug
                .clone()
                .unwrap_or_else(|| Slug::derive(&name, product_id.0));
            self.check_uniques(&name, &slug, &sku, None, &mut errors);
        }
        if !errors.is_empty() {
            tracing::debug!(field_count = errors.len(), "product create rejected");
            return Err(FormRejection::validation(errors));
        }
        if !missing.is_empty() {
            return Err(FormRejection::relationship(missing));
        }

        let product = Product::create(CreateProduct {
            product_id,
            brand_id,
            name,
            slug,
            sku,
            description: form.description,
            price: form.price,
            quantity: form.quantity,
            kind: form.kind,
            is_visible: form.is_visible,
            is_featured: form.is_featured,
            published_at: form.published_at,
            image: form.image,
            occurred_at: now,
        })
        .map_err(|e| FormRejection::from_domain("name", e))?;

        self.products
            .insert(product.clone())
            .map_err(FormRejection::from_store)?;
        self.products
            .replace_categories(product_id, category_ids)
            .map_err(FormRejection::from_store)?;
        tracing::debug!(product_id = %product_id, sku = %product.sku(), "product created");
        Ok(product)
    }

    pub fn update(
        &self,
        id: ProductId,
        form: ProductForm,
        now: DateTime<Utc>,
    ) -> Result<Product, FormRejection> {
        let mut product = self.products.get(id).ok_or_else(|| {
            FormRejection::field(
                RejectionKind::RelationshipIntegrity,
                "id",
                "product not found",
            )
        })?;

        let mut errors = BTreeMap::new();
        let mut missing = BTreeMap::new();

        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "name is required".to_string());
        }
        let sku = form.sku.trim().to_string();
        if sku.is_empty() {
            errors.insert("sku".to_string(), "sku is required".to_string());
        }
        if form.price == 0 {
            errors.insert("price".to_string(), "price must be positive".to_string());
        }
        if form.quantity < 0 {
            errors.insert(
                "quantity".to_string(),
                "quantity cannot be negative".to_string(),
            );
        }
        let slug = parse_slug(form.slug.as_deref(), &mut errors);

        let brand_id = self.resolve_brand(form.brand_id.as_deref(), &mut errors, &mut missing);
        let category_ids = self.resolve_categories(&form.category_ids, &mut errors, &mut missing);

        if !name.is_empty() && !sku.is_empty() {
            let candidate = slug.clone().unwrap_or_else(|| product.slug().clone());
            self.check_uniques(&name, &candidate, &sku, Some(id), &mut errors);
        }
        if !errors.is_empty() {
            tracing::debug!(product_id = %id, field_count = errors.len(), "product update rejected");
            return Err(FormRejection::validation(errors));
        }
        if !missing.is_empty() {
            return Err(FormRejection::relationship(missing));
        }

        product
            .update(UpdateProduct {
                // The full form is submitted on edit, so an absent brand_id
                // clears the association rather than keeping it.
                brand_id: Some(brand_id),
                name: Some(name),
                slug,
                sku: Some(sku),
                description: form.description,
                price: Some(form.price),
                quantity: Some(form.quantity),
                kind: Some(form.kind),
                is_visible: Some(form.is_visible),
                is_featured: Some(form.is_featured),
                published_at: form.published_at,
                image: form.image,
                occurred_at: now,
            })
            .map_err(|e| FormRejection::from_domain("name", e))?;

        self.products
            .update(product.clone())
            .map_err(FormRejection::from_store)?;
        self.products
            .replace_categories(id, category_ids)
            .map_err(FormRejection::from_store)?;
        Ok(product)
    }

    /// Soft-delete the product. Historical order items keep their own
    /// quantity/unit_price snapshots, so order history survives.
    pub fn delete(&self, id: ProductId, now: DateTime<Utc>) -> Result<(), FormRejection> {
        let mut product = self.products.get(id).ok_or_else(|| {
            FormRejection::field(
                RejectionKind::RelationshipIntegrity,
                "id",
                "product not found",
            )
        })?;
        product
            .soft_delete(now)
            .map_err(|e| FormRejection::from_domain("id", e))?;
        self.products
            .update(product)
            .map_err(FormRejection::from_store)?;
        tracing::debug!(product_id = %id, "product soft-deleted");
        Ok(())
    }

    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.products.get(id)
    }

    pub fn list(&self) -> Vec<Product> {
        self.products.list()
    }

    /// The visibility filter the product table exposes.
    pub fn list_visible(&self) -> Vec<Product> {
        self.products
            .list()
            .into_iter()
            .filter(Product::is_visible)
            .collect()
    }

    pub fn categories_of(&self, id: ProductId) -> Vec<CategoryId> {
        self.products.categories_of(id)
    }

    pub fn brand_of(&self, product: &Product) -> Option<Brand> {
        product.brand_id().and_then(|id| self.brands.get(id))
    }

    fn resolve_brand(
        &self,
        raw: Option<&str>,
        errors: &mut BTreeMap<String, String>,
        missing: &mut BTreeMap<String, String>,
    ) -> Option<BrandId> {
        let raw = raw?;
        match raw.parse::<RecordId>() {
            Ok(rid) => {
                let brand_id = BrandId::new(rid);
                match self.brands.get(brand_id) {
                    Some(brand) if !brand.is_deleted() => Some(brand_id),
                    _ => {
                        missing.insert("brand_id".to_string(), "brand does not exist".to_string());
                        None
                    }
                }
            }
            Err(_) => {
                errors.insert(
                    "brand_id".to_string(),
                    "brand_id is not a valid id".to_string(),
                );
                None
            }
        }
    }

    fn resolve_categories(
        &self,
        raw_ids: &[String],
        errors: &mut BTreeMap<String, String>,
        missing: &mut BTreeMap<String, String>,
    ) -> Vec<CategoryId> {
        let mut ids = Vec::with_capacity(raw_ids.len());
        for (idx, raw) in raw_ids.iter().enumerate() {
            match raw.parse::<RecordId>() {
                Ok(rid) => {
                    let category_id = CategoryId::new(rid);
                    match self.categories.get(category_id) {
                        Some(category) if !category.is_deleted() => ids.push(category_id),
                        _ => {
                            missing.insert(
                                format!("category_ids[{idx}]"),
                                "category does not exist".to_string(),
                            );
                        }
                    }
                }
                Err(_) => {
                    errors.insert(
                        format!("category_ids[{idx}]"),
                        "category id is not a valid id".to_string(),
                    );
                }
            }
        }
        ids
    }

    fn check_uniques(
        &self,
        name: &str,
        slug: &Slug,
        sku: &str,
        exclude: Option<ProductId>,
        errors: &mut BTreeMap<String, String>,
    ) {
        if let Some(other) = self.products.find_by_name(name) {
            if Some(other.id_typed()) != exclude {
                errors.insert("name".to_string(), "name is already in use".to_string());
            }
        }
        if let Some(other) = self.products.find_by_slug(slug) {
            if Some(other.id_typed()) != exclude {
                errors.insert("slug".to_string(), "slug is already in use".to_string());
            }
        }
        if let Some(other) = self.products.find_by_sku(sku) {
            if Some(other.id_typed()) != exclude {
                errors.insert("sku".to_string(), "sku is already in use".to_string());
            }
        }
    }
}

fn parse_slug(raw: Option<&str>, errors: &mut BTreeMap<String, String>) -> Option<Slug> {
    match raw {
        Some(raw) => match Slug::parse(raw) {
            Ok(slug) => Some(slug),
            Err(e) => {
                errors.insert("slug".to_string(), e.to_string());
                None
            }
        },
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use shopadmin_catalog::ProductType;
    use shopadmin_store::InMemoryStore;

    use crate::brands::BrandService;
    use crate::categories::CategoryService;
    use crate::forms::{BrandForm, CategoryForm};

    type Svc = ProductService<Arc<InMemoryStore>, Arc<InMemoryStore>, Arc<InMemoryStore>>;

    fn services() -> (Svc, BrandService<Arc<InMemoryStore>>, CategoryService<Arc<InMemoryStore>>) {
        let store = Arc::new(InMemoryStore::new());
        (
            ProductService::new(store.clone(), store.clone(), store.clone()),
            BrandService::new(store.clone()),
            CategoryService::new(store),
        )
    }

    fn form(name: &str, sku: &str) -> ProductForm {
        ProductForm {
            brand_id: None,
            name: name.to_string(),
            slug: None,
            sku: sku.to_string(),
            description: None,
            price: 1000,
            quantity: 5,
            kind: ProductType::Deliverable,
            is_visible: true,
            is_featured: false,
            published_at: None,
            image: None,
            category_ids: vec![],
        }
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn create_with_brand_and_categories() {
        let (products, brands, categories) = services();
        let brand = brands
            .create(
                BrandForm {
                    name: "Acme Co".to_string(),
                    slug: None,
                    url: None,
                    description: None,
                    is_visible: true,
                    is_featured: false,
                    published_at: None,
                    primary_color: None,
                },
                now(),
            )
            .unwrap();
        let category = categories
            .create(
                CategoryForm {
                    name: "Tools".to_string(),
                    slug: None,
                    is_visible: true,
                },
                now(),
            )
            .unwrap();

        let mut f = form("Widget", "SKU-001");
        f.brand_id = Some(brand.id_typed().to_string());
        f.category_ids = vec![category.id_typed().to_string()];
        let product = products.create(f, now()).unwrap();

        assert_eq!(product.brand_id(), Some(brand.id_typed()));
        assert_eq!(
            products.categories_of(product.id_typed()),
            vec![category.id_typed()]
        );
        assert_eq!(product.slug().as_str(), "widget");
    }

    #[test]
    fn missing_brand_is_a_relationship_rejection() {
        let (products, _, _) = services();
        let mut f = form("Widget", "SKU-001");
        f.brand_id = Some(RecordId::new().to_string());

        let rejection = products.create(f, now()).unwrap_err();
        assert_eq!(rejection.kind(), RejectionKind::RelationshipIntegrity);
        assert!(rejection.error_on("brand_id").is_some());
        assert!(products.list().is_empty());
    }

    #[test]
    fn malformed_brand_id_is_a_validation_rejection() {
        let (products, _, _) = services();
        let mut f = form("Widget", "SKU-001");
        f.brand_id = Some("not-a-uuid".to_string());

        let rejection = products.create(f, now()).unwrap_err();
        assert_eq!(rejection.kind(), RejectionKind::Validation);
        assert!(rejection.error_on("brand_id").is_some());
    }

    #[test]
    fn duplicate_sku_is_field_flagged() {
        let (products, _, _) = services();
        products.create(form("Widget", "SKU-001"), now()).unwrap();

        let rejection = products.create(form("Gadget", "SKU-001"), now()).unwrap_err();
        assert_eq!(rejection.kind(), RejectionKind::Validation);
        assert!(rejection.error_on("sku").is_some());
        assert!(rejection.error_on("name").is_none());
        assert_eq!(products.list().len(), 1);
    }

    #[test]
    fn zero_price_is_rejected() {
        let (products, _, _) = services();
        let mut f = form("Widget", "SKU-001");
        f.price = 0;
        let rejection = products.create(f, now()).unwrap_err();
        assert!(rejection.error_on("price").is_some());
    }

    #[test]
    fn rename_keeps_slug_and_sku_checks_exclude_self() {
        let (products, _, _) = services();
        let product = products.create(form("Widget", "SKU-001"), now()).unwrap();

        let updated = products
            .update(product.id_typed(), form("Widget Mk II", "SKU-001"), now())
            .unwrap();
        assert_eq!(updated.name(), "Widget Mk II");
        assert_eq!(updated.slug().as_str(), "widget");
        assert_eq!(updated.sku(), "SKU-001");
    }

    #[test]
    fn update_replaces_category_set() {
        let (products, _, categories) = services();
        let a = categories
            .create(
                CategoryForm {
                    name: "Tools".to_string(),
                    slug: None,
                    is_visible: true,
                },
                now(),
            )
            .unwrap();
        let b = categories
            .create(
                CategoryForm {
                    name: "Hardware".to_string(),
                    slug: None,
                    is_visible: true,
                },
                now(),
            )
            .unwrap();

        let mut f = form("Widget", "SKU-001");
        f.category_ids = vec![a.id_typed().to_string()];
        let product = products.create(f, now()).unwrap();

        let mut f = form("Widget", "SKU-001");
        f.category_ids = vec![b.id_typed().to_string()];
        products.update(product.id_typed(), f, now()).unwrap();

        assert_eq!(
            products.categories_of(product.id_typed()),
            vec![b.id_typed()]
        );
    }

    #[test]
    fn visibility_filter_hides_invisible_products() {
        let (products, _, _) = services();
        products.create(form("Widget", "SKU-001"), now()).unwrap();
        let mut hidden = form("Gadget", "SKU-002");
        hidden.is_visible = false;
        products.create(hidden, now()).unwrap();

        assert_eq!(products.list().len(), 2);
        let visible = products.list_visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name(), "Widget");
    }
}

//! Brand resource service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use shopadmin_catalog::brand::validate_primary_color;
use shopadmin_catalog::{Brand, BrandId, CreateBrand, UpdateBrand};
use shopadmin_core::{RecordId, Slug};
use shopadmin_store::BrandRepository;

use crate::errors::{FormRejection, RejectionKind};
use crate::forms::BrandForm;

/// Saves and queries brands. Uniqueness of name and slug is checked here,
/// against the repository, ignoring the record being edited; the store
/// enforces the same constraints again on write.
pub struct BrandService<B> {
    brands: B,
}

impl<B> BrandService<B>
where
    B: BrandRepository,
{
    pub fn new(brands: B) -> Self {
        Self { brands }
    }

    pub fn create(&self, form: BrandForm, now: DateTime<Utc>) -> Result<Brand, FormRejection> {
        let brand_id = BrandId::new(RecordId::new());
        let mut errors = BTreeMap::new();

        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "name is required".to_string());
        }
        let slug = parse_slug(form.slug.as_deref(), &mut errors);
        if let Some(color) = form.primary_color.as_deref() {
            if let Err(e) = validate_primary_color(color) {
                errors.insert("primary_color".to_string(), e.to_string());
            }
        }

        // Only derive and scan for collisions once the name itself is valid.
        if !name.is_empty() {
            let slug = slug
                .clone()
                .unwrap_or_else(|| Slug::derive(&name, brand_id.0));
            self.check_uniques(&name, &slug, None, &mut errors);
        }
        if !errors.is_empty() {
            tracing::debug!(field_count = errors.len(), "brand create rejected");
            return Err(FormRejection::validation(errors));
        }

        let brand = Brand::create(CreateBrand {
            brand_id,
            name,
            slug,
            url: form.url,
            description: form.description,
            is_visible: form.is_visible,
            is_featured: form.is_featured,
            published_at: form.published_at,
            primary_color: form.primary_color,
            occurred_at: now,
        })
        .map_err(|e| FormRejection::from_domain("name", e))?;

        self.brands
            .insert(brand.clone())
            .map_err(FormRejection::from_store)?;
        tracing::debug!(brand_id = %brand.id_typed(), slug = %brand.slug(), "brand created");
        Ok(brand)
    }

    pub fn update(
        &self,
        id: BrandId,
        form: BrandForm,
        now: DateTime<Utc>,
    ) -> Result<Brand, FormRejection> {
        let mut brand = self.brands.get(id).ok_or_else(|| {
            FormRejection::field(RejectionKind::RelationshipIntegrity, "id", "brand not found")
        })?;

        let mut errors = BTreeMap::new();
        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "name is required".to_string());
        }
        let slug = parse_slug(form.slug.as_deref(), &mut errors);
        if let Some(color) = form.primary_color.as_deref() {
            if let Err(e) = validate_primary_color(color) {
                errors.insert("primary_color".to_string(), e.to_string());
            }
        }

        // The stored slug only changes when the operator supplied one.
        if !name.is_empty() {
            let candidate = slug.clone().unwrap_or_else(|| brand.slug().clone());
            self.check_uniques(&name, &candidate, Some(id), &mut errors);
        }
        if !errors.is_empty() {
            tracing::debug!(brand_id = %id, field_count = errors.len(), "brand update rejected");
            return Err(FormRejection::validation(errors));
        }

        brand
            .update(UpdateBrand {
                name: Some(name),
                slug,
                url: form.url,
                description: form.description,
                is_visible: Some(form.is_visible),
                is_featured: Some(form.is_featured),
                published_at: form.published_at,
                primary_color: form.primary_color,
                occurred_at: now,
            })
            .map_err(|e| FormRejection::from_domain("name", e))?;

        self.brands
            .update(brand.clone())
            .map_err(FormRejection::from_store)?;
        Ok(brand)
    }

    /// Soft-delete the brand. Its products keep their `brand_id`.
    pub fn delete(&self, id: BrandId, now: DateTime<Utc>) -> Result<(), FormRejection> {
        let mut brand = self.brands.get(id).ok_or_else(|| {
            FormRejection::field(RejectionKind::RelationshipIntegrity, "id", "brand not found")
        })?;
        brand
            .soft_delete(now)
            .map_err(|e| FormRejection::from_domain("id", e))?;
        self.brands
            .update(brand)
            .map_err(FormRejection::from_store)?;
        tracing::debug!(brand_id = %id, "brand soft-deleted");
        Ok(())
    }

    pub fn get(&self, id: BrandId) -> Option<Brand> {
        self.brands.get(id)
    }

    pub fn list(&self) -> Vec<Brand> {
        self.brands.list()
    }

    fn check_uniques(
        &self,
        name: &str,
        slug: &Slug,
        exclude: Option<BrandId>,
        errors: &mut BTreeMap<String, String>,
    ) {
        if let Some(other) = self.brands.find_by_name(name) {
            if Some(other.id_typed()) != exclude {
                errors.insert("name".to_string(), "name is already in use".to_string());
            }
        }
        if let Some(other) = self.brands.find_by_slug(slug) {
            if Some(other.id_typed()) != exclude {
                errors.insert("slug".to_string(), "slug is already in use".to_string());
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

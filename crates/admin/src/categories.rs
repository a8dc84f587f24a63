//! Category resource service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use shopadmin_catalog::{Category, CategoryId, CreateCategory, UpdateCategory};
use shopadmin_core::{RecordId, Slug};
use shopadmin_store::CategoryRepository;

use crate::errors::{FormRejection, RejectionKind};
use crate::forms::CategoryForm;

pub struct CategoryService<C> {
    categories: C,
}

impl<C> CategoryService<C>
where
    C: CategoryRepository,
{
    pub fn new(categories: C) -> Self {
        Self { categories }
    }

    pub fn create(&self, form: CategoryForm, now: DateTime<Utc>) -> Result<Category, FormRejection> {
        let category_id = CategoryId::new(RecordId::new());
        let mut errors = BTreeMap::new();

        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "name is required".to_string());
        }
        let slug = match form.slug.as_deref() {
            Some(raw) => match Slug::parse(raw) {
                Ok(slug) => Some(slug),
                Err(e) => {
                    errors.insert("slug".to_string(), e.to_string());
                    None
                }
            },
            None => None,
        };

        if !name.is_empty() {
            let slug = slug
                .clone()
                .unwrap_or_else(|| Slug::derive(&name, category_id.0));
            self.check_uniques(&name, &slug, None, &mut errors);
        }
        if !errors.is_empty() {
            return Err(FormRejection::validation(errors));
        }

        let category = Category::create(CreateCategory {
            category_id,
            name,
            slug,
            is_visible: form.is_visible,
            occurred_at: now,
        })
        .map_err(|e| FormRejection::from_domain("name", e))?;

        self.categories
            .insert(category.clone())
            .map_err(FormRejection::from_store)?;
        Ok(category)
    }

    pub fn update(
        &self,
        id: CategoryId,
        form: CategoryForm,
        now: DateTime<Utc>,
    ) -> Result<Category, FormRejection> {
        let mut category = self.categories.get(id).ok_or_else(|| {
            FormRejection::field(
                RejectionKind::RelationshipIntegrity,
                "id",
                "category not found",
            )
        })?;

        let mut errors = BTreeMap::new();
        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "name is required".to_string());
        }
        let slug = match form.slug.as_deref() {
            Some(raw) => match Slug::parse(raw) {
                Ok(slug) => Some(slug),
                Err(e) => {
                    errors.insert("slug".to_string(), e.to_string());
                    None
                }
            },
            None => None,
        };

        if !name.is_empty() {
            let candidate = slug.clone().unwrap_or_else(|| category.slug().clone());
            self.check_uniques(&name, &candidate, Some(id), &mut errors);
        }
        if !errors.is_empty() {
            return Err(FormRejection::validation(errors));
        }

        category
            .update(UpdateCategory {
                name: Some(name),
                slug,
                is_visible: Some(form.is_visible),
                occurred_at: now,
            })
            .map_err(|e| FormRejection::from_domain("name", e))?;

        self.categories
            .update(category.clone())
            .map_err(FormRejection::from_store)?;
        Ok(category)
    }

    pub fn delete(&self, id: CategoryId, now: DateTime<Utc>) -> Result<(), FormRejection> {
        let mut category = self.categories.get(id).ok_or_else(|| {
            FormRejection::field(
                RejectionKind::RelationshipIntegrity,
                "id",
                "category not found",
            )
        })?;
        category
            .soft_delete(now)
            .map_err(|e| FormRejection::from_domain("id", e))?;
        self.categories
            .update(category)
            .map_err(FormRejection::from_store)?;
        Ok(())
    }

    pub fn get(&self, id: CategoryId) -> Option<Category> {
        self.categories.get(id)
    }

    pub fn list(&self) -> Vec<Category> {
        self.categories.list()
    }

    fn check_uniques(
        &self,
        name: &str,
        slug: &Slug,
        exclude: Option<CategoryId>,
        errors: &mut BTreeMap<String, String>,
    ) {
        if let Some(other) = self.categories.find_by_name(name) {
            if Some(other.id_typed()) != exclude {
                errors.insert("name".to_string(), "name is already in use".to_string());
            }
        }
        if let Some(other) = self.categories.find_by_slug(slug) {
            if Some(other.id_typed()) != exclude {
                errors.insert("slug".to_string(), "slug is already in use".to_string());
            }
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopadmin_core::{DomainError, DomainResult, Entity, RecordId, Slug};

/// Category identifier. Ordered so category sets stay in a stable order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub RecordId);

impl CategoryId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Entity: Category — a catalog grouping products attach to (many-to-many).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    slug: Slug,
    is_visible: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateCategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategory {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: Option<Slug>,
    pub is_visible: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateCategory. `None` fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<Slug>,
    pub is_visible: Option<bool>,
    pub occurred_at: DateTime<Utc>,
}

impl Category {
    pub fn create(cmd: CreateCategory) -> DomainResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let slug = match cmd.slug {
            Some(slug) => slug,
            None => Slug::derive(name, cmd.category_id.0),
        };

        Ok(Self {
            id: cmd.category_id,
            name: name.to_string(),
            slug,
            is_visible: cmd.is_visible,
            created_at: cmd.occurred_at,
            updated_at: cmd.occurred_at,
            deleted_at: None,
        })
    }

    pub fn update(&mut self, cmd: UpdateCategory) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::invariant("cannot edit a deleted category"));
        }

        let new_name = cmd.name.unwrap_or_else(|| self.name.clone());
        if new_name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        self.name = new_name.trim().to_string();
        if let Some(slug) = cmd.slug {
            self.slug = slug;
        }
        if let Some(is_visible) = cmd.is_visible {
            self.is_visible = is_visible;
        }
        self.updated_at = cmd.occurred_at;
        Ok(())
    }

    pub fn soft_delete(&mut self, occurred_at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::conflict("category is already deleted"));
        }
        self.deleted_at = Some(occurred_at);
        self.updated_at = occurred_at;
        Ok(())
    }
}

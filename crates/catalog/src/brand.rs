use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopadmin_core::{DomainError, DomainResult, Entity, RecordId, Slug};

/// Brand identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(pub RecordId);

impl BrandId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for BrandId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Entity: Brand — a named catalog grouping with a unique slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    id: BrandId,
    name: String,
    slug: Slug,
    url: Option<String>,
    description: Option<String>,
    is_visible: bool,
    is_featured: bool,
    published_at: Option<DateTime<Utc>>,
    /// Brand color as a `#rrggbb` hex string.
    primary_color: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Brand {
    pub fn id_typed(&self) -> BrandId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
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

    pub fn primary_color(&self) -> Option<&str> {
        self.primary_color.as_deref()
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
}

impl Entity for Brand {
    type Id = BrandId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateBrand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBrand {
    pub brand_id: BrandId,
    pub name: String,
    /// Operator-edited slug; when absent the slug is derived from the name.
    pub slug: Option<Slug>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub is_visible: bool,
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub primary_color: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateBrand.
///
/// `None` fields keep their current value. The slug is never recomputed from
/// a renamed brand; only an explicitly supplied slug replaces the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBrand {
    pub name: Option<String>,
    pub slug: Option<Slug>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub primary_color: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl Brand {
    /// Create a brand from a validated command.
    ///
    /// The slug is derived from the name here, once; see [`UpdateBrand`] for
    /// the rename semantics.
    pub fn create(cmd: CreateBrand) -> DomainResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if let Some(color) = cmd.primary_color.as_deref() {
            ensure_hex_color(color)?;
        }

        let slug = match cmd.slug {
            Some(slug) => slug,
            None => Slug::derive(name, cmd.brand_id.0),
        };

        Ok(Self {
            id: cmd.brand_id,
            name: name.to_string(),
            slug,
            url: cmd.url,
            description: cmd.description,
            is_visible: cmd.is_visible,
            is_featured: cmd.is_featured,
            published_at: cmd.published_at,
            primary_color: cmd.primary_color,
            created_at: cmd.occurred_at,
            updated_at: cmd.occurred_at,
            deleted_at: None,
        })
    }

    pub fn update(&mut self, cmd: UpdateBrand) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::invariant("cannot edit a deleted brand"));
        }

        let new_name = cmd.name.unwrap_or_else(|| self.name.clone());
        if new_name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if let Some(color) = cmd.primary_color.as_deref() {
            ensure_hex_color(color)?;
        }

        self.name = new_name.trim().to_string();
        if let Some(slug) = cmd.slug {
            self.slug = slug;
        }
        if let Some(url) = cmd.url {
            self.url = Some(url);
        }
        if let Some(description) = cmd.description {
            self.description = Some(description);
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
        if let Some(color) = cmd.primary_color {
            self.primary_color = Some(color);
        }
        self.updated_at = cmd.occurred_at;
        Ok(())
    }

    /// Soft-delete the brand. Products referencing it are left untouched.
    pub fn soft_delete(&mut self, occurred_at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::conflict("brand is already deleted"));
        }
        self.deleted_at = Some(occurred_at);
        self.updated_at = occurred_at;
        Ok(())
    }
}

/// Validate a `#rrggbb` hex color string.
///
/// Shared with the form layer so color problems can be reported against the
/// `primary_color` field before the entity is built.
pub fn validate_primary_color(color: &str) -> DomainResult<()> {
    ensure_hex_color(color)
}

fn ensure_hex_color(color: &str) -> DomainResult<()> {
    let ok = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if ok {
        Ok(())
    } else {
        Err(DomainError::validation(
            "primary_color must be a #rrggbb hex string",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_brand_id() -> BrandId {
        BrandId::new(RecordId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn create_cmd(name: &str) -> CreateBrand {
        CreateBrand {
            brand_id: test_brand_id(),
            name: name.to_string(),
            slug: None,
            url: None,
            description: None,
            is_visible: true,
            is_featured: false,
            published_at: None,
            primary_color: None,
            occurred_at: test_time(),
        }
    }

    #[test]
    fn create_derives_slug_from_name() {
        let brand = Brand::create(create_cmd("Acme Co")).unwrap();
        assert_eq!(brand.name(), "Acme Co");
        assert_eq!(brand.slug().as_str(), "acme-co");
        assert!(brand.is_visible());
        assert!(!brand.is_deleted());
    }

    #[test]
    fn create_honors_operator_supplied_slug() {
        let mut cmd = create_cmd("Acme Co");
        cmd.slug = Some(Slug::parse("acme-corporation").unwrap());
        let brand = Brand::create(cmd).unwrap();
        assert_eq!(brand.slug().as_str(), "acme-corporation");
    }

    #[test]
    fn create_rejects_empty_name() {
        let err = Brand::create(create_cmd("   ")).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn create_rejects_malformed_primary_color() {
        for bad in ["red", "#12345", "#12345g", "123456"] {
            let mut cmd = create_cmd("Acme Co");
            cmd.primary_color = Some(bad.to_string());
            assert!(Brand::create(cmd).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn create_accepts_hex_primary_color() {
        let mut cmd = create_cmd("Acme Co");
        cmd.primary_color = Some("#1a2b3c".to_string());
        let brand = Brand::create(cmd).unwrap();
        assert_eq!(brand.primary_color(), Some("#1a2b3c"));
    }

    #[test]
    fn rename_keeps_existing_slug() {
        let mut brand = Brand::create(create_cmd("Acme Co")).unwrap();
        brand
            .update(UpdateBrand {
                name: Some("Acme Corporation".to_string()),
                slug: None,
                url: None,
                description: None,
                is_visible: None,
                is_featured: None,
                published_at: None,
                primary_color: None,
                occurred_at: test_time(),
            })
            .unwrap();
        assert_eq!(brand.name(), "Acme Corporation");
        assert_eq!(brand.slug().as_str(), "acme-co");
    }

    #[test]
    fn explicit_slug_on_update_replaces_stored_slug() {
        let mut brand = Brand::create(create_cmd("Acme Co")).unwrap();
        brand
            .update(UpdateBrand {
                name: None,
                slug: Some(Slug::parse("acme").unwrap()),
                url: None,
                description: None,
                is_visible: None,
                is_featured: None,
                published_at: None,
                primary_color: None,
                occurred_at: test_time(),
            })
            .unwrap();
        assert_eq!(brand.slug().as_str(), "acme");
    }

    #[test]
    fn soft_delete_marks_brand_and_rejects_second_delete() {
        let mut brand = Brand::create(create_cmd("Acme Co")).unwrap();
        brand.soft_delete(test_time()).unwrap();
        assert!(brand.is_deleted());

        let err = brand.soft_delete(test_time()).unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for double delete"),
        }
    }

    #[test]
    fn update_rejects_deleted_brand() {
        let mut brand = Brand::create(create_cmd("Acme Co")).unwrap();
        brand.soft_delete(test_time()).unwrap();

        let err = brand
            .update(UpdateBrand {
                name: Some("Renamed".to_string()),
                slug: None,
                url: None,
                description: None,
                is_visible: None,
                is_featured: None,
                published_at: None,
                primary_color: None,
                occurred_at: test_time(),
            })
            .unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation for editing deleted brand"),
        }
    }
}

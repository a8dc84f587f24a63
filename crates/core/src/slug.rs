//! URL-safe slug value object and its derivation rules.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::RecordId;
use crate::value_object::ValueObject;

/// URL-safe, lowercase, hyphen-delimited identifier derived from a display
/// name.
///
/// Slugs are derived **once**, when a record is created. Renaming a record
/// later does not recompute its slug; only an explicitly supplied slug
/// (operator-edited in the form) replaces the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a human-entered name.
    ///
    /// Lowercases the name, collapses every run of non-alphanumeric
    /// characters into a single hyphen, and trims hyphens from both ends.
    /// A name with no sluggable characters at all (punctuation or symbols
    /// only) falls back to the record id's short hex form so the result is
    /// never empty. Callers reject empty names before deriving.
    pub fn derive(name: &str, record_id: RecordId) -> Self {
        let slug = slugify(name);
        if slug.is_empty() {
            Self(record_id.short_hex())
        } else {
            Self(slug)
        }
    }

    /// Validate a manually supplied slug.
    ///
    /// Accepts only non-empty strings of lowercase ASCII alphanumerics and
    /// interior hyphens — the same alphabet `derive` produces.
    pub fn parse(input: &str) -> DomainResult<Self> {
        if input.is_empty() {
            return Err(DomainError::validation("slug cannot be empty"));
        }
        if input.starts_with('-') || input.ends_with('-') {
            return Err(DomainError::validation(
                "slug cannot start or end with a hyphen",
            ));
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::validation(
                "slug may only contain lowercase letters, digits and hyphens",
            ));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Slug {}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

//! Field-keyed save rejections.
//!
//! The admin-UI layer consumes these as validation error maps keyed by field
//! name (`"name"`, `"items[2].quantity"`, ...). None of them are fatal: a
//! rejected save leaves the store untouched.

use std::collections::BTreeMap;

use serde::Serialize;

use shopadmin_core::DomainError;
use shopadmin_store::StoreError;

/// Which class of failure rejected the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Required-field, shape or uniqueness violation.
    Validation,
    /// A referenced brand/customer/product/category is missing.
    RelationshipIntegrity,
    /// An order item could not resolve a usable unit price.
    Aggregation,
}

/// A rejected save: kind plus per-field messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRejection {
    kind: RejectionKind,
    errors: BTreeMap<String, String>,
}

impl core::fmt::Display for FormRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let fields: Vec<&str> = self.errors.keys().map(String::as_str).collect();
        write!(
            f,
            "save rejected ({:?}) on fields: {}",
            self.kind,
            fields.join(", ")
        )
    }
}

impl std::error::Error for FormRejection {}

impl FormRejection {
    pub fn validation(errors: BTreeMap<String, String>) -> Self {
        Self {
            kind: RejectionKind::Validation,
            errors,
        }
    }

    pub fn relationship(errors: BTreeMap<String, String>) -> Self {
        Self {
            kind: RejectionKind::RelationshipIntegrity,
            errors,
        }
    }

    pub fn aggregation(errors: BTreeMap<String, String>) -> Self {
        Self {
            kind: RejectionKind::Aggregation,
            errors,
        }
    }

    /// Single-field rejection.
    pub fn field(kind: RejectionKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.into(), message.into());
        Self { kind, errors }
    }

    pub fn kind(&self) -> RejectionKind {
        self.kind
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error_on(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Fallback mapping for a domain error the field passes did not
    /// anticipate.
    pub fn from_domain(field: impl Into<String>, err: DomainError) -> Self {
        let kind = match err {
            DomainError::NotFound => RejectionKind::RelationshipIntegrity,
            _ => RejectionKind::Validation,
        };
        Self::field(kind, field, err.to_string())
    }

    /// Fallback mapping for the store's constraint-of-last-resort errors.
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { field, .. } => Self::field(
                RejectionKind::Validation,
                field,
                "value is already in use",
            ),
            StoreError::ForeignKeyViolation(msg) => {
                Self::field(RejectionKind::RelationshipIntegrity, "record", msg)
            }
            StoreError::NotFound => {
                Self::field(RejectionKind::RelationshipIntegrity, "id", "record not found")
            }
            StoreError::Backend(msg) => Self::field(RejectionKind::Validation, "record", msg),
        }
    }
}

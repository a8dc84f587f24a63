use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopadmin_core::{DomainError, DomainResult, Entity, RecordId};

/// Customer identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub RecordId);

impl CustomerId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Entity: Customer — the party an order is placed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateCustomer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateCustomer. `None` fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl Customer {
    pub fn create(cmd: CreateCustomer) -> DomainResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id: cmd.customer_id,
            name: name.to_string(),
            email: cmd.email,
            created_at: cmd.occurred_at,
            updated_at: cmd.occurred_at,
        })
    }

    pub fn update(&mut self, cmd: UpdateCustomer) -> DomainResult<()> {
        let new_name = cmd.name.unwrap_or_else(|| self.name.clone());
        if new_name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        self.name = new_name.trim().to_string();
        if let Some(email) = cmd.email {
            self.email = Some(email);
        }
        self.updated_at = cmd.occurred_at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn create_trims_name() {
        let customer = Customer::create(CreateCustomer {
            customer_id: CustomerId::new(RecordId::new()),
            name: "  Jordan Miles ".to_string(),
            email: Some("jordan@example.com".to_string()),
            occurred_at: test_time(),
        })
        .unwrap();
        assert_eq!(customer.name(), "Jordan Miles");
        assert_eq!(customer.email(), Some("jordan@example.com"));
    }

    #[test]
    fn create_rejects_empty_name() {
        let err = Customer::create(CreateCustomer {
            customer_id: CustomerId::new(RecordId::new()),
            name: "   ".to_string(),
            email: None,
            occurred_at: test_time(),
        })
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn update_keeps_unset_fields() {
        let mut customer = Customer::create(CreateCustomer {
            customer_id: CustomerId::new(RecordId::new()),
            name: "Jordan Miles".to_string(),
            email: Some("jordan@example.com".to_string()),
            occurred_at: test_time(),
        })
        .unwrap();

        customer
            .update(UpdateCustomer {
                name: Some("Jordan A. Miles".to_string()),
                email: None,
                occurred_at: test_time(),
            })
            .unwrap();
        assert_eq!(customer.name(), "Jordan A. Miles");
        assert_eq!(customer.email(), Some("jordan@example.com"));
    }
}

//! Customer resource service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use shopadmin_core::RecordId;
use shopadmin_customers::{CreateCustomer, Customer, CustomerId, UpdateCustomer};
use shopadmin_store::CustomerRepository;

use crate::errors::{FormRejection, RejectionKind};
use crate::forms::CustomerForm;

pub struct CustomerService<C> {
    customers: C,
}

impl<C> CustomerService<C>
where
    C: CustomerRepository,
{
    pub fn new(customers: C) -> Self {
        Self { customers }
    }

    pub fn create(&self, form: CustomerForm, now: DateTime<Utc>) -> Result<Customer, FormRejection> {
        let mut errors = BTreeMap::new();
        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "name is required".to_string());
        }
        if !errors.is_empty() {
            return Err(FormRejection::validation(errors));
        }

        let customer = Customer::create(CreateCustomer {
            customer_id: CustomerId::new(RecordId::new()),
            name,
            email: form.email,
            occurred_at: now,
        })
        .map_err(|e| FormRejection::from_domain("name", e))?;

        self.customers
            .insert(customer.clone())
            .map_err(FormRejection::from_store)?;
        Ok(customer)
    }

    pub fn update(
        &self,
        id: CustomerId,
        form: CustomerForm,
        now: DateTime<Utc>,
    ) -> Result<Customer, FormRejection> {
        let mut customer = self.customers.get(id).ok_or_else(|| {
            FormRejection::field(
                RejectionKind::RelationshipIntegrity,
                "id",
                "customer not found",
            )
        })?;

        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err(FormRejection::field(
                RejectionKind::Validation,
                "name",
                "name is required",
            ));
        }

        customer
            .update(UpdateCustomer {
                name: Some(name),
                email: form.email,
                occurred_at: now,
            })
            .map_err(|e| FormRejection::from_domain("name", e))?;

        self.customers
            .update(customer.clone())
            .map_err(FormRejection::from_store)?;
        Ok(customer)
    }

    pub fn get(&self, id: CustomerId) -> Option<Customer> {
        self.customers.get(id)
    }

    pub fn list(&self) -> Vec<Customer> {
        self.customers.list()
    }
}

//! Customer contact service

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use shared::{Customer, InventoryLog};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Customer service for contact CRUD and movement history
#[derive(Clone)]
pub struct CustomerService {
    state: AppState,
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// Input for updating a customer; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Vec<Customer> {
        self.state.data.read().await.customers.clone()
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Customer> {
        self.state
            .data
            .read()
            .await
            .customer(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }

    /// Create a customer: optimistic local insert, rolled back on store
    /// failure
    pub async fn create(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name is required".to_string(),
                message_vi: "Tên khách hàng không được để trống".to_string(),
            });
        }

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            note: input.note,
            created_at: now,
            updated_at: now,
        };

        {
            let mut data = self.state.data.write().await;
            data.customers.insert(0, customer.clone());
        }

        if let Err(err) = self.state.gateway.create_customer(&customer).await {
            let mut data = self.state.data.write().await;
            data.customers.retain(|c| c.id != customer.id);
            return Err(err);
        }

        Ok(customer)
    }

    /// Update a customer; the optimistic local change is kept on failure
    pub async fn update(&self, id: Uuid, input: UpdateCustomerInput) -> AppResult<Customer> {
        let updated = {
            let mut data = self.state.data.write().await;
            let customer = data
                .customers
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

            if let Some(name) = input.name {
                customer.name = name;
            }
            if input.phone.is_some() {
                customer.phone = input.phone;
            }
            if input.email.is_some() {
                customer.email = input.email;
            }
            if input.address.is_some() {
                customer.address = input.address;
            }
            if input.note.is_some() {
                customer.note = input.note;
            }
            customer.updated_at = Utc::now();
            customer.clone()
        };

        self.state.gateway.update_customer(&updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        {
            let mut data = self.state.data.write().await;
            let before = data.customers.len();
            data.customers.retain(|c| c.id != id);
            if data.customers.len() == before {
                return Err(AppError::NotFound("Customer".to_string()));
            }
        }

        self.state.gateway.delete_customer(id).await
    }

    /// Movements whose partner label exactly matches this customer's name.
    /// The label is a soft reference, not a foreign key.
    pub async fn movements(&self, id: Uuid) -> AppResult<Vec<InventoryLog>> {
        let data = self.state.data.read().await;
        let customer = data
            .customer(id)
            .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;
        Ok(data.movements_for_partner(&customer.name))
    }
}

//! Supplier contact and debt service

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::{InventoryLog, Supplier};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Supplier service for contact CRUD, debt adjustments, and movement history
#[derive(Clone)]
pub struct SupplierService {
    state: AppState,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// Input for updating a supplier; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// Input for recording a debt payment
#[derive(Debug, Deserialize)]
pub struct PayDebtInput {
    pub amount: Decimal,
}

/// Input for manually adjusting debt and cumulative purchases
#[derive(Debug, Deserialize)]
pub struct AdjustDebtInput {
    pub debt: Option<Decimal>,
    pub total_purchases: Option<Decimal>,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Vec<Supplier> {
        self.state.data.read().await.suppliers.clone()
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Supplier> {
        self.state
            .data
            .read()
            .await
            .supplier(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Create a supplier: optimistic local insert, rolled back on store
    /// failure
    pub async fn create(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name is required".to_string(),
                message_vi: "Tên nhà cung cấp không được để trống".to_string(),
            });
        }

        let now = Utc::now();
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            note: input.note,
            debt: Decimal::ZERO,
            total_purchases: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        };

        {
            let mut data = self.state.data.write().await;
            data.suppliers.insert(0, supplier.clone());
        }

        if let Err(err) = self.state.gateway.create_supplier(&supplier).await {
            let mut data = self.state.data.write().await;
            data.suppliers.retain(|s| s.id != supplier.id);
            return Err(err);
        }

        Ok(supplier)
    }

    /// Update a supplier; the optimistic local change is kept on failure
    pub async fn update(&self, id: Uuid, input: UpdateSupplierInput) -> AppResult<Supplier> {
        let updated = {
            let mut data = self.state.data.write().await;
            let supplier = data
                .suppliers
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

            if let Some(name) = input.name {
                supplier.name = name;
            }
            if input.phone.is_some() {
                supplier.phone = input.phone;
            }
            if input.email.is_some() {
                supplier.email = input.email;
            }
            if input.address.is_some() {
                supplier.address = input.address;
            }
            if input.note.is_some() {
                supplier.note = input.note;
            }
            supplier.updated_at = Utc::now();
            supplier.clone()
        };

        self.state.gateway.update_supplier(&updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        {
            let mut data = self.state.data.write().await;
            let before = data.suppliers.len();
            data.suppliers.retain(|s| s.id != id);
            if data.suppliers.len() == before {
                return Err(AppError::NotFound("Supplier".to_string()));
            }
        }

        self.state.gateway.delete_supplier(id).await
    }

    /// Record a debt payment. The amount must be positive and must not
    /// exceed the outstanding debt; validation happens before any mutation.
    pub async fn pay_debt(&self, id: Uuid, input: PayDebtInput) -> AppResult<Supplier> {
        let updated = {
            let mut data = self.state.data.write().await;
            let supplier = data
                .suppliers
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

            if input.amount <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "amount".to_string(),
                    message: "Payment amount must be positive".to_string(),
                    message_vi: "Số tiền thanh toán phải lớn hơn 0".to_string(),
                });
            }
            if input.amount > supplier.debt {
                return Err(AppError::Validation {
                    field: "amount".to_string(),
                    message: "Payment amount exceeds outstanding debt".to_string(),
                    message_vi: "Số tiền thanh toán vượt quá công nợ hiện tại".to_string(),
                });
            }

            supplier.debt -= input.amount;
            supplier.updated_at = Utc::now();
            supplier.clone()
        };

        self.state.gateway.update_supplier(&updated).await?;
        Ok(updated)
    }

    /// Manually adjust the debt balance and cumulative purchase total
    pub async fn adjust_debt(&self, id: Uuid, input: AdjustDebtInput) -> AppResult<Supplier> {
        let updated = {
            let mut data = self.state.data.write().await;
            let supplier = data
                .suppliers
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

            if let Some(debt) = input.debt {
                supplier.debt = debt;
            }
            if let Some(total) = input.total_purchases {
                supplier.total_purchases = total;
            }
            supplier.updated_at = Utc::now();
            supplier.clone()
        };

        self.state.gateway.update_supplier(&updated).await?;
        Ok(updated)
    }

    /// Movements whose partner label exactly matches this supplier's name.
    /// The label is a soft reference, not a foreign key.
    pub async fn movements(&self, id: Uuid) -> AppResult<Vec<InventoryLog>> {
        let data = self.state.data.read().await;
        let supplier = data
            .supplier(id)
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;
        Ok(data.movements_for_partner(&supplier.name))
    }
}

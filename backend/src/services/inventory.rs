//! Inventory service: two-phase apply of stock movement batches
//!
//! Phase 1 computes the batch with the pure ledger engine and applies it to
//! local state optimistically. Phase 2 persists each item one at a time, in
//! list order. If persistence fails partway, local state is restored from
//! the plan's compensating snapshot; items persisted before the failure
//! remain persisted (at-most-once per item, not all-or-nothing).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{InventoryLog, MovementType, Product, SoftRef};

use crate::error::{AppError, AppResult};
use crate::services::ledger::{self, MovementContext, MovementItem};
use crate::state::AppState;

/// Inventory service for applying movements and reading the ledger
#[derive(Clone)]
pub struct InventoryService {
    state: AppState,
}

/// One line of a movement request
#[derive(Debug, Deserialize)]
pub struct MovementItemInput {
    pub product_id: Uuid,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub new_selling_price: Option<Decimal>,
}

/// Input for recording a movement batch
#[derive(Debug, Deserialize)]
pub struct RecordMovementInput {
    pub movement_type: MovementType,
    pub items: Vec<MovementItemInput>,
    pub partner: Option<String>,
    pub reference_doc: Option<String>,
    pub note: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Result of a recorded movement batch
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    pub updated_products: Vec<Product>,
    pub logs: Vec<InventoryLog>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Apply a movement batch: plan, optimistic local apply, sequential
    /// persistence, compensating rollback on failure
    pub async fn record_movement(
        &self,
        input: RecordMovementInput,
    ) -> AppResult<MovementResponse> {
        let items: Vec<MovementItem> = input
            .items
            .iter()
            .map(|i| MovementItem {
                product_id: i.product_id,
                quantity: i.quantity,
                unit_price: i.unit_price,
                new_selling_price: i.new_selling_price,
            })
            .collect();
        let ctx = MovementContext {
            partner: input.partner.map(SoftRef::new),
            reference_doc: input.reference_doc.map(SoftRef::new),
            note: input.note,
            transaction_date: input.transaction_date,
        };

        // Phase 1: plan against current state and apply optimistically
        let plan = {
            let mut data = self.state.data.write().await;
            let plan = ledger::plan_movement(&data.products, &items, input.movement_type, &ctx)?;
            for product in &plan.updated_products {
                if let Some(existing) = data.product_mut(product.id) {
                    *existing = product.clone();
                }
            }
            // Prepend new logs, keeping the collection most-recent-first
            for step in plan.steps.iter().rev() {
                data.inventory_logs.insert(0, step.log.clone());
            }
            plan
        };

        // Phase 2: persist each item's movement in list order
        for (index, step) in plan.steps.iter().enumerate() {
            if let Err(err) = self
                .state
                .gateway
                .update_product_stock(&step.product_after, &step.log)
                .await
            {
                // Restore local state from the explicit compensating snapshot
                let mut data = self.state.data.write().await;
                for previous in &plan.rollback.previous_products {
                    if let Some(existing) = data.product_mut(previous.id) {
                        *existing = previous.clone();
                    }
                }
                data.inventory_logs
                    .retain(|l| !plan.rollback.log_ids.contains(&l.id));

                tracing::error!(
                    "movement batch failed at item {} of {}: {}",
                    index + 1,
                    plan.steps.len(),
                    err
                );
                return Err(AppError::PartialBatchFailure {
                    failed_index: index,
                    persisted: index,
                    source: Box::new(err),
                });
            }
        }

        Ok(MovementResponse {
            updated_products: plan.updated_products.clone(),
            logs: plan.logs(),
        })
    }

    /// All movements, most recent first
    pub async fn list_movements(&self) -> Vec<InventoryLog> {
        self.state.data.read().await.inventory_logs.clone()
    }

    /// Movements for one product, most recent first
    pub async fn product_movements(&self, product_id: Uuid) -> AppResult<Vec<InventoryLog>> {
        let data = self.state.data.read().await;
        if data.product(product_id).is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(data
            .inventory_logs
            .iter()
            .filter(|l| l.product_id == product_id)
            .cloned()
            .collect())
    }
}

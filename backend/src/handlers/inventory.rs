//! HTTP handlers for inventory movement endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::InventoryLog;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::inventory::{InventoryService, MovementResponse, RecordMovementInput};
use crate::state::AppState;

/// Apply a stock movement batch
pub async fn record_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<Json<MovementResponse>> {
    check_permission(&current_user.0, "inventory", "write")?;
    let service = InventoryService::new(state);
    let response = service.record_movement(input).await?;
    Ok(Json(response))
}

/// List all movements, most recent first
pub async fn list_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryLog>>> {
    check_permission(&current_user.0, "inventory", "read")?;
    let service = InventoryService::new(state);
    Ok(Json(service.list_movements().await))
}

/// Movements for one product, most recent first
pub async fn get_product_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryLog>>> {
    check_permission(&current_user.0, "inventory", "read")?;
    let service = InventoryService::new(state);
    let movements = service.product_movements(product_id).await?;
    Ok(Json(movements))
}

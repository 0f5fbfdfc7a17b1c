//! HTTP handlers for order endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::Order;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::orders::{
    CreateOrderInput, OrderService, UpdateOrderInput, UpdateStatusInput,
};
use crate::state::AppState;

/// List orders
pub async fn list_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    check_permission(&current_user.0, "orders", "read")?;
    let service = OrderService::new(state);
    Ok(Json(service.list().await))
}

/// Get one order
pub async fn get_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    check_permission(&current_user.0, "orders", "read")?;
    let service = OrderService::new(state);
    let order = service.get(order_id).await?;
    Ok(Json(order))
}

/// Create an order
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<Order>> {
    check_permission(&current_user.0, "orders", "write")?;
    let service = OrderService::new(state);
    let order = service.create(input).await?;
    Ok(Json(order))
}

/// Edit a pending order
pub async fn update_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateOrderInput>,
) -> AppResult<Json<Order>> {
    check_permission(&current_user.0, "orders", "write")?;
    let service = OrderService::new(state);
    let order = service.update(order_id, input).await?;
    Ok(Json(order))
}

/// Change an order's status
pub async fn update_order_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<Order>> {
    check_permission(&current_user.0, "orders", "write")?;
    let service = OrderService::new(state);
    let order = service.update_status(order_id, input).await?;
    Ok(Json(order))
}

/// Delete an order
pub async fn delete_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    check_permission(&current_user.0, "orders", "write")?;
    let service = OrderService::new(state);
    service.delete(order_id).await?;
    Ok(Json(()))
}

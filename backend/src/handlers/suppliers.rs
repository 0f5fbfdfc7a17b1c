//! HTTP handlers for supplier endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::{InventoryLog, Supplier};

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::suppliers::{
    AdjustDebtInput, CreateSupplierInput, PayDebtInput, SupplierService, UpdateSupplierInput,
};
use crate::state::AppState;

/// List suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Supplier>>> {
    check_permission(&current_user.0, "suppliers", "read")?;
    let service = SupplierService::new(state);
    Ok(Json(service.list().await))
}

/// Get one supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    check_permission(&current_user.0, "suppliers", "read")?;
    let service = SupplierService::new(state);
    let supplier = service.get(supplier_id).await?;
    Ok(Json(supplier))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    check_permission(&current_user.0, "suppliers", "write")?;
    let service = SupplierService::new(state);
    let supplier = service.create(input).await?;
    Ok(Json(supplier))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    check_permission(&current_user.0, "suppliers", "write")?;
    let service = SupplierService::new(state);
    let supplier = service.update(supplier_id, input).await?;
    Ok(Json(supplier))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    check_permission(&current_user.0, "suppliers", "write")?;
    let service = SupplierService::new(state);
    service.delete(supplier_id).await?;
    Ok(Json(()))
}

/// Record a debt payment
pub async fn pay_supplier_debt(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<PayDebtInput>,
) -> AppResult<Json<Supplier>> {
    check_permission(&current_user.0, "suppliers", "write")?;
    let service = SupplierService::new(state);
    let supplier = service.pay_debt(supplier_id, input).await?;
    Ok(Json(supplier))
}

/// Manually adjust debt and cumulative purchases
pub async fn adjust_supplier_debt(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<AdjustDebtInput>,
) -> AppResult<Json<Supplier>> {
    check_permission(&current_user.0, "suppliers", "write")?;
    let service = SupplierService::new(state);
    let supplier = service.adjust_debt(supplier_id, input).await?;
    Ok(Json(supplier))
}

/// Movement history matched by the supplier's display name
pub async fn get_supplier_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryLog>>> {
    check_permission(&current_user.0, "suppliers", "read")?;
    let service = SupplierService::new(state);
    let movements = service.movements(supplier_id).await?;
    Ok(Json(movements))
}

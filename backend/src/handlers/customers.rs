//! HTTP handlers for customer endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::{Customer, InventoryLog};

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::customers::{CreateCustomerInput, CustomerService, UpdateCustomerInput};
use crate::state::AppState;

/// List customers
pub async fn list_customers(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Customer>>> {
    check_permission(&current_user.0, "customers", "read")?;
    let service = CustomerService::new(state);
    Ok(Json(service.list().await))
}

/// Get one customer
pub async fn get_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    check_permission(&current_user.0, "customers", "read")?;
    let service = CustomerService::new(state);
    let customer = service.get(customer_id).await?;
    Ok(Json(customer))
}

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<Json<Customer>> {
    check_permission(&current_user.0, "customers", "write")?;
    let service = CustomerService::new(state);
    let customer = service.create(input).await?;
    Ok(Json(customer))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<UpdateCustomerInput>,
) -> AppResult<Json<Customer>> {
    check_permission(&current_user.0, "customers", "write")?;
    let service = CustomerService::new(state);
    let customer = service.update(customer_id, input).await?;
    Ok(Json(customer))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    check_permission(&current_user.0, "customers", "write")?;
    let service = CustomerService::new(state);
    service.delete(customer_id).await?;
    Ok(Json(()))
}

/// Movement history matched by the customer's display name
pub async fn get_customer_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryLog>>> {
    check_permission(&current_user.0, "customers", "read")?;
    let service = CustomerService::new(state);
    let movements = service.movements(customer_id).await?;
    Ok(Json(movements))
}

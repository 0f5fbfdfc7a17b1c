//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::Product;

use crate::error::AppResult;
use crate::middleware::{check_permission, CurrentUser};
use crate::services::products::{CreateProductInput, ProductService, UpdateProductInput};
use crate::state::AppState;

/// Query parameters for listing products
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub search: Option<String>,
}

/// List products, optionally filtered by name/code substring
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<Vec<Product>>> {
    check_permission(&current_user.0, "products", "read")?;
    let service = ProductService::new(state);
    Ok(Json(service.list(query.search).await))
}

/// Get one product
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    check_permission(&current_user.0, "products", "read")?;
    let service = ProductService::new(state);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    check_permission(&current_user.0, "products", "write")?;
    let service = ProductService::new(state);
    let product = service.create(input).await?;
    Ok(Json(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    check_permission(&current_user.0, "products", "write")?;
    let service = ProductService::new(state);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    check_permission(&current_user.0, "products", "write")?;
    let service = ProductService::new(state);
    service.delete(product_id).await?;
    Ok(Json(()))
}

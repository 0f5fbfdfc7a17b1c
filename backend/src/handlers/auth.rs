//! HTTP handlers for authentication and user management

use axum::{extract::State, Json};

use shared::{Role, User};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthService, CreateUserInput, LoginInput, LoginResponse};
use crate::state::AppState;

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let service = AuthService::new(state);
    let response = service.login(input).await?;
    Ok(Json(response))
}

/// Get the authenticated user's profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = AuthService::new(state);
    let user = service.me(current_user.0.user_id).await?;
    Ok(Json(user))
}

/// List user accounts (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    if current_user.0.role != Role::Admin {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AuthService::new(state);
    Ok(Json(service.list_users().await))
}

/// Create a user account (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<Json<User>> {
    if current_user.0.role != Role::Admin {
        return Err(AppError::InsufficientPermissions);
    }
    let service = AuthService::new(state);
    let user = service.create_user(input).await?;
    Ok(Json(user))
}

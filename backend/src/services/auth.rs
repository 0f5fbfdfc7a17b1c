//! Authentication service for login, token issuance, and user management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{validate_email, validate_password, Role, User};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    state: AppState,
}

/// Input for logging in
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Response after successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Input for creating a user account
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub password: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, input: LoginInput) -> AppResult<LoginResponse> {
        let user = {
            let data = self.state.data.read().await;
            data.users
                .iter()
                .find(|u| u.email.eq_ignore_ascii_case(&input.email))
                .cloned()
                .ok_or(AppError::InvalidCredentials)?
        };

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;
        let valid =
            verify(&input.password, password_hash).map_err(|_| AppError::InvalidCredentials)?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let expires_in = self.state.config.jwt.access_token_expiry;
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            permissions: user.permissions.clone(),
            exp: (now + Duration::seconds(expires_in)).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.state.config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))?;

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        })
    }

    /// Get the profile of the authenticated user
    pub async fn me(&self, user_id: Uuid) -> AppResult<User> {
        self.state
            .data
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// List all user accounts
    pub async fn list_users(&self) -> Vec<User> {
        self.state.data.read().await.users.clone()
    }

    /// Create a user account. Permissions are only meaningful for staff;
    /// admins bypass permission checks entirely.
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        validate_email(&input.email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
            message_vi: "Email không hợp lệ".to_string(),
        })?;
        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
            message_vi: "Mật khẩu phải có ít nhất 8 ký tự".to_string(),
        })?;

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            role: input.role,
            permissions: input.permissions,
            password_hash: Some(password_hash),
            created_at: Utc::now(),
        };

        let mut data = self.state.data.write().await;
        if data
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }
        data.users.push(user.clone());

        Ok(user)
    }
}

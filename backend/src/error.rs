//! Error handling for the Sales & Inventory Management Platform
//!
//! Provides consistent error responses in Vietnamese and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// One product that failed the export stock check
#[derive(Debug, Clone, Serialize)]
pub struct StockShortfall {
    pub product_name: String,
    pub requested: i64,
    pub available: i64,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_vi: String,
    },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Export quantity exceeds available stock for one or more products.
    /// Detected before any mutation; the whole batch is rejected.
    #[error("Insufficient stock")]
    InsufficientStock { shortfalls: Vec<StockShortfall> },

    // External service errors
    #[error("Assistant service error: {0}")]
    AssistantError(String),

    #[error("Assistant is not configured")]
    AssistantNotConfigured,

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Persistence errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Persistence failed partway through a multi-item stock batch: items
    /// before `failed_index` are durably persisted, local state has been
    /// rolled back to the pre-movement snapshot.
    #[error("Stock movement batch failed at item {failed_index}: {source}")]
    PartialBatchFailure {
        failed_index: usize,
        persisted: usize,
        #[source]
        source: Box<AppError>,
    },

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_vi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Human-readable enumeration of every offending product in an
    /// insufficient-stock rejection
    fn shortfall_lines(shortfalls: &[StockShortfall]) -> String {
        shortfalls
            .iter()
            .map(|s| {
                format!(
                    "{} (requested {}, available {})",
                    s.product_name, s.requested, s.available
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message_en: "Invalid email or password".to_string(),
                    message_vi: "Email hoặc mật khẩu không đúng".to_string(),
                    field: None,
                },
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message_en: "Token has expired".to_string(),
                    message_vi: "Phiên đăng nhập đã hết hạn".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message_en: "Invalid token".to_string(),
                    message_vi: "Phiên đăng nhập không hợp lệ".to_string(),
                    field: None,
                },
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "INSUFFICIENT_PERMISSIONS".to_string(),
                    message_en: "You do not have permission to perform this action".to_string(),
                    message_vi: "Bạn không có quyền thực hiện thao tác này".to_string(),
                    field: None,
                },
            ),
            AppError::Validation {
                field,
                message,
                message_vi,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_vi: message_vi.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("A record with this {} already exists", field),
                    message_vi: format!("Đã tồn tại bản ghi với {} này", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_vi: format!("Không tìm thấy {}", resource),
                    field: None,
                },
            ),
            AppError::InvalidStateTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVALID_STATE_TRANSITION".to_string(),
                    message_en: msg.clone(),
                    message_vi: format!("Không thể chuyển trạng thái: {}", msg),
                    field: None,
                },
            ),
            AppError::InsufficientStock { shortfalls } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!(
                        "Insufficient stock: {}",
                        Self::shortfall_lines(shortfalls)
                    ),
                    message_vi: format!(
                        "Không đủ hàng tồn kho: {}",
                        Self::shortfall_lines(shortfalls)
                    ),
                    field: None,
                },
            ),
            AppError::AssistantError(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "ASSISTANT_ERROR".to_string(),
                    message_en: format!("Assistant service error: {}", msg),
                    message_vi: format!("Lỗi dịch vụ trợ lý: {}", msg),
                    field: None,
                },
            ),
            AppError::AssistantNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "ASSISTANT_NOT_CONFIGURED".to_string(),
                    message_en: "The AI assistant is not configured on this server".to_string(),
                    message_vi: "Trợ lý AI chưa được cấu hình trên máy chủ này".to_string(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_vi: format!("Lỗi cấu hình: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_vi: "Đã xảy ra lỗi cơ sở dữ liệu".to_string(),
                    field: None,
                },
            ),
            AppError::PartialBatchFailure {
                failed_index,
                persisted,
                ..
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "PARTIAL_BATCH_FAILURE".to_string(),
                    message_en: format!(
                        "Stock movement failed at item {}; {} item(s) were already saved and remain saved",
                        failed_index + 1,
                        persisted
                    ),
                    message_vi: format!(
                        "Ghi phiếu kho thất bại ở dòng {}; {} dòng trước đó đã được lưu",
                        failed_index + 1,
                        persisted
                    ),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_vi: "Đã xảy ra lỗi máy chủ".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_vi: "Đã xảy ra lỗi máy chủ".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

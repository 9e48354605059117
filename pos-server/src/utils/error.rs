//! Unified error handling
//!
//! Application error enum and API response envelope.
//!
//! # Error codes
//!
//! | Code | Meaning |
//! |-------|------------------------------|
//! | E0000 | Success |
//! | E0002 | Validation failed (400) |
//! | E0003 | Resource not found (404) |
//! | E0004 | Conflict (409) |
//! | E0005 | Discount not applicable (422) |
//! | E0006 | Discount usage exhausted (409) |
//! | E0007 | Illegal order transition (409) |
//! | E9001 | Internal error (500) |
//! | E9002 | Database error (500) |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;
use crate::orders::OrderError;
use crate::pricing::PricingError;

/// API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The selected discount failed an eligibility gate (422)
    #[error("Discount not applicable: {0}")]
    DiscountNotApplicable(String),

    /// The discount's usage limit is already consumed (409)
    #[error("Discount usage limit reached")]
    DiscountExhausted,

    /// The requested order status change is not a legal transition (409)
    #[error("Invalid order transition: {0}")]
    InvalidTransition(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::DiscountNotApplicable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }
            AppError::DiscountExhausted => (
                StatusCode::CONFLICT,
                "E0006",
                "Discount usage limit reached",
            ),
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, "E0007", msg.as_str()),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) | RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::Validation(msg) => AppError::Validation(msg),
            PricingError::NotApplicable(reason) => {
                AppError::DiscountNotApplicable(reason.to_string())
            }
            PricingError::Exhausted => AppError::DiscountExhausted,
            PricingError::Invariant(msg) => AppError::Internal(msg),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => AppError::NotFound(format!("Order {id} not found")),
            OrderError::Terminal(..) | OrderError::InvalidTransition { .. } => {
                AppError::InvalidTransition(e.to_string())
            }
            OrderError::NotEditable(_) => AppError::Conflict(e.to_string()),
            OrderError::DiscountExhausted => AppError::DiscountExhausted,
            OrderError::Pricing(p) => p.into(),
            OrderError::Repo(r) => r.into(),
        }
    }
}

/// Result type for handlers
pub type AppResult<T> = Result<T, AppError>;

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

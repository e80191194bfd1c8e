//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Transfer Errors**: user-correctable problems with a transfer request,
///   reported to the client with their literal cause
/// - **Resource Errors**: requested rows do not exist for the authenticated user
/// - **Authentication Errors**: missing or unknown bearer token
/// - **Storage Errors**: any sqlx::Error, reported as a generic failure
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Bearer token is missing, malformed, or revoked.
    #[error("Missing or invalid bearer token")]
    Unauthorized,

    /// Source and destination of a transfer are the same account.
    #[error("Cannot transfer to the same account")]
    InvalidTransfer,

    /// Transfer amount is zero or negative.
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// Account does not exist or belongs to another user.
    #[error("Account not found")]
    AccountNotFound,

    /// Source and destination hold different currencies.
    #[error("Accounts use different currencies")]
    CurrencyMismatch,

    /// Source balance does not cover the amount and the account type
    /// does not allow going negative.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Any other resource (transaction, category, budget) was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request body or parameters are invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl AppError {
    /// Stable machine-readable code carried in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "internal_error",
            AppError::Unauthorized => "unauthorized",
            AppError::InvalidTransfer => "invalid_transfer",
            AppError::InvalidAmount => "invalid_amount",
            AppError::AccountNotFound => "account_not_found",
            AppError::CurrencyMismatch => "currency_mismatch",
            AppError::InsufficientFunds => "insufficient_funds",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidRequest(_) => "invalid_request",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidTransfer | AppError::InvalidAmount | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::AccountNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::CurrencyMismatch | AppError::InsufficientFunds => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "insufficient_funds",
///     "message": "Insufficient funds"
///   }
/// }
/// ```
///
/// Storage failures are logged here and their details are hidden from the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::InvalidRequest(ref msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}

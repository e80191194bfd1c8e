//! Client-side error taxonomy.
//!
//! User-correctable rejections keep the server's literal message. Transport
//! and server failures collapse into a generic "retry" message.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::{error::AppError, models::ValidationError};

/// Machine-readable reason for a rejected request, mirroring the API's error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidTransfer,
    InvalidAmount,
    AccountNotFound,
    CurrencyMismatch,
    InsufficientFunds,
    NotFound,
    InvalidRequest,
    Unauthorized,
    Other,
}

impl ErrorKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "invalid_transfer" => ErrorKind::InvalidTransfer,
            "invalid_amount" => ErrorKind::InvalidAmount,
            "account_not_found" => ErrorKind::AccountNotFound,
            "currency_mismatch" => ErrorKind::CurrencyMismatch,
            "insufficient_funds" => ErrorKind::InsufficientFunds,
            "not_found" => ErrorKind::NotFound,
            "invalid_request" => ErrorKind::InvalidRequest,
            "unauthorized" => ErrorKind::Unauthorized,
            _ => ErrorKind::Other,
        }
    }
}

pub const RETRY_MESSAGE: &str = "Operation failed, please retry";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request was refused for a reason the user can correct.
    #[error("{message}")]
    Rejected { kind: ErrorKind, message: String },

    /// 5xx, or an error response without a readable body.
    #[error("Server error ({status})")]
    Server { status: StatusCode },

    /// Connection, timeout or decoding failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Rejected { kind, .. } => *kind,
            _ => ErrorKind::Other,
        }
    }

    /// Text to show the user: the literal cause for rejections, a generic
    /// retry prompt for everything else.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } => message.clone(),
            _ => RETRY_MESSAGE.to_string(),
        }
    }

    /// Whether this failure is unexpected and worth logging.
    pub fn is_unexpected(&self) -> bool {
        !matches!(self, ClientError::Rejected { .. })
    }

    /// Interpret a non-success response.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        if status.is_server_error() {
            return ClientError::Server { status };
        }
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(body) => ClientError::Rejected {
                kind: ErrorKind::from_code(&body.error.code),
                message: body.error.message,
            },
            Err(_) => ClientError::Server { status },
        }
    }
}

/// Checks run before a request leaves the client produce the same kind and
/// message the server would.
impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        if err.status().is_server_error() {
            return ClientError::Server {
                status: StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        let message = match err {
            AppError::InvalidRequest(ref msg) => msg.clone(),
            ref other => other.to_string(),
        };
        ClientError::Rejected {
            kind: ErrorKind::from_code(err.code()),
            message,
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Rejected {
            kind: ErrorKind::InvalidRequest,
            message: err.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

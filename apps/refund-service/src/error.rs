//! # API Error Type
//!
//! What a client sees when an operation fails.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Refund Service                     │
//! │                                                                         │
//! │  ValidationError ──► RefundError::InvalidInput ─┐                      │
//! │                                                  │                      │
//! │  DbError ──────────► RefundError (mall-db From) ─┼──► ApiError ──► JSON │
//! │                                                  │    code + message    │
//! │  Eligibility / processor ──► RefundError ────────┘    + HTTP status     │
//! │                                                                         │
//! │  { "success": false, "code": "QUANTITY_EXCEEDED",                       │
//! │    "message": "Requested quantity 1 ... (0 remaining)" }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Mapping
//! | Code                       | Status |
//! |----------------------------|--------|
//! | `INVALID_INPUT`            | 400    |
//! | `QUANTITY_EXCEEDED`        | 400    |
//! | `FORBIDDEN`                | 403    |
//! | `NOT_FOUND`                | 404    |
//! | `DUPLICATE_PENDING_REFUND` | 200    |
//! | `TRANSACTION_CONFLICT`     | 200    |
//! | `INTERNAL`                 | 500    |

use std::time::Duration;

use mall_core::{RefundError, ValidationError};
use mall_db::DbError;
use serde::Serialize;
use ts_rs::TS;

/// API error returned from every service operation.
///
/// ```json
/// {
///   "code": "FORBIDDEN",
///   "message": "Order 7f3e... does not belong to the requesting user"
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    /// Order, order line or refund not found (404)
    NotFound,

    /// Caller does not own the order (403)
    Forbidden,

    /// Missing or malformed request field (400)
    InvalidInput,

    /// More units requested than remain refundable (400)
    QuantityExceeded,

    /// Identical refund already awaiting review (200, success: false)
    DuplicatePendingRefund,

    /// Lost a race with a concurrent writer; safe to retry (200, success: false)
    TransactionConflict,

    /// Store or infrastructure failure (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status a transport layer should answer with.
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorCode::InvalidInput | ErrorCode::QuantityExceeded => 400,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::DuplicatePendingRefund | ErrorCode::TransactionConflict => 200,
            ErrorCode::Internal => 500,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates an internal error with a generic message.
    pub fn internal() -> Self {
        ApiError::new(ErrorCode::Internal, "Internal server error")
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }
}

/// Converts refund errors to API errors.
impl From<RefundError> for ApiError {
    fn from(err: RefundError) -> Self {
        let code = match &err {
            RefundError::NotFound { .. } => ErrorCode::NotFound,
            RefundError::Forbidden { .. } => ErrorCode::Forbidden,
            RefundError::InvalidInput(_) => ErrorCode::InvalidInput,
            RefundError::QuantityExceeded { .. } => ErrorCode::QuantityExceeded,
            RefundError::DuplicatePendingRefund { .. } => ErrorCode::DuplicatePendingRefund,
            RefundError::TransactionConflict(_) => ErrorCode::TransactionConflict,
            RefundError::Unexpected(detail) => {
                tracing::error!(detail = %detail, "Unexpected failure");
                return ApiError::internal();
            }
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts database errors to API errors through the refund taxonomy.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::from(RefundError::from(err))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::from(RefundError::from(err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Catalog Errors
// =============================================================================

/// Why a catalog lookup produced nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog lookup timed out after {0:?}")]
    Timeout(Duration),
}

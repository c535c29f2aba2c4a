//! # Error Types
//!
//! Domain-specific error types for mall-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mall-core errors (this file)                                          │
//! │  ├── RefundError      - The refund taxonomy every caller sees          │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  mall-db errors (separate crate)                                       │
//! │  └── DbError          - Database failures, mapped into RefundError     │
//! │                                                                         │
//! │  refund-service errors                                                 │
//! │  └── ApiError         - What the client sees (code + status)           │
//! │                                                                         │
//! │  Flow: ValidationError → RefundError ← DbError;  RefundError → ApiError │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Refund Error
// =============================================================================

/// Everything that can stop a refund request or a ledger query.
///
/// Every variant except [`RefundError::Unexpected`] is a business outcome the
/// caller can act on; the transaction that produced it has been rolled back.
#[derive(Debug, Error)]
pub enum RefundError {
    /// Order, order line, or refund does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The order belongs to another user.
    #[error("Order {order_id} does not belong to the requesting user")]
    Forbidden { order_id: String },

    /// Request fields are missing or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Requested more than is left to refund on the line.
    ///
    /// ## User Workflow
    /// ```text
    /// Line: quantity 3, refunded 3
    ///      │
    ///      ▼
    /// Refund request: quantity 1
    ///      │
    ///      ▼
    /// QuantityExceeded { requested: 1, remaining: 0 }
    ///      │
    ///      ▼
    /// UI shows: "... only 0 remaining"
    /// ```
    #[error(
        "Requested quantity {requested} for product {product_id} exceeds the remaining refundable quantity ({remaining} remaining)"
    )]
    QuantityExceeded {
        product_id: String,
        requested: i64,
        remaining: i64,
    },

    /// The same refund is already waiting for review.
    #[error("A pending refund already covers product {product_id} on order {order_id}")]
    DuplicatePendingRefund { order_id: String, product_id: String },

    /// A concurrent writer changed the order between the check and the write.
    #[error("Refund could not be applied because the order changed concurrently: {0}")]
    TransactionConflict(String),

    /// Store I/O or other infrastructure failure. Detail stays in the logs.
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl RefundError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        RefundError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True for outcomes that come from business rules rather than infrastructure.
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, RefundError::Unexpected(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request fields don't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Computed amount does not fit in the money range.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// Invalid format (e.g., whitespace in an identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with RefundError.
pub type RefundResult<T> = Result<T, RefundError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_exceeded_reports_remaining() {
        let err = RefundError::QuantityExceeded {
            product_id: "prod-1".to_string(),
            requested: 1,
            remaining: 0,
        };
        assert_eq!(
            err.to_string(),
            "Requested quantity 1 for product prod-1 exceeds the remaining refundable quantity (0 remaining)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "reason".to_string(),
        };
        assert_eq!(err.to_string(), "reason is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_refund_error() {
        let validation_err = ValidationError::Required {
            field: "productId".to_string(),
        };
        let err: RefundError = validation_err.into();
        assert!(matches!(err, RefundError::InvalidInput(_)));
        assert!(err.is_business_rule());
    }

    #[test]
    fn test_unexpected_is_not_business_rule() {
        assert!(!RefundError::Unexpected("disk full".into()).is_business_rule());
        assert!(RefundError::TransactionConflict("busy".into()).is_business_rule());
    }
}

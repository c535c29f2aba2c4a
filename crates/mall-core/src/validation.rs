//! # Validation Module
//!
//! Field-level input rules for refund requests and seed data.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request decoding (refund-service)                            │
//! │  └── Missing fields become Required errors                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── quantity positive (upper bound is the line's remaining count)     │
//! │  ├── productId non-empty, no whitespace                                │
//! │  └── reason non-empty, at most 500 characters                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (refunded_quantity <= quantity)                             │
//! │  └── UNIQUE (order_id, product_id)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mall_core::validation::{validate_quantity, validate_reason};
//!
//! validate_quantity(2).unwrap();
//! assert_eq!(validate_reason("  damaged  ").unwrap(), "damaged");
//! ```

use crate::error::ValidationError;
use crate::MAX_REASON_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest identifier accepted for orders, products, users and coupons.
pub const MAX_IDENTIFIER_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an identifier such as a product or order id.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 64 characters
/// - No interior whitespace
///
/// ## Example
/// ```rust
/// use mall_core::validation::validate_identifier;
///
/// assert!(validate_identifier("productId", "prod-1").is_ok());
/// assert!(validate_identifier("productId", "").is_err());
/// assert!(validate_identifier("productId", "prod 1").is_err());
/// ```
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates the free-text refund reason.
///
/// ## Returns
/// The trimmed reason, which is what gets stored.
pub fn validate_reason(reason: &str) -> ValidationResult<String> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.chars().count() > MAX_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: MAX_REASON_LEN,
        });
    }

    Ok(reason.to_string())
}

/// Validates a coupon code (same shape as any identifier, uppercase expected).
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    validate_identifier("couponCode", code)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a refund quantity.
///
/// Only positivity is checked here. The upper bound depends on the order line
/// and is enforced by the eligibility check as `QuantityExceeded`.
///
/// ## User Workflow
/// ```text
/// Refund form: quantity 0
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty <= 0?  → "quantity must be positive"
///      └── OK → eligibility checks continue (remaining refundable)
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free gifts).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("productId", "prod-1").is_ok());
        assert!(validate_identifier("productId", " prod-1 ").is_ok());

        assert!(matches!(
            validate_identifier("productId", "   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_identifier("productId", "a b"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_identifier("productId", &"x".repeat(65)),
            Err(ValidationError::TooLong { max: 64, .. })
        ));
    }

    #[test]
    fn test_validate_reason() {
        assert_eq!(validate_reason(" wrong size ").unwrap(), "wrong size");
        assert!(validate_reason("").is_err());
        assert!(validate_reason("\n\t ").is_err());
        assert!(validate_reason(&"r".repeat(500)).is_ok());
        assert!(validate_reason(&"r".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("WELCOME10").is_ok());
        assert!(validate_coupon_code("").is_err());
    }
}

//! # Refund Eligibility
//!
//! Decides whether a refund request may proceed against an order.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_eligibility(order, request, existing_refunds)                    │
//! │                                                                         │
//! │  1. order present?                      ── no ──► NotFound             │
//! │  2. order.user_id == request.user_id?   ── no ──► Forbidden            │
//! │  3. quantity / productId / reason ok?   ── no ──► InvalidInput         │
//! │     productId is a line of the order?   ── no ──► NotFound             │
//! │  4. quantity <= remaining refundable?   ── no ──► QuantityExceeded     │
//! │  5. identical refund already pending?   ── yes ─► DuplicatePending     │
//! │                                                                         │
//! │  First failure wins. Success hands back the matching OrderItem.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same function runs twice per request: once as an advisory pre-check
//! and once inside the write transaction against freshly read rows.

use serde::{Deserialize, Serialize};

use crate::error::{RefundError, RefundResult};
use crate::types::{Order, OrderItem, Refund, RefundStatus};
use crate::validation::{validate_identifier, validate_quantity, validate_reason};

/// A customer's request to refund part of one order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub order_id: String,
    /// Authenticated caller, never taken from the request body.
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub reason: String,
}

/// Runs every eligibility check in order and returns the line to refund.
///
/// A pending refund blocks the request only when it is an identical
/// re-submission: same line, same quantity, same trimmed reason.
pub fn check_eligibility<'a>(
    order: Option<&'a Order>,
    request: &RefundRequest,
    existing_refunds: &[Refund],
) -> RefundResult<&'a OrderItem> {
    let order = order.ok_or_else(|| RefundError::not_found("Order", &request.order_id))?;

    if !order.is_owned_by(&request.user_id) {
        return Err(RefundError::Forbidden {
            order_id: order.id.clone(),
        });
    }

    validate_quantity(request.quantity)?;
    validate_identifier("productId", &request.product_id)?;
    let reason = validate_reason(&request.reason)?;

    let product_id = request.product_id.trim();
    let item = order
        .item(product_id)
        .ok_or_else(|| RefundError::not_found("Order item", product_id))?;

    let remaining = item.remaining_refundable();
    if request.quantity > remaining {
        return Err(RefundError::QuantityExceeded {
            product_id: item.product_id.clone(),
            requested: request.quantity,
            remaining,
        });
    }

    // Only an identical pending re-submission counts; other partial refunds proceed.
    let duplicate = existing_refunds.iter().any(|refund| {
        refund.order_id == order.id
            && refund.product_id == item.product_id
            && refund.status == RefundStatus::Pending
            && refund.quantity == request.quantity
            && refund.reason == reason
    });
    if duplicate {
        return Err(RefundError::DuplicatePendingRefund {
            order_id: order.id.clone(),
            product_id: item.product_id.clone(),
        });
    }

    Ok(item)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderStatus;
    use chrono::Utc;

    fn order(refunded: i64) -> Order {
        let now = Utc::now();
        Order {
            id: "order-1".to_string(),
            user_id: "alice".to_string(),
            items: vec![OrderItem {
                product_id: "prod-1".to_string(),
                quantity: 3,
                paid_price_cents: 1000,
                refunded_quantity: refunded,
            }],
            status: OrderStatus::Delivered,
            coupon_code: Some("SAVE10".to_string()),
            discount_cents: 1000,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(quantity: i64) -> RefundRequest {
        RefundRequest {
            order_id: "order-1".to_string(),
            user_id: "alice".to_string(),
            product_id: "prod-1".to_string(),
            quantity,
            reason: "damaged".to_string(),
        }
    }

    fn pending(order: &Order, quantity: i64, reason: &str) -> Refund {
        Refund::pending(
            "refund-1".to_string(),
            order,
            &order.items[0],
            "alice",
            "Mug".to_string(),
            quantity,
            reason,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_eligible_request_returns_line() {
        let order = order(0);
        let item = check_eligibility(Some(&order), &request(2), &[]).unwrap();
        assert_eq!(item.product_id, "prod-1");
    }

    #[test]
    fn test_missing_order_is_not_found() {
        let err = check_eligibility(None, &request(1), &[]).unwrap_err();
        assert!(matches!(err, RefundError::NotFound { ref entity, .. } if entity == "Order"));
    }

    #[test]
    fn test_other_users_order_is_forbidden() {
        let order = order(0);
        let mut req = request(1);
        req.user_id = "mallory".to_string();
        // Ownership is checked before the (also invalid) quantity.
        req.quantity = 0;
        let err = check_eligibility(Some(&order), &req, &[]).unwrap_err();
        assert!(matches!(err, RefundError::Forbidden { .. }));
    }

    #[test]
    fn test_invalid_inputs() {
        let order = order(0);

        let err = check_eligibility(Some(&order), &request(0), &[]).unwrap_err();
        assert!(matches!(err, RefundError::InvalidInput(_)));

        let mut req = request(1);
        req.product_id = "  ".to_string();
        let err = check_eligibility(Some(&order), &req, &[]).unwrap_err();
        assert!(matches!(err, RefundError::InvalidInput(_)));

        let mut req = request(1);
        req.reason = String::new();
        let err = check_eligibility(Some(&order), &req, &[]).unwrap_err();
        assert!(matches!(err, RefundError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_line_is_not_found() {
        let order = order(0);
        let mut req = request(1);
        req.product_id = "prod-9".to_string();
        let err = check_eligibility(Some(&order), &req, &[]).unwrap_err();
        assert!(matches!(err, RefundError::NotFound { ref entity, .. } if entity == "Order item"));
    }

    #[test]
    fn test_quantity_exceeded_reports_remaining() {
        let order = order(3);
        let err = check_eligibility(Some(&order), &request(1), &[]).unwrap_err();
        match err {
            RefundError::QuantityExceeded {
                requested,
                remaining,
                ..
            } => {
                assert_eq!(requested, 1);
                assert_eq!(remaining, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let order = self::order(1);
        let err = check_eligibility(Some(&order), &request(3), &[]).unwrap_err();
        assert!(matches!(err, RefundError::QuantityExceeded { remaining: 2, .. }));
    }

    #[test]
    fn test_identical_pending_refund_is_duplicate() {
        let order = order(2);
        let existing = vec![pending(&order, 1, "damaged")];
        let err = check_eligibility(Some(&order), &request(1), &existing).unwrap_err();
        assert!(matches!(err, RefundError::DuplicatePendingRefund { .. }));
    }

    #[test]
    fn test_different_pending_refund_is_not_duplicate() {
        let order = order(2);
        let existing = vec![pending(&order, 2, "damaged")];
        assert!(check_eligibility(Some(&order), &request(1), &existing).is_ok());

        let mut approved = pending(&order, 1, "damaged");
        approved.status = RefundStatus::Approved;
        assert!(check_eligibility(Some(&order), &request(1), &[approved]).is_ok());
    }
}

//! # Order Status State Machine
//!
//! Order status after refunds is a function of the line counters alone.
//!
//! ```text
//!   PaymentCompleted ─┐
//!   Shipped ──────────┼──(some units refunded)──► PartiallyRefunded
//!   Delivered ────────┘                                 │
//!          │                                            │
//!          └──────────(every line fully refunded)───────┴──► Cancelled (terminal)
//! ```
//!
//! Fulfilment transitions (PaymentCompleted → Shipped → Delivered) happen
//! elsewhere; this module only ever moves an order towards a refund state.

use crate::types::{Order, OrderItem, OrderStatus};

/// Derives the order status from post-mutation line counters.
///
/// An order with no lines keeps `current`.
pub fn derive_status(current: OrderStatus, items: &[OrderItem]) -> OrderStatus {
    if items.is_empty() {
        return current;
    }

    if items.iter().all(OrderItem::is_fully_refunded) {
        return OrderStatus::Cancelled;
    }

    if items.iter().any(|item| item.refunded_quantity > 0) {
        return OrderStatus::PartiallyRefunded;
    }

    current
}

/// Coupon that must be handed back for this order, if any.
///
/// Only a fully cancelled order releases its coupon.
pub fn coupon_to_restore(order: &Order) -> Option<&str> {
    if order.status == OrderStatus::Cancelled {
        order.coupon_code.as_deref()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(product_id: &str, quantity: i64, refunded: i64) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            quantity,
            paid_price_cents: 500,
            refunded_quantity: refunded,
        }
    }

    #[test]
    fn test_all_lines_refunded_cancels() {
        let items = vec![line("a", 3, 3), line("b", 1, 1)];
        assert_eq!(
            derive_status(OrderStatus::Delivered, &items),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_some_units_refunded_is_partial() {
        let items = vec![line("a", 3, 2)];
        assert_eq!(
            derive_status(OrderStatus::PaymentCompleted, &items),
            OrderStatus::PartiallyRefunded
        );

        let items = vec![line("a", 1, 1), line("b", 2, 0)];
        assert_eq!(
            derive_status(OrderStatus::Shipped, &items),
            OrderStatus::PartiallyRefunded
        );
    }

    #[test]
    fn test_no_refund_activity_keeps_status() {
        let items = vec![line("a", 2, 0)];
        assert_eq!(
            derive_status(OrderStatus::Shipped, &items),
            OrderStatus::Shipped
        );
    }

    #[test]
    fn test_empty_order_keeps_status() {
        assert_eq!(
            derive_status(OrderStatus::Delivered, &[]),
            OrderStatus::Delivered
        );
    }

    #[test]
    fn test_coupon_released_only_on_cancel() {
        let now = Utc::now();
        let mut order = Order {
            id: "o".to_string(),
            user_id: "u".to_string(),
            items: vec![line("a", 1, 1)],
            status: OrderStatus::PartiallyRefunded,
            coupon_code: Some("SAVE10".to_string()),
            discount_cents: 1000,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(coupon_to_restore(&order), None);

        order.status = OrderStatus::Cancelled;
        assert_eq!(coupon_to_restore(&order), Some("SAVE10"));

        order.coupon_code = None;
        assert_eq!(coupon_to_restore(&order), None);
    }
}

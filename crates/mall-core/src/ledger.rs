//! # Refund Ledger
//!
//! Read-side summary of an order's refunds.
//!
//! `OrderItem::refunded_quantity` is the authoritative counter. The ledger is
//! derived from refund rows for display, and [`divergences`] reports any line
//! where the two disagree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{RefundError, RefundResult};
use crate::money::Money;
use crate::types::{Order, Refund};

/// Refunds of one order plus the totals shown next to them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RefundLedger {
    /// Most recent first.
    pub refunds: Vec<Refund>,
    /// Σ refund amount, whatever the review status.
    pub total_refunded: Money,
    /// Σ paid price × quantity over the order's lines.
    pub order_amount: Money,
}

impl RefundLedger {
    /// Builds the ledger for `order` from its refund rows.
    ///
    /// Totals that overflow are stored-data corruption and come back as
    /// `RefundError::Unexpected`.
    pub fn compose(order: &Order, mut refunds: Vec<Refund>) -> RefundResult<Self> {
        // Stable: rows with equal timestamps keep their storage order.
        refunds.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total_refunded =
            Money::checked_sum(refunds.iter().map(Refund::amount)).ok_or_else(|| {
                RefundError::Unexpected(format!("refund total of order {} overflows", order.id))
            })?;
        let order_amount = order.total_paid().ok_or_else(|| {
            RefundError::Unexpected(format!("amount of order {} overflows", order.id))
        })?;

        Ok(RefundLedger {
            refunds,
            total_refunded,
            order_amount,
        })
    }
}

/// A line whose counter disagrees with its refund rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDivergence {
    pub product_id: String,
    /// What the order line says.
    pub refunded_quantity: i64,
    /// What the refund rows add up to.
    pub ledger_quantity: i64,
}

/// Compares each line's counter with the summed refund quantities.
pub fn divergences(order: &Order, refunds: &[Refund]) -> Vec<LedgerDivergence> {
    let mut per_product: BTreeMap<&str, i64> = BTreeMap::new();
    for refund in refunds.iter().filter(|r| r.order_id == order.id) {
        *per_product.entry(refund.product_id.as_str()).or_default() += refund.quantity;
    }

    let mut found: Vec<LedgerDivergence> = order
        .items
        .iter()
        .filter_map(|item| {
            let ledger_quantity = per_product
                .remove(item.product_id.as_str())
                .unwrap_or_default();
            (ledger_quantity != item.refunded_quantity).then(|| LedgerDivergence {
                product_id: item.product_id.clone(),
                refunded_quantity: item.refunded_quantity,
                ledger_quantity,
            })
        })
        .collect();

    // Refund rows pointing at a product the order does not contain.
    found.extend(
        per_product
            .into_iter()
            .map(|(product_id, ledger_quantity)| LedgerDivergence {
                product_id: product_id.to_string(),
                refunded_quantity: 0,
                ledger_quantity,
            }),
    );

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderItem, OrderStatus, RefundStatus};
    use chrono::{Duration, Utc};

    fn order(refunded: i64) -> Order {
        let now = Utc::now();
        Order {
            id: "order-1".to_string(),
            user_id: "alice".to_string(),
            items: vec![
                OrderItem {
                    product_id: "prod-1".to_string(),
                    quantity: 3,
                    paid_price_cents: 1000,
                    refunded_quantity: refunded,
                },
                OrderItem {
                    product_id: "prod-2".to_string(),
                    quantity: 1,
                    paid_price_cents: 250,
                    refunded_quantity: 0,
                },
            ],
            status: OrderStatus::Delivered,
            coupon_code: None,
            discount_cents: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn refund(id: &str, quantity: i64, minutes_ago: i64, order: &Order) -> Refund {
        Refund::pending(
            id.to_string(),
            order,
            &order.items[0],
            "alice",
            "Mug".to_string(),
            quantity,
            "damaged",
            Utc::now() - Duration::minutes(minutes_ago),
        )
        .unwrap()
    }

    #[test]
    fn test_compose_totals_and_ordering() {
        let order = order(3);
        let older = refund("r-old", 2, 10, &order);
        let mut newer = refund("r-new", 1, 1, &order);
        newer.status = RefundStatus::Rejected;

        let ledger = RefundLedger::compose(&order, vec![older, newer]).unwrap();
        assert_eq!(ledger.refunds[0].id, "r-new");
        assert_eq!(ledger.refunds[1].id, "r-old");
        assert_eq!(ledger.total_refunded.cents(), 3000);
        assert_eq!(ledger.order_amount.cents(), 3250);
    }

    #[test]
    fn test_compose_empty_ledger() {
        let order = order(0);
        let ledger = RefundLedger::compose(&order, Vec::new()).unwrap();
        assert!(ledger.refunds.is_empty());
        assert!(ledger.total_refunded.is_zero());
        assert_eq!(ledger.order_amount.cents(), 3250);
    }

    #[test]
    fn test_ledger_json_shape() {
        let order = order(0);
        let ledger = RefundLedger::compose(&order, Vec::new()).unwrap();
        let json = serde_json::to_value(ledger).unwrap();
        assert_eq!(json["totalRefunded"], 0);
        assert_eq!(json["orderAmount"], 3250);
    }

    #[test]
    fn test_consistent_ledger_has_no_divergence() {
        let order = order(3);
        let refunds = vec![refund("a", 2, 5, &order), refund("b", 1, 1, &order)];
        assert!(divergences(&order, &refunds).is_empty());
    }

    #[test]
    fn test_divergence_is_reported() {
        let order = order(2);
        let refunds = vec![refund("a", 1, 5, &order)];
        let found = divergences(&order, &refunds);
        assert_eq!(
            found,
            vec![LedgerDivergence {
                product_id: "prod-1".to_string(),
                refunded_quantity: 2,
                ledger_quantity: 1,
            }]
        );
    }
}

//! # Refund Ledger Query
//!
//! Read-only view of an order's refunds with their totals.
//!
//! Order and refund rows come from one read transaction so the totals and the
//! row list describe the same moment. Each read also cross-checks the ledger
//! against the line counters and reports drift with `error!`.

use mall_core::{ledger, RefundError, RefundLedger, RefundResult};
use mall_db::Database;
use tracing::{error, instrument};

/// Serves refund ledgers to order owners.
#[derive(Debug, Clone)]
pub struct RefundLedgerQuery {
    db: Database,
}

impl RefundLedgerQuery {
    pub fn new(db: Database) -> Self {
        RefundLedgerQuery { db }
    }

    /// Refunds for `order_id`, most recent first, with totals.
    ///
    /// ## Returns
    /// * `Err(RefundError::NotFound)` - No such order
    /// * `Err(RefundError::Forbidden)` - `user_id` did not place the order
    #[instrument(skip(self))]
    pub async fn refunds_for_order(
        &self,
        user_id: &str,
        order_id: &str,
    ) -> RefundResult<RefundLedger> {
        let mut tx = self.db.begin().await?;

        let order = self
            .db
            .orders()
            .fetch(&mut tx, order_id)
            .await?
            .ok_or_else(|| RefundError::not_found("Order", order_id))?;

        if !order.is_owned_by(user_id) {
            return Err(RefundError::Forbidden {
                order_id: order.id.clone(),
            });
        }

        let refunds = self.db.refunds().list_for_order(&mut tx, &order.id).await?;

        // Nothing was written; release the snapshot.
        if let Err(e) = tx.rollback().await {
            error!(error = %e, "Failed to release read transaction");
        }

        for drift in ledger::divergences(&order, &refunds) {
            error!(
                order_id = %order.id,
                product_id = %drift.product_id,
                refunded_quantity = drift.refunded_quantity,
                ledger_quantity = drift.ledger_quantity,
                "Refund ledger disagrees with item counter"
            );
        }

        RefundLedger::compose(&order, refunds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mall_core::{Order, OrderItem, OrderStatus};
    use mall_db::DbConfig;

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        db.orders()
            .insert(&Order {
                id: "o-1".into(),
                user_id: "alice".into(),
                items: vec![OrderItem {
                    product_id: "p".into(),
                    quantity: 2,
                    paid_price_cents: 750,
                    refunded_quantity: 0,
                }],
                status: OrderStatus::Delivered,
                coupon_code: None,
                discount_cents: 0,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_empty_ledger() {
        let query = RefundLedgerQuery::new(setup().await);

        let ledger = query.refunds_for_order("alice", "o-1").await.unwrap();
        assert!(ledger.refunds.is_empty());
        assert!(ledger.total_refunded.is_zero());
        assert_eq!(ledger.order_amount.cents(), 1500);
    }

    #[tokio::test]
    async fn test_ownership_checks() {
        let query = RefundLedgerQuery::new(setup().await);

        assert!(matches!(
            query.refunds_for_order("bob", "o-1").await,
            Err(RefundError::Forbidden { .. })
        ));
        assert!(matches!(
            query.refunds_for_order("alice", "missing").await,
            Err(RefundError::NotFound { .. })
        ));
    }
}

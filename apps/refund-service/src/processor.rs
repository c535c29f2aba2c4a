//! # Refund Processor
//!
//! Turns a validated refund request into one atomic change: a pending refund
//! row, a bumped line counter, a re-derived order status and, on full
//! cancellation, a restored coupon.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request_refund(request)                                                │
//! │                                                                         │
//! │  1. Advisory pre-check (pool reads, no lock)   ── fail fast            │
//! │  2. Catalog name lookup (timeout, placeholder) ── outside any lock     │
//! │                                                                         │
//! │  ┌───────────────────── SINGLE TRANSACTION ───────────────────────┐    │
//! │  │ 3. claim order row          → write lock (waits busy_timeout)  │    │
//! │  │ 4. re-read order + refunds  → check_eligibility again          │    │
//! │  │ 5. insert pending refund    (amount = paid_price × quantity)   │    │
//! │  │ 6. bounded counter update   → 0 rows = TransactionConflict     │    │
//! │  │ 7. re-read lines            → derive_status → persist          │    │
//! │  │ 8. Cancelled + coupon?      → CouponRestoration                │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │  9. COMMIT, or explicit ROLLBACK before the error is returned          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use mall_core::{
    check_eligibility, derive_status, OrderStatus, Refund, RefundError, RefundRequest,
    RefundResult,
};
use mall_db::{Database, DbError};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{debug, error, info, instrument, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::CatalogLookup;
use crate::coupon::{CouponRestoration, RestoreOutcome};

/// Result of a successful refund request.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RefundOutcome {
    pub refund: Refund,
    /// Confirmation shown to the customer.
    pub message: String,
    pub order_status: OrderStatus,
}

/// Processes refund requests against orders.
#[derive(Debug, Clone)]
pub struct RefundProcessor {
    db: Database,
    catalog: CatalogLookup,
    coupons: CouponRestoration,
}

impl RefundProcessor {
    pub fn new(db: Database, catalog: CatalogLookup) -> Self {
        let coupons = CouponRestoration::new(db.coupons());
        RefundProcessor {
            db,
            catalog,
            coupons,
        }
    }

    /// Requests a refund of `request.quantity` units of one order line.
    ///
    /// Either everything is written or nothing is.
    #[instrument(
        skip(self, request),
        fields(
            order_id = %request.order_id,
            product_id = %request.product_id,
            quantity = request.quantity
        )
    )]
    pub async fn request_refund(&self, request: RefundRequest) -> RefundResult<RefundOutcome> {
        self.precheck(&request).await?;

        let product_name = self.catalog.product_name(request.product_id.trim()).await;

        let mut tx = self.db.begin().await?;

        match self.apply(&mut tx, &request, product_name).await {
            Ok(outcome) => {
                tx.commit().await.map_err(DbError::from)?;
                info!(
                    refund_id = %outcome.refund.id,
                    amount = %outcome.refund.amount(),
                    order_status = ?outcome.order_status,
                    "Refund requested"
                );
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "Rollback failed");
                }
                if err.is_business_rule() {
                    debug!(error = %err, "Refund rejected");
                } else {
                    warn!(error = %err, "Refund aborted");
                }
                Err(err)
            }
        }
    }

    /// Eligibility against current committed state, without locking.
    async fn precheck(&self, request: &RefundRequest) -> RefundResult<()> {
        let order = self.db.orders().get_by_id(&request.order_id).await?;
        let refunds = match &order {
            Some(order) => self.db.refunds().list_by_order(&order.id).await?,
            None => Vec::new(),
        };
        check_eligibility(order.as_ref(), request, &refunds)?;
        Ok(())
    }

    async fn apply(
        &self,
        conn: &mut SqliteConnection,
        request: &RefundRequest,
        product_name: String,
    ) -> RefundResult<RefundOutcome> {
        let now = Utc::now();
        let orders = self.db.orders();
        let refunds = self.db.refunds();

        orders.claim(conn, &request.order_id, now).await?;

        let order = orders.fetch(conn, &request.order_id).await?;
        let existing = refunds.list_for_order(conn, &request.order_id).await?;
        let order = order.ok_or_else(|| RefundError::not_found("Order", &request.order_id))?;
        let item = check_eligibility(Some(&order), request, &existing)?;

        let refund = Refund::pending(
            Uuid::new_v4().to_string(),
            &order,
            item,
            &request.user_id,
            product_name,
            request.quantity,
            &request.reason,
            now,
        )?;
        refunds.insert(conn, &refund).await?;

        let moved = orders
            .increment_refunded(conn, &order.id, &item.product_id, request.quantity)
            .await?;
        if !moved {
            return Err(RefundError::TransactionConflict(format!(
                "refunded quantity for product {} changed during the request",
                item.product_id
            )));
        }

        let mut updated = orders
            .fetch(conn, &order.id)
            .await?
            .ok_or_else(|| RefundError::not_found("Order", &order.id))?;
        let status = derive_status(updated.status, &updated.items);
        orders.set_status(conn, &updated.id, status, now).await?;
        updated.status = status;

        if let RestoreOutcome::Restored(code) = self.coupons.restore(conn, &updated).await? {
            debug!(coupon = %code, "Coupon returned with cancellation");
        }

        let message = confirmation_message(&refund, status);
        Ok(RefundOutcome {
            refund,
            message,
            order_status: status,
        })
    }
}

fn confirmation_message(refund: &Refund, status: OrderStatus) -> String {
    let mut message = format!(
        "Refund of {} requested for {} x {}.",
        refund.amount(),
        refund.quantity,
        refund.product_name
    );
    if status == OrderStatus::Cancelled {
        message.push_str(" The order is now fully cancelled.");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mall_core::Money;

    #[test]
    fn test_confirmation_message() {
        let now = Utc::now();
        let refund = Refund {
            id: "r".into(),
            order_id: "o".into(),
            user_id: "u".into(),
            product_id: "p".into(),
            product_name: "Ceramic Mug".into(),
            quantity: 2,
            amount_cents: Money::from_cents(2000).cents(),
            reason: "chipped".into(),
            status: Default::default(),
            admin_note: None,
            processed_at: None,
            created_at: now,
        };

        assert_eq!(
            confirmation_message(&refund, OrderStatus::PartiallyRefunded),
            "Refund of 20.00 requested for 2 x Ceramic Mug."
        );
        assert!(confirmation_message(&refund, OrderStatus::Cancelled).ends_with("fully cancelled."));
    }
}

//! # Coupon Restoration
//!
//! Hands a consumed coupon back when its order ends up fully cancelled.
//! Runs on the refund transaction's connection so it commits or rolls back
//! together with the refund that triggered it.

use mall_core::{coupon_to_restore, Order, RefundResult};
use mall_db::CouponRepository;
use sqlx::SqliteConnection;
use tracing::{info, instrument, warn};

/// What restoration did for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Order not cancelled, or no coupon on it.
    NotApplicable,
    /// Coupon is active again.
    Restored(String),
    /// Order names a coupon that does not exist.
    Missing(String),
}

/// Restores the coupon of a cancelled order, if any.
#[derive(Debug, Clone)]
pub struct CouponRestoration {
    coupons: CouponRepository,
}

impl CouponRestoration {
    pub fn new(coupons: CouponRepository) -> Self {
        CouponRestoration { coupons }
    }

    /// Reactivates the order's coupon when the order is `Cancelled`.
    ///
    /// Safe to call repeatedly. A missing coupon is logged, not an error.
    #[instrument(skip(self, conn, order), fields(order_id = %order.id))]
    pub async fn restore(
        &self,
        conn: &mut SqliteConnection,
        order: &Order,
    ) -> RefundResult<RestoreOutcome> {
        let Some(code) = coupon_to_restore(order) else {
            return Ok(RestoreOutcome::NotApplicable);
        };

        if self.coupons.reactivate(conn, code).await? {
            info!(coupon = %code, "Coupon restored");
            Ok(RestoreOutcome::Restored(code.to_string()))
        } else {
            warn!(coupon = %code, "Cancelled order references a missing coupon");
            Ok(RestoreOutcome::Missing(code.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mall_core::{Coupon, CouponStatus, OrderItem, OrderStatus};
    use mall_db::{Database, DbConfig};

    fn order(status: OrderStatus, coupon: Option<&str>) -> Order {
        let now = Utc::now();
        Order {
            id: "o-1".into(),
            user_id: "alice".into(),
            items: vec![OrderItem {
                product_id: "p".into(),
                quantity: 1,
                paid_price_cents: 100,
                refunded_quantity: 1,
            }],
            status,
            coupon_code: coupon.map(str::to_string),
            discount_cents: 0,
            created_at: now,
            updated_at: now,
        }
    }

    async fn db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.coupons()
            .insert(&Coupon {
                code: "SAVE10".into(),
                discount_cents: 1000,
                user_id: Some("alice".into()),
                status: CouponStatus::Used,
                used_at: Some(Utc::now()),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_partial_refund_leaves_coupon_used() {
        let db = db().await;
        let restoration = CouponRestoration::new(db.coupons());
        let mut conn = db.pool().acquire().await.unwrap();

        let outcome = restoration
            .restore(&mut conn, &order(OrderStatus::PartiallyRefunded, Some("SAVE10")))
            .await
            .unwrap();
        drop(conn);

        assert_eq!(outcome, RestoreOutcome::NotApplicable);
        let coupon = db.coupons().get_by_code("SAVE10").await.unwrap().unwrap();
        assert_eq!(coupon.status, CouponStatus::Used);
    }

    #[tokio::test]
    async fn test_cancelled_order_restores_twice() {
        let db = db().await;
        let restoration = CouponRestoration::new(db.coupons());
        let cancelled = order(OrderStatus::Cancelled, Some("SAVE10"));
        let mut conn = db.pool().acquire().await.unwrap();

        for _ in 0..2 {
            let outcome = restoration.restore(&mut conn, &cancelled).await.unwrap();
            assert_eq!(outcome, RestoreOutcome::Restored("SAVE10".into()));
        }
        drop(conn);

        let coupon = db.coupons().get_by_code("SAVE10").await.unwrap().unwrap();
        assert_eq!(coupon.status, CouponStatus::Active);
        assert!(coupon.user_id.is_none());
    }

    #[tokio::test]
    async fn test_missing_coupon_is_not_an_error() {
        let db = db().await;
        let restoration = CouponRestoration::new(db.coupons());
        let mut conn = db.pool().acquire().await.unwrap();

        let outcome = restoration
            .restore(&mut conn, &order(OrderStatus::Cancelled, Some("GHOST")))
            .await
            .unwrap();
        assert_eq!(outcome, RestoreOutcome::Missing("GHOST".into()));
    }
}

//! # Refund Repository
//!
//! Database operations for the refund ledger.
//!
//! Rows are append-only from the refund processor's point of view: it inserts
//! a `pending` row and never touches it again. The only update is
//! [`RefundRepository::resolve_pending`], the hook for an approval workflow.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use mall_core::{Refund, RefundDecision};

/// Repository for refund database operations.
#[derive(Debug, Clone)]
pub struct RefundRepository {
    pool: SqlitePool,
}

impl RefundRepository {
    /// Creates a new RefundRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RefundRepository { pool }
    }

    /// Gets a refund by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Refund>> {
        let refund: Option<Refund> = sqlx::query_as(
            r#"
            SELECT id, order_id, user_id, product_id, product_name, quantity,
                   amount_cents, reason, status, admin_note, processed_at, created_at
            FROM refunds
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(refund)
    }

    /// Refunds of an order on the pool, most recent first.
    pub async fn list_by_order(&self, order_id: &str) -> DbResult<Vec<Refund>> {
        let mut conn = self.pool.acquire().await?;
        self.list_for_order(&mut conn, order_id).await
    }

    /// Refunds of an order on the given connection, most recent first.
    pub async fn list_for_order(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
    ) -> DbResult<Vec<Refund>> {
        let refunds: Vec<Refund> = sqlx::query_as(
            r#"
            SELECT id, order_id, user_id, product_id, product_name, quantity,
                   amount_cents, reason, status, admin_note, processed_at, created_at
            FROM refunds
            WHERE order_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(refunds)
    }

    /// Inserts a refund row on the given connection.
    pub async fn insert(&self, conn: &mut SqliteConnection, refund: &Refund) -> DbResult<()> {
        debug!(
            refund_id = %refund.id,
            order_id = %refund.order_id,
            amount = %refund.amount(),
            "Inserting refund"
        );

        sqlx::query(
            r#"
            INSERT INTO refunds (
                id, order_id, user_id, product_id, product_name, quantity,
                amount_cents, reason, status, admin_note, processed_at, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12
            )
            "#,
        )
        .bind(&refund.id)
        .bind(&refund.order_id)
        .bind(&refund.user_id)
        .bind(&refund.product_id)
        .bind(&refund.product_name)
        .bind(refund.quantity)
        .bind(refund.amount_cents)
        .bind(&refund.reason)
        .bind(refund.status)
        .bind(&refund.admin_note)
        .bind(refund.processed_at)
        .bind(refund.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Records an approval decision on a pending refund.
    ///
    /// Item counters and order status stay as they are; the refund processor
    /// already moved them when the refund was requested.
    ///
    /// ## Returns
    /// * `Ok(Refund)` - The refund in its new state
    /// * `Err(DbError::NotFound)` - No such refund
    /// * `Err(DbError::InvalidState)` - Refund was already decided
    pub async fn resolve_pending(
        &self,
        refund_id: &str,
        decision: RefundDecision,
        admin_note: Option<&str>,
    ) -> DbResult<Refund> {
        let now = Utc::now();
        let status = decision.status();

        let result = sqlx::query(
            r#"
            UPDATE refunds
            SET status = ?2, admin_note = ?3, processed_at = ?4
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(refund_id)
        .bind(status)
        .bind(admin_note)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let refund = self
            .get_by_id(refund_id)
            .await?
            .ok_or_else(|| DbError::not_found("Refund", refund_id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::InvalidState(format!(
                "refund {} is already {:?}",
                refund_id, refund.status
            )));
        }

        info!(refund_id = %refund_id, status = ?status, "Refund decision recorded");
        Ok(refund)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;
    use mall_core::{Order, OrderItem, OrderStatus, RefundStatus};

    async fn seeded() -> (Database, Order) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let order = Order {
            id: "o-1".to_string(),
            user_id: "alice".to_string(),
            items: vec![OrderItem {
                product_id: "prod-1".to_string(),
                quantity: 3,
                paid_price_cents: 1000,
                refunded_quantity: 0,
            }],
            status: OrderStatus::Delivered,
            coupon_code: None,
            discount_cents: 0,
            created_at: now,
            updated_at: now,
        };
        db.orders().insert(&order).await.unwrap();
        (db, order)
    }

    fn refund(order: &Order, id: &str, quantity: i64, minutes_ago: i64) -> Refund {
        Refund::pending(
            id.to_string(),
            order,
            &order.items[0],
            "alice",
            "Mug".to_string(),
            quantity,
            "chipped",
            Utc::now() - Duration::minutes(minutes_ago),
        )
        .unwrap()
    }

    async fn insert(db: &Database, refund: &Refund) {
        let mut tx = db.begin().await.unwrap();
        db.refunds().insert(&mut tx, refund).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_list_most_recent_first() {
        let (db, order) = seeded().await;
        insert(&db, &refund(&order, "r-old", 2, 30)).await;
        insert(&db, &refund(&order, "r-new", 1, 1)).await;

        let refunds = db.refunds().list_by_order("o-1").await.unwrap();
        let ids: Vec<&str> = refunds.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r-new", "r-old"]);
        assert_eq!(refunds[1].amount_cents, 2000);
        assert_eq!(refunds[1].status, RefundStatus::Pending);
        assert!(refunds[1].processed_at.is_none());
    }

    #[tokio::test]
    async fn test_refund_for_missing_order_rejected() {
        let (db, order) = seeded().await;
        let mut orphan = refund(&order, "r-1", 1, 0);
        orphan.order_id = "missing".to_string();

        let mut tx = db.begin().await.unwrap();
        let err = db.refunds().insert(&mut tx, &orphan).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_resolve_pending() {
        let (db, order) = seeded().await;
        insert(&db, &refund(&order, "r-1", 1, 0)).await;

        let approved = db
            .refunds()
            .resolve_pending("r-1", RefundDecision::Approve, Some("ok"))
            .await
            .unwrap();
        assert_eq!(approved.status, RefundStatus::Approved);
        assert_eq!(approved.admin_note.as_deref(), Some("ok"));
        assert!(approved.processed_at.is_some());

        let err = db
            .refunds()
            .resolve_pending("r-1", RefundDecision::Reject, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)));

        let err = db
            .refunds()
            .resolve_pending("nope", RefundDecision::Reject, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}

//! # Order Repository
//!
//! Database operations for orders and their lines.
//!
//! ## Refund-Time Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Inside the refund transaction                         │
//! │                                                                         │
//! │  1. claim()               UPDATE orders SET updated_at = ? WHERE id = ?│
//! │                           └── first statement: takes the write lock    │
//! │                                                                         │
//! │  2. fetch()               SELECT order + lines (fresh, locked state)   │
//! │                                                                         │
//! │  3. increment_refunded()  UPDATE order_items                           │
//! │                           SET refunded_quantity = refunded_quantity + n│
//! │                           WHERE ... AND refunded_quantity + n <= qty   │
//! │                           └── 0 rows → caller aborts, never clamps     │
//! │                                                                         │
//! │  4. set_status()          UPDATE orders SET status = ?                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use mall_core::{Order, OrderItem, OrderStatus};

/// Order header as stored; lines live in `order_items`.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    status: OrderStatus,
    coupon_code: Option<String>,
    discount_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn with_items(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            items,
            status: self.status,
            coupon_code: self.coupon_code,
            discount_cents: self.discount_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and its lines in one transaction.
    ///
    /// Checkout owns order creation; this exists for seeding and tests.
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(order_id = %order.id, lines = order.items.len(), "Inserting order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, status, coupon_code, discount_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.status)
        .bind(&order.coupon_code)
        .bind(order.discount_cents)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_id, position, product_id,
                    quantity, paid_price_cents, refunded_quantity
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&order.id)
            .bind(position as i64)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.paid_price_cents)
            .bind(item.refunded_quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets an order with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        self.fetch(&mut conn, id).await
    }

    /// Orders placed by one user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, status, coupon_code, discount_cents, created_at, updated_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        attach_items(&mut conn, rows).await
    }

    /// Every order, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, status, coupon_code, discount_cents, created_at, updated_at
            FROM orders
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        attach_items(&mut conn, rows).await
    }

    // =========================================================================
    // Connection-scoped operations (run inside the caller's transaction)
    // =========================================================================

    /// Reads an order and its lines on the given connection.
    pub async fn fetch(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, status, coupon_code, discount_cents, created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => {
                let items = load_items(conn, &row.id).await?;
                Ok(Some(row.with_items(items)))
            }
            None => Ok(None),
        }
    }

    /// Touches the order row so the transaction holds the write lock.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such order
    /// * `Err(DbError::Busy)` - Lock not acquired within the busy timeout
    pub async fn claim(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        debug!(order_id = %id, "Order row claimed");
        Ok(())
    }

    /// Adds `quantity` to a line's refunded counter if it stays within bounds.
    ///
    /// ## Returns
    /// * `Ok(true)` - Counter moved
    /// * `Ok(false)` - The bound would be crossed (or no such line); nothing changed
    pub async fn increment_refunded(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE order_items
            SET refunded_quantity = refunded_quantity + ?1
            WHERE order_id = ?2
              AND product_id = ?3
              AND refunded_quantity + ?1 <= quantity
            "#,
        )
        .bind(quantity)
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Persists a derived order status.
    pub async fn set_status(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(order_id)
            .bind(status)
            .bind(now)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }
}

async fn load_items(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Vec<OrderItem>> {
    let items: Vec<OrderItem> = sqlx::query_as(
        r#"
        SELECT product_id, quantity, paid_price_cents, refunded_quantity
        FROM order_items
        WHERE order_id = ?1
        ORDER BY position
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

async fn attach_items(conn: &mut SqliteConnection, rows: Vec<OrderRow>) -> DbResult<Vec<Order>> {
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = load_items(conn, &row.id).await?;
        orders.push(row.with_items(items));
    }
    Ok(orders)
}

// =============================================================================
// Unit Tests
// =============================================================================

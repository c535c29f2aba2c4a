//! # Coupon Repository
//!
//! Database operations for coupons.
//!
//! ## Coupon States
//! ```text
//!   active ──(checkout redeems)──► used ──(order fully cancelled)──► active
//!                                   │                                  ▲
//!                                   └──── user_id, used_at cleared ────┘
//! ```
//! Redemption is checkout's job. Within this workspace a coupon only ever
//! moves back from `used` to `active`.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use mall_core::Coupon;

/// Repository for coupon database operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Inserts a coupon (seeding and tests).
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<()> {
        debug!(code = %coupon.code, "Inserting coupon");

        sqlx::query(
            r#"
            INSERT INTO coupons (code, discount_cents, user_id, status, used_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&coupon.code)
        .bind(coupon.discount_cents)
        .bind(&coupon.user_id)
        .bind(coupon.status)
        .bind(coupon.used_at)
        .bind(coupon.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a coupon by code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Coupon>> {
        let coupon: Option<Coupon> = sqlx::query_as(
            r#"
            SELECT code, discount_cents, user_id, status, used_at, created_at
            FROM coupons
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Puts a coupon back into circulation on the given connection.
    ///
    /// Re-running it on an already active coupon is a no-op that still
    /// reports `true`.
    ///
    /// ## Returns
    /// * `Ok(true)` - Coupon exists and is now active
    /// * `Ok(false)` - No coupon with this code
    pub async fn reactivate(&self, conn: &mut SqliteConnection, code: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET status = 'active', user_id = NULL, used_at = NULL
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Marks a coupon as redeemed by a user (checkout side; seeding and tests).
    pub async fn mark_used(&self, code: &str, user_id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET status = 'used', user_id = ?2, used_at = ?3
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

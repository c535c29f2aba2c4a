//! Shared fixtures for the refund service integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mall_core::{Coupon, CouponStatus, Order, OrderItem, OrderStatus, Product, RefundRequest};
use mall_db::{Database, DbConfig};
use mall_refund_service::{CatalogEntry, CatalogError, CatalogLookup, ProductCatalog};

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";

pub const MUG: &str = "prod-mug";
pub const TEE: &str = "prod-tee";

pub const PLACEHOLDER: &str = "Unknown product";

pub async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Catalog backed by the products table.
pub fn table_catalog(db: &Database) -> CatalogLookup {
    lookup(Arc::new(db.products()))
}

pub fn lookup(catalog: Arc<dyn ProductCatalog>) -> CatalogLookup {
    CatalogLookup::new(catalog, Duration::from_millis(200), PLACEHOLDER.to_string())
}

/// Catalog that always fails.
pub struct DownCatalog;

#[async_trait]
impl ProductCatalog for DownCatalog {
    async fn lookup(&self, _: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        Err(CatalogError::Unavailable("connection refused".into()))
    }
}

/// Catalog that never answers in time.
pub struct SlowCatalog;

#[async_trait]
impl ProductCatalog for SlowCatalog {
    async fn lookup(&self, _: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(None)
    }
}

pub async fn add_product(db: &Database, id: &str, name: &str, price_cents: i64) {
    let now = Utc::now();
    db.products()
        .insert(&Product {
            id: id.to_string(),
            name: name.to_string(),
            price_cents,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("insert product");
}

pub async fn add_used_coupon(db: &Database, code: &str, user_id: &str) {
    let now = Utc::now();
    db.coupons()
        .insert(&Coupon {
            code: code.to_string(),
            discount_cents: 1000,
            user_id: Some(user_id.to_string()),
            status: CouponStatus::Used,
            used_at: Some(now),
            created_at: now,
        })
        .await
        .expect("insert coupon");
}

pub fn line(product_id: &str, quantity: i64, paid_price_cents: i64) -> OrderItem {
    OrderItem {
        product_id: product_id.to_string(),
        quantity,
        paid_price_cents,
        refunded_quantity: 0,
    }
}

pub async fn add_order(
    db: &Database,
    id: &str,
    user_id: &str,
    items: Vec<OrderItem>,
    coupon: Option<&str>,
    created_at: DateTime<Utc>,
) -> Order {
    let order = Order {
        id: id.to_string(),
        user_id: user_id.to_string(),
        items,
        status: OrderStatus::Delivered,
        coupon_code: coupon.map(str::to_string),
        discount_cents: if coupon.is_some() { 1000 } else { 0 },
        created_at,
        updated_at: created_at,
    };
    db.orders().insert(&order).await.expect("insert order");
    order
}

/// Mug and tee in the catalog, `SAVE10` consumed by alice, and:
/// - `order-a`: alice, 3 mugs at 10.00, paid with `SAVE10`
/// - `order-e`: alice, 1 mug at 10.00 and 2 tees at 25.00, paid with `SAVE10`
pub async fn seeded_db() -> Database {
    let db = memory_db().await;
    add_product(&db, MUG, "Ceramic Mug", 1000).await;
    add_product(&db, TEE, "Logo T-Shirt", 2500).await;
    add_used_coupon(&db, "SAVE10", ALICE).await;

    let now = Utc::now();
    add_order(&db, "order-a", ALICE, vec![line(MUG, 3, 1000)], Some("SAVE10"), now).await;
    add_order(
        &db,
        "order-e",
        ALICE,
        vec![line(MUG, 1, 1000), line(TEE, 2, 2500)],
        Some("SAVE10"),
        now,
    )
    .await;
    db
}

pub fn request(order_id: &str, user_id: &str, product_id: &str, quantity: i64) -> RefundRequest {
    RefundRequest {
        order_id: order_id.to_string(),
        user_id: user_id.to_string(),
        product_id: product_id.to_string(),
        quantity,
        reason: "arrived damaged".to_string(),
    }
}

pub async fn refunded_quantity(db: &Database, order_id: &str, product_id: &str) -> i64 {
    let order = db
        .orders()
        .get_by_id(order_id)
        .await
        .expect("load order")
        .expect("order exists");
    order.item(product_id).expect("line exists").refunded_quantity
}

pub async fn order_status(db: &Database, order_id: &str) -> OrderStatus {
    db.orders()
        .get_by_id(order_id)
        .await
        .expect("load order")
        .expect("order exists")
        .status
}

pub async fn coupon_status(db: &Database, code: &str) -> CouponStatus {
    db.coupons()
        .get_by_code(code)
        .await
        .expect("load coupon")
        .expect("coupon exists")
        .status
}

pub async fn refund_count(db: &Database, order_id: &str) -> usize {
    db.refunds()
        .list_by_order(order_id)
        .await
        .expect("list refunds")
        .len()
}

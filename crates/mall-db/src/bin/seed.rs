//! # Seed Data Generator
//!
//! Populates a database with demo products, coupons and orders so the
//! `mall-refund` CLI has something to work on.
//!
//! ## Usage
//! ```bash
//! cargo run -p mall-db --bin seed
//!
//! # Specify database path
//! cargo run -p mall-db --bin seed -- --db ./data/mall.db
//! ```
//!
//! ## Generated Data
//! - A small catalog (mugs, tees, notebooks, ...)
//! - Coupons `SAVE10` (used by alice) and `WELCOME5` (active)
//! - Orders for `alice` and `bob`, one of them carrying `SAVE10`

use chrono::{Duration, Utc};
use mall_core::validation::{validate_coupon_code, validate_price_cents};
use mall_core::{Coupon, CouponStatus, Order, OrderItem, OrderStatus, Product};
use mall_db::{Database, DbConfig};
use std::env;
use uuid::Uuid;

/// (id, name, price in cents)
const CATALOG: &[(&str, &str, i64)] = &[
    ("prod-mug", "Ceramic Mug", 1000),
    ("prod-tee", "Logo T-Shirt", 2500),
    ("prod-note", "Dotted Notebook", 800),
    ("prod-pen", "Gel Pen 3-Pack", 450),
    ("prod-bag", "Canvas Tote", 1800),
    ("prod-cap", "Baseball Cap", 2200),
];

/// (user, coupon, lines as (product index, quantity), status, days ago)
type OrderSpec = (
    &'static str,
    Option<&'static str>,
    &'static [(usize, i64)],
    OrderStatus,
    i64,
);

const ORDERS: &[OrderSpec] = &[
    ("alice", Some("SAVE10"), &[(0, 3)], OrderStatus::Delivered, 3),
    ("alice", None, &[(1, 1), (2, 2)], OrderStatus::Shipped, 1),
    ("bob", None, &[(3, 4), (4, 1), (5, 1)], OrderStatus::PaymentCompleted, 0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./mall_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mall Refunds Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./mall_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mall Refunds Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    for (id, name, price_cents) in CATALOG {
        validate_price_cents(*price_cents)?;
        db.products()
            .insert(&Product {
                id: id.to_string(),
                name: name.to_string(),
                price_cents: *price_cents,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("✓ {} products", CATALOG.len());

    for (code, discount_cents) in [("SAVE10", 1000), ("WELCOME5", 500)] {
        validate_coupon_code(code)?;
        db.coupons()
            .insert(&Coupon {
                code: code.to_string(),
                discount_cents,
                user_id: None,
                status: CouponStatus::Active,
                used_at: None,
                created_at: now,
            })
            .await?;
    }
    println!("✓ 2 coupons");

    for (user_id, coupon, lines, status, days_ago) in ORDERS {
        let created_at = now - Duration::days(*days_ago);
        let items = lines
            .iter()
            .map(|(index, quantity)| {
                let (product_id, _, price_cents) = CATALOG[*index];
                OrderItem {
                    product_id: product_id.to_string(),
                    quantity: *quantity,
                    paid_price_cents: price_cents,
                    refunded_quantity: 0,
                }
            })
            .collect();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            items,
            status: *status,
            coupon_code: coupon.map(str::to_string),
            discount_cents: if coupon.is_some() { 1000 } else { 0 },
            created_at,
            updated_at: created_at,
        };
        db.orders().insert(&order).await?;

        if let Some(code) = coupon {
            db.coupons().mark_used(code, user_id).await?;
        }

        println!(
            "  order {} for {} ({} lines, total {})",
            order.id,
            order.user_id,
            order.items.len(),
            order.total_paid().unwrap_or_default()
        );
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

//! # mall-db: Database Layer for Mall Refunds
//!
//! SQLite persistence for orders, refunds, coupons and the catalog stand-in.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mall Refunds Data Flow                           │
//! │                                                                         │
//! │  RefundProcessor::request_refund                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     mall-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ OrderRepo     │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ RefundRepo    │    │              │  │   │
//! │  │   │ begin() → tx  │    │ CouponRepo    │    │              │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL) ── mall.db                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pool vs Connection Methods
//!
//! Repository methods taking only `&self` run on the pool. Methods taking a
//! `&mut SqliteConnection` run on whatever the caller passes, normally an
//! open transaction, so several of them commit or roll back together.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mall_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("mall.db")).await?;
//! let orders = db.orders().list_for_user("alice").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::coupon::CouponRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::refund::RefundRepository;

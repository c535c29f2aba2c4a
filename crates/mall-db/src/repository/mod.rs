//! # Repository Module
//!
//! Database repository implementations for Mall Refunds.
//!
//! ## Who Writes What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Table         Written by (in scope)          Repository               │
//! │  ───────────   ────────────────────────────   ──────────────────────   │
//! │  orders        refund transaction (status)    OrderRepository          │
//! │  order_items   refund transaction (counter)   OrderRepository          │
//! │  refunds       refund transaction (insert)    RefundRepository         │
//! │                approval workflow (decision)                            │
//! │  coupons       coupon restoration             CouponRepository         │
//! │  products      never (read-only catalog)      ProductRepository        │
//! │                                                                         │
//! │  Inserts of orders, coupons and products exist for checkout-side      │
//! │  tooling: the seed binary and tests.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod coupon;
pub mod order;
pub mod product;
pub mod refund;

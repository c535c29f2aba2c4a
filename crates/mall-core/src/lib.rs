//! # mall-core: Pure Refund Logic for Mall Refunds
//!
//! This crate is the **heart** of the refund subsystem. It decides whether a
//! refund may happen, what an order's status becomes afterwards, and how the
//! refund ledger adds up. It never touches a database or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mall Refunds Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 refund-service (orchestration)                  │   │
//! │  │   RefundProcessor, RefundLedgerQuery, OrderQueries, ApiError    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ mall-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌───────────┐  ┌─────────┐   │   │
//! │  │   │   types   │  │ eligibility │  │  status   │  │ ledger  │   │   │
//! │  │   │  Order    │  │  checks in  │  │  state    │  │ totals  │   │   │
//! │  │   │  Refund   │  │ fixed order │  │  machine  │  │ + drift │   │   │
//! │  │   └───────────┘  └─────────────┘  └───────────┘  └─────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mall-db (Database Layer)                     │   │
//! │  │         SQLite repositories, transactions, migrations           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, OrderItem, Refund, Coupon, Product)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Refund error taxonomy and input validation errors
//! - [`validation`] - Field-level input rules
//! - [`eligibility`] - Refund eligibility validator
//! - [`status`] - Order status state machine and coupon restoration rule
//! - [`ledger`] - Refund ledger composition
//!
//! ## Example Usage
//!
//! ```rust
//! use mall_core::money::Money;
//!
//! let paid_price = Money::from_cents(1000);
//! let refund_amount = paid_price.multiply_quantity(2);
//! assert_eq!(refund_amount, Some(Money::from_cents(2000)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod eligibility;
pub mod error;
pub mod ledger;
pub mod money;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use eligibility::{check_eligibility, RefundRequest};
pub use error::{RefundError, RefundResult, ValidationError};
pub use ledger::{LedgerDivergence, RefundLedger};
pub use money::Money;
pub use status::{coupon_to_restore, derive_status};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of the free-text refund reason.
pub const MAX_REASON_LEN: usize = 500;

/// Product name recorded on a refund when the catalog cannot supply one.
pub const PLACEHOLDER_PRODUCT_NAME: &str = "Unknown product";

//! # mall-refund-service: Refund Orchestration
//!
//! Wires the pure rules of `mall-core` to the SQLite storage of `mall-db`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Refund Service                                   │
//! │                                                                         │
//! │   Caller ──► RefundApi ──┬──► RefundProcessor ──► one write transaction │
//! │                          │        │                 (claim, insert,     │
//! │                          │        └─► CouponRestoration  bump, status)  │
//! │                          ├──► RefundLedgerQuery ──► one read snapshot   │
//! │                          └──► OrderQueries                              │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                          CatalogLookup (names, timeout, placeholder)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`processor`] - Atomic refund creation
//! - [`coupon`] - Coupon restoration on full cancellation
//! - [`ledger`] - Refund ledger query
//! - [`orders`] - Order list and detail
//! - [`catalog`] - Product catalog seam
//! - [`api`] - Request/response envelopes
//! - [`error`] - `ApiError` and status mapping
//! - [`config`] - Environment configuration
//! - [`cli`] - `mall-refund` argument parsing
//! - [`telemetry`] - Tracing setup

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod coupon;
pub mod error;
pub mod ledger;
pub mod orders;
pub mod processor;
pub mod telemetry;

pub use api::{ApiReply, RefundApi, RefundRequestBody};
pub use catalog::{CatalogEntry, CatalogLookup, ProductCatalog};
pub use config::ServiceConfig;
pub use coupon::{CouponRestoration, RestoreOutcome};
pub use error::{ApiError, CatalogError, ConfigError, ErrorCode};
pub use ledger::RefundLedgerQuery;
pub use orders::{Caller, OrderLineView, OrderQueries, OrderView};
pub use processor::{RefundOutcome, RefundProcessor};

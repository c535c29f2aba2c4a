//! # Domain Types
//!
//! Core domain types used throughout Mall Refunds.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │     Refund      │   │     Coupon      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (UUID)      │   │  code (unique)  │       │
//! │  │  user_id        │◄──│  order_id       │   │  discount_cents │       │
//! │  │  items[]        │   │  product_id     │   │  user_id?       │       │
//! │  │  status         │   │  amount_cents   │   │  status         │       │
//! │  │  coupon_code? ──┼───┼─────────────────┼──►│                 │       │
//! │  └────────┬────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │                                                             │
//! │  ┌────────▼────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   OrderItem     │   │  OrderStatus    │   │  RefundStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  PaymentCompl.  │   │  Pending        │       │
//! │  │  quantity       │   │  Shipped        │   │  Approved       │       │
//! │  │  paid_price     │   │  Delivered      │   │  Rejected       │       │
//! │  │  refunded_qty   │   │  PartiallyRef.  │   └─────────────────┘       │
//! │  └─────────────────┘   │  Cancelled      │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `OrderItem::paid_price_cents` and `Refund::product_name` are frozen at the
//! moment they are written. Later catalog edits never reach them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{RefundError, RefundResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an order.
///
/// The wire names match what the order history page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
pub enum OrderStatus {
    /// Paid, waiting for fulfilment.
    #[serde(rename = "Payment Completed")]
    PaymentCompleted,
    /// Handed to the carrier.
    #[serde(rename = "Shipped")]
    Shipped,
    /// Received by the customer.
    #[serde(rename = "Delivered")]
    Delivered,
    /// At least one unit refunded, at least one line still open.
    #[serde(rename = "Partially Refunded")]
    PartiallyRefunded,
    /// Every line fully refunded. Terminal.
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Whether no further refund activity can change this status.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::PaymentCompleted
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// One product line of an order; the unit of refund granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    pub product_id: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price the customer paid, in cents (frozen at checkout).
    #[serde(rename = "paidPrice")]
    pub paid_price_cents: i64,
    /// Units already refunded. Only the refund processor moves this.
    pub refunded_quantity: i64,
}

impl OrderItem {
    /// Returns the paid unit price as Money.
    #[inline]
    pub fn paid_price(&self) -> Money {
        Money::from_cents(self.paid_price_cents)
    }

    /// Returns `paid_price × quantity` for the whole line, `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.paid_price().multiply_quantity(self.quantity)
    }

    /// Amount owed back for refunding `quantity` units of this line.
    #[inline]
    pub fn refund_amount(&self, quantity: i64) -> Option<Money> {
        self.paid_price().multiply_quantity(quantity)
    }

    /// `quantity − refunded_quantity`, never negative.
    pub fn remaining_refundable(&self) -> i64 {
        (self.quantity - self.refunded_quantity).max(0)
    }

    /// True once every ordered unit has been refunded.
    pub fn is_fully_refunded(&self) -> bool {
        self.refunded_quantity >= self.quantity
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order as created by checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Lines in checkout order.
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// Coupon consumed at checkout, if any.
    pub coupon_code: Option<String>,
    /// Discount granted by the coupon, in cents.
    #[serde(rename = "discount")]
    pub discount_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Finds the line for a product.
    pub fn item(&self, product_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Whether `user_id` placed this order.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Σ `paid_price × quantity` over all lines, `None` on overflow.
    pub fn total_paid(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(), |total, item| total.checked_add(item.line_total()?))
    }

    /// Returns the coupon discount as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }
}

// =============================================================================
// Refund Status
// =============================================================================

/// Review status of a refund.
///
/// The refund processor only ever writes `Pending`; the other two belong to
/// an external approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RefundStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for RefundStatus {
    fn default() -> Self {
        RefundStatus::Pending
    }
}

/// Outcome an approval workflow records against a pending refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundDecision {
    Approve,
    Reject,
}

impl RefundDecision {
    /// Status the refund moves to.
    pub const fn status(&self) -> RefundStatus {
        match self {
            RefundDecision::Approve => RefundStatus::Approved,
            RefundDecision::Reject => RefundStatus::Rejected,
        }
    }
}

// =============================================================================
// Refund
// =============================================================================

/// One entry of the refund ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Refund {
    pub id: String,
    pub order_id: String,
    pub user_id: String,
    pub product_id: String,
    /// Product name at refund time (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// `paid_price × quantity` at creation, in cents. Never recomputed.
    #[serde(rename = "amount")]
    pub amount_cents: i64,
    pub reason: String,
    pub status: RefundStatus,
    pub admin_note: Option<String>,
    #[ts(as = "Option<String>")]
    pub processed_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Refund {
    /// Builds a pending refund for `quantity` units of `item`.
    ///
    /// The amount is taken from the line's frozen paid price, so the catalog
    /// price at refund time has no say in it.
    ///
    /// ## Returns
    /// * `Err(RefundError::InvalidInput)` - `paid_price × quantity` overflows
    #[allow(clippy::too_many_arguments)]
    pub fn pending(
        id: String,
        order: &Order,
        item: &OrderItem,
        user_id: &str,
        product_name: String,
        quantity: i64,
        reason: &str,
        created_at: DateTime<Utc>,
    ) -> RefundResult<Self> {
        let amount = item
            .refund_amount(quantity)
            .ok_or_else(|| ValidationError::Overflow {
                field: "amount".to_string(),
            })?;

        Ok(Refund {
            id,
            order_id: order.id.clone(),
            user_id: user_id.to_string(),
            product_id: item.product_id.clone(),
            product_name,
            quantity,
            amount_cents: amount.cents(),
            reason: reason.trim().to_string(),
            status: RefundStatus::Pending,
            admin_note: None,
            processed_at: None,
            created_at,
        })
    }

    /// Returns the refund amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// Whether a coupon can still be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CouponStatus {
    Active,
    Used,
}

/// A discount coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Coupon {
    pub code: String,
    #[serde(rename = "discount")]
    pub discount_cents: i64,
    /// Holder of the coupon; `None` once released back to the pool.
    pub user_id: Option<String>,
    pub status: CouponStatus,
    #[ts(as = "Option<String>")]
    pub used_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// Catalog entry. Only names are borrowed from here; prices on orders are frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Current list price in cents.
    #[serde(rename = "price")]
    pub price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the list price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

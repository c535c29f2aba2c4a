//! # Order Queries
//!
//! Order history for customers and admins, with each line enriched from the
//! catalog and annotated with how much of it can still be refunded.
//!
//! ## Visibility
//! | Caller   | `list_orders`  | `order_detail`          |
//! |----------|----------------|-------------------------|
//! | customer | own orders     | own orders, else 403    |
//! | admin    | every order    | any order               |

use chrono::{DateTime, Utc};
use mall_core::{Money, Order, OrderItem, OrderStatus, RefundError, RefundResult};
use mall_db::Database;
use serde::Serialize;
use tracing::{debug, instrument};
use ts_rs::TS;

use crate::catalog::CatalogLookup;

/// Authenticated identity, as resolved by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub is_admin: bool,
}

impl Caller {
    pub fn customer(user_id: impl Into<String>) -> Self {
        Caller {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Caller {
            user_id: user_id.into(),
            is_admin: true,
        }
    }

    fn can_see(&self, order: &Order) -> bool {
        self.is_admin || order.is_owned_by(&self.user_id)
    }
}

/// One order line as shown in order history.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineView {
    pub product_id: String,
    /// Current catalog name, or the placeholder.
    pub name: String,
    /// Current catalog price; 0 when the catalog has no entry.
    pub price: Money,
    /// What the customer actually paid per unit.
    pub paid_price: Money,
    pub quantity: i64,
    pub refunded_quantity: i64,
    pub remaining_refundable: i64,
}

/// An order as shown in order history.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderView {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderLineView>,
    pub status: OrderStatus,
    pub coupon_code: Option<String>,
    pub discount: Money,
    pub total_paid: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Read side of orders.
#[derive(Debug, Clone)]
pub struct OrderQueries {
    db: Database,
    catalog: CatalogLookup,
}

impl OrderQueries {
    pub fn new(db: Database, catalog: CatalogLookup) -> Self {
        OrderQueries { db, catalog }
    }

    /// Orders visible to `caller`, newest first.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id, is_admin = caller.is_admin))]
    pub async fn list_orders(&self, caller: &Caller) -> RefundResult<Vec<OrderView>> {
        let orders = if caller.is_admin {
            self.db.orders().list_all().await?
        } else {
            self.db.orders().list_for_user(&caller.user_id).await?
        };

        debug!(count = orders.len(), "Orders loaded");

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.view(order).await?);
        }
        Ok(views)
    }

    /// One order, if `caller` may see it.
    ///
    /// ## Returns
    /// * `Err(RefundError::NotFound)` - No such order
    /// * `Err(RefundError::Forbidden)` - Caller neither owns it nor is an admin
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id, is_admin = caller.is_admin))]
    pub async fn order_detail(&self, caller: &Caller, order_id: &str) -> RefundResult<OrderView> {
        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| RefundError::not_found("Order", order_id))?;

        if !caller.can_see(&order) {
            return Err(RefundError::Forbidden { order_id: order.id });
        }

        self.view(order).await
    }

    async fn view(&self, order: Order) -> RefundResult<OrderView> {
        let total_paid = order.total_paid().ok_or_else(|| {
            RefundError::Unexpected(format!("amount of order {} overflows", order.id))
        })?;
        let discount = order.discount();

        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            items.push(self.line(item).await);
        }

        Ok(OrderView {
            id: order.id,
            user_id: order.user_id,
            items,
            status: order.status,
            coupon_code: order.coupon_code,
            discount,
            total_paid,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }

    async fn line(&self, item: &OrderItem) -> OrderLineView {
        let entry = self.catalog.entry_or_placeholder(&item.product_id).await;

        OrderLineView {
            product_id: item.product_id.clone(),
            name: entry.name,
            price: Money::from_cents(entry.price_cents),
            paid_price: item.paid_price(),
            quantity: item.quantity,
            refunded_quantity: item.refunded_quantity,
            remaining_refundable: item.remaining_refundable(),
        }
    }
}

//! # Request/Response Contract
//!
//! Transport-neutral handlers: each takes an authenticated [`Caller`] plus
//! request data and answers with a status code and a JSON envelope. Any HTTP
//! or CLI front end only has to ship [`ApiReply`] out.
//!
//! ## Envelopes
//! ```text
//! success  { "success": true,  ...payload }
//! failure  { "success": false, "code": "QUANTITY_EXCEEDED", "message": "..." }
//! ```

use mall_core::{OrderStatus, Refund, RefundLedger, RefundRequest};
use mall_db::Database;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;
use ts_rs::TS;

use crate::catalog::CatalogLookup;
use crate::error::{ApiError, ErrorCode};
use crate::ledger::RefundLedgerQuery;
use crate::orders::{Caller, OrderQueries, OrderView};
use crate::processor::{RefundOutcome, RefundProcessor};

// =============================================================================
// Request Bodies
// =============================================================================

/// Body of a refund creation request.
///
/// Every field is optional on the wire; absent fields are rejected by the
/// eligibility checks with `INVALID_INPUT`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RefundRequestBody {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
    pub reason: Option<String>,
}

impl RefundRequestBody {
    /// Binds the body to an order and the authenticated caller.
    pub fn into_request(self, order_id: &str, user_id: &str) -> RefundRequest {
        RefundRequest {
            order_id: order_id.to_string(),
            user_id: user_id.to_string(),
            product_id: self.product_id.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            reason: self.reason.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Response Envelopes
// =============================================================================

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RefundCreatedResponse {
    pub success: bool,
    pub refund: Refund,
    pub message: String,
    pub order_status: OrderStatus,
}

impl From<RefundOutcome> for RefundCreatedResponse {
    fn from(outcome: RefundOutcome) -> Self {
        RefundCreatedResponse {
            success: true,
            refund: outcome.refund,
            message: outcome.message,
            order_status: outcome.order_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RefundListResponse {
    pub success: bool,
    #[serde(flatten)]
    pub ledger: RefundLedger,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct OrderListResponse {
    pub success: bool,
    pub orders: Vec<OrderView>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct OrderDetailResponse {
    pub success: bool,
    pub order: OrderView,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct FailureResponse {
    pub success: bool,
    pub code: ErrorCode,
    pub message: String,
}

impl From<ApiError> for FailureResponse {
    fn from(err: ApiError) -> Self {
        FailureResponse {
            success: false,
            code: err.code,
            message: err.message,
        }
    }
}

/// Status code plus JSON body, ready for any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => ApiReply { status: 200, body },
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                ApiReply::failure(ApiError::internal())
            }
        }
    }

    fn failure(err: ApiError) -> Self {
        let status = err.status_code();
        let failure = FailureResponse::from(err);
        let body = json!({
            "success": false,
            "code": failure.code,
            "message": failure.message,
        });
        ApiReply { status, body }
    }

    /// `success: true` in the body.
    pub fn is_success(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool) == Some(true)
    }

    /// Error code of a failure reply.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }
}

fn reply<T, E>(result: Result<T, E>) -> ApiReply
where
    T: Serialize,
    ApiError: From<E>,
{
    match result {
        Ok(payload) => ApiReply::ok(&payload),
        Err(err) => ApiReply::failure(ApiError::from(err)),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Refund and order operations behind one handle.
#[derive(Debug, Clone)]
pub struct RefundApi {
    processor: RefundProcessor,
    ledger: RefundLedgerQuery,
    orders: OrderQueries,
}

impl RefundApi {
    pub fn new(db: Database, catalog: CatalogLookup) -> Self {
        RefundApi {
            processor: RefundProcessor::new(db.clone(), catalog.clone()),
            ledger: RefundLedgerQuery::new(db.clone()),
            orders: OrderQueries::new(db, catalog),
        }
    }

    /// Requests a refund against one of the caller's orders.
    pub async fn create_refund(
        &self,
        caller: &Caller,
        order_id: &str,
        body: RefundRequestBody,
    ) -> ApiReply {
        let request = body.into_request(order_id, &caller.user_id);
        let result = self
            .processor
            .request_refund(request)
            .await
            .map(RefundCreatedResponse::from);
        reply(result)
    }

    /// Refund ledger of one of the caller's orders.
    pub async fn list_refunds(&self, caller: &Caller, order_id: &str) -> ApiReply {
        let result = self
            .ledger
            .refunds_for_order(&caller.user_id, order_id)
            .await
            .map(|ledger| RefundListResponse {
                success: true,
                ledger,
            });
        reply(result)
    }

    /// Orders visible to the caller.
    pub async fn list_orders(&self, caller: &Caller) -> ApiReply {
        let result = self
            .orders
            .list_orders(caller)
            .await
            .map(|orders| OrderListResponse {
                success: true,
                orders,
            });
        reply(result)
    }

    /// One order visible to the caller.
    pub async fn order_detail(&self, caller: &Caller, order_id: &str) -> ApiReply {
        let result = self
            .orders
            .order_detail(caller, order_id)
            .await
            .map(|order| OrderDetailResponse {
                success: true,
                order,
            });
        reply(result)
    }
}

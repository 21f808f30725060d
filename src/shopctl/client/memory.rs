//! Scripted in-memory clients for tests.
//!
//! Each operation answers with whatever was scripted for it and records the
//! call, so tests can assert both on results and on which endpoints were hit.

use super::{AdminApi, AdminProvider, OpenApi};
use crate::error::{ApiError, Result, ShopError};
use crate::model::{
    AdminRefundRequest, Order, Refund, RefundCreateRequest, RefundsListOptions,
    RefundsListResponse,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A scripted failure. `Other` stands for any non-API error (transport, IO).
#[derive(Debug, Clone)]
pub enum Failure {
    Api(ApiError),
    Other(String),
}

impl Failure {
    pub fn not_found() -> Self {
        Failure::Api(ApiError::new(404, "HTTP_404", "Not Found"))
    }

    fn to_error(&self) -> ShopError {
        match self {
            Failure::Api(err) => ShopError::Api(err.clone()),
            Failure::Other(msg) => ShopError::Io(std::io::Error::other(msg.clone())),
        }
    }
}

#[derive(Debug, Clone)]
enum Script<T> {
    Unset,
    Respond(T),
    Fail(Failure),
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Script::Unset
    }
}

impl<T: Clone> Script<T> {
    fn answer(&self, operation: &str) -> Result<T> {
        match self {
            Script::Unset => Err(ShopError::Api(ApiError::new(
                501,
                "NOT_SCRIPTED",
                format!("{} was not scripted", operation),
            ))),
            Script::Respond(value) => Ok(value.clone()),
            Script::Fail(failure) => Err(failure.to_error()),
        }
    }
}

#[derive(Default)]
pub struct MemoryOpenApi {
    list_refunds: Script<RefundsListResponse>,
    get_refund: Script<Refund>,
    create_refund: Script<Refund>,
    list_order_refunds: Script<RefundsListResponse>,
    order: Script<Order>,
    action_logs: Script<String>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<RefundCreateRequest>>,
}

impl MemoryOpenApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refunds(mut self, resp: RefundsListResponse) -> Self {
        self.list_refunds = Script::Respond(resp);
        self
    }

    pub fn with_refund(mut self, refund: Refund) -> Self {
        self.get_refund = Script::Respond(refund);
        self
    }

    pub fn with_created_refund(mut self, refund: Refund) -> Self {
        self.create_refund = Script::Respond(refund);
        self
    }

    pub fn with_order_refunds(mut self, resp: RefundsListResponse) -> Self {
        self.list_order_refunds = Script::Respond(resp);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Script::Respond(order);
        self
    }

    pub fn with_action_logs(mut self, raw: impl Into<String>) -> Self {
        self.action_logs = Script::Respond(raw.into());
        self
    }

    pub fn failing_list_refunds(mut self, failure: Failure) -> Self {
        self.list_refunds = Script::Fail(failure);
        self
    }

    pub fn failing_get_refund(mut self, failure: Failure) -> Self {
        self.get_refund = Script::Fail(failure);
        self
    }

    pub fn failing_create_refund(mut self, failure: Failure) -> Self {
        self.create_refund = Script::Fail(failure);
        self
    }

    pub fn failing_order_refunds(mut self, failure: Failure) -> Self {
        self.list_order_refunds = Script::Fail(failure);
        self
    }

    pub fn failing_order(mut self, failure: Failure) -> Self {
        self.order = Script::Fail(failure);
        self
    }

    pub fn failing_action_logs(mut self, failure: Failure) -> Self {
        self.action_logs = Script::Fail(failure);
        self
    }

    /// Number of recorded calls to `operation` (e.g. `"get_order_action_logs"`).
    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|c| c.as_str() == operation)
            .count()
    }

    pub fn created_requests(&self) -> Vec<RefundCreateRequest> {
        self.created.lock().expect("created lock").clone()
    }

    fn record(&self, operation: &str) {
        self.calls
            .lock()
            .expect("calls lock")
            .push(operation.to_string());
    }
}

#[async_trait]
impl OpenApi for MemoryOpenApi {
    async fn list_refunds(&self, _opts: &RefundsListOptions) -> Result<RefundsListResponse> {
        self.record("list_refunds");
        self.list_refunds.answer("list_refunds")
    }

    async fn get_refund(&self, _id: &str) -> Result<Refund> {
        self.record("get_refund");
        self.get_refund.answer("get_refund")
    }

    async fn create_refund(&self, req: &RefundCreateRequest) -> Result<Refund> {
        self.record("create_refund");
        self.created.lock().expect("created lock").push(req.clone());
        self.create_refund.answer("create_refund")
    }

    async fn list_order_refunds(&self, _order_id: &str) -> Result<RefundsListResponse> {
        self.record("list_order_refunds");
        self.list_order_refunds.answer("list_order_refunds")
    }

    async fn get_order(&self, _order_id: &str) -> Result<Order> {
        self.record("get_order");
        self.order.answer("get_order")
    }

    async fn get_order_action_logs(&self, _order_id: &str) -> Result<String> {
        self.record("get_order_action_logs");
        self.action_logs.answer("get_order_action_logs")
    }
}

/// Admin client that records every refund request it receives.
#[derive(Default)]
pub struct RecordingAdmin {
    response: Script<Value>,
    requests: Mutex<Vec<(String, AdminRefundRequest)>>,
}

impl RecordingAdmin {
    pub fn responding(value: Value) -> Self {
        Self {
            response: Script::Respond(value),
            ..Default::default()
        }
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            response: Script::Fail(failure),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<(String, AdminRefundRequest)> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn last_request(&self) -> Option<(String, AdminRefundRequest)> {
        self.requests().pop()
    }
}

#[async_trait]
impl AdminApi for RecordingAdmin {
    async fn admin_refund_order(&self, order_id: &str, req: &AdminRefundRequest) -> Result<Value> {
        self.requests
            .lock()
            .expect("requests lock")
            .push((order_id.to_string(), req.clone()));
        self.response.answer("admin_refund_order")
    }
}

/// Hands out one shared admin client, or refuses as if unconfigured.
pub struct StaticAdminProvider {
    admin: Option<Arc<RecordingAdmin>>,
    unavailable: String,
}

impl StaticAdminProvider {
    pub fn new(admin: Arc<RecordingAdmin>) -> Self {
        Self {
            admin: Some(admin),
            unavailable: String::new(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            admin: None,
            unavailable: message.into(),
        }
    }
}

impl AdminProvider for StaticAdminProvider {
    fn admin_client(&self) -> Result<Arc<dyn AdminApi>> {
        match &self.admin {
            Some(admin) => Ok(admin.clone()),
            None => Err(ShopError::AdminUnavailable(self.unavailable.clone())),
        }
    }
}

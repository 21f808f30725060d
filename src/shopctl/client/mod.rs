//! # Client Layer
//!
//! The remote platform is reached through two traits:
//!
//! - [`OpenApi`]: the documented, token-scoped REST endpoints. Every operation
//!   the CLI offers goes through it first.
//! - [`AdminApi`]: the lower-level admin endpoint set, used only when the
//!   Open API refund endpoints are unavailable for a store.
//!
//! Admin clients are not built up front. Commands ask an [`AdminProvider`]
//! for one at the moment the fallback path is taken, so a store without admin
//! configuration only fails when the fallback is actually needed, and it fails
//! before any admin network call is made.
//!
//! ## Implementations
//!
//! - [`http::HttpClient`] / [`admin::AdminClient`]: production `reqwest` clients.
//! - [`admin::ConfigAdminProvider`]: builds an `AdminClient` from [`crate::config::ShopConfig`].
//! - `memory`: scripted in-memory clients that record every call, for tests.

use crate::error::Result;
use crate::model::{
    AdminRefundRequest, Order, Refund, RefundCreateRequest, RefundsListOptions,
    RefundsListResponse,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub mod admin;
pub mod http;
#[cfg(any(test, feature = "test_utils"))]
pub mod memory;

/// The platform's primary, documented REST API.
#[async_trait]
pub trait OpenApi: Send + Sync {
    async fn list_refunds(&self, opts: &RefundsListOptions) -> Result<RefundsListResponse>;

    async fn get_refund(&self, id: &str) -> Result<Refund>;

    async fn create_refund(&self, req: &RefundCreateRequest) -> Result<Refund>;

    async fn list_order_refunds(&self, order_id: &str) -> Result<RefundsListResponse>;

    async fn get_order(&self, order_id: &str) -> Result<Order>;

    /// Raw action-log feed for an order, unparsed; the shape varies by store.
    async fn get_order_action_logs(&self, order_id: &str) -> Result<String>;
}

/// The admin endpoint set used as a refund fallback.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn admin_refund_order(&self, order_id: &str, req: &AdminRefundRequest) -> Result<Value>;
}

/// Builds an admin client on demand.
pub trait AdminProvider: Send + Sync {
    fn admin_client(&self) -> Result<Arc<dyn AdminApi>>;
}

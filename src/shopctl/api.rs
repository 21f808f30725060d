//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all shopctl operations, regardless of the UI in front of it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (raw body text and flags into a refund request)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic, no I/O to the terminal, and no formatting.
//!
//! ## Generic Over Clients
//!
//! `ShopApi<C: OpenApi, P: AdminProvider>` is generic over both remote seams:
//! - Production: `ShopApi<HttpClient, ConfigAdminProvider>`
//! - Testing: `ShopApi<MemoryOpenApi, StaticAdminProvider>`

use crate::client::{AdminProvider, OpenApi};
use crate::commands;
use crate::error::Result;
use crate::model::RefundsListOptions;
use std::path::Path;

/// The main API facade for shopctl operations.
pub struct ShopApi<C: OpenApi, P: AdminProvider> {
    open: C,
    admin: P,
}

impl<C: OpenApi, P: AdminProvider> ShopApi<C, P> {
    pub fn new(open: C, admin: P) -> Self {
        Self { open, admin }
    }

    pub async fn list_refunds(&self, opts: RefundsListOptions) -> Result<commands::CmdResult> {
        commands::list::run(&self.open, opts).await
    }

    pub async fn get_refund(&self, refund_id: &str) -> Result<commands::CmdResult> {
        commands::get::run(&self.open, refund_id).await
    }

    /// Builds the request from `body` and `flags`, then creates the refund.
    /// Validation failures happen before any network call.
    pub async fn create_refund(
        &self,
        body: Option<&str>,
        flags: &RefundFlags,
        overrides: &AdminOverrides,
    ) -> Result<commands::CmdResult> {
        let req = commands::request::build(body, flags)?;
        commands::create::run(&self.open, &self.admin, req, overrides).await
    }

    pub async fn list_order_refunds(&self, order_id: &str) -> Result<commands::CmdResult> {
        commands::order_refunds::run(&self.open, order_id).await
    }
}

/// Reads or updates the configuration in `config_dir`. Needs no credentials,
/// so it is available before a [`ShopApi`] can be built.
pub fn config(config_dir: &Path, action: ConfigAction) -> Result<commands::CmdResult> {
    commands::config::run(config_dir, action)
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::fallback::AdminOverrides;
pub use crate::commands::request::RefundFlags;
pub use commands::{CmdMessage, CmdResult, MessageLevel};

use crate::config::ShopConfig;
use crate::model::{AdminFallbackRefund, InferredRefunds, Refund, RefundsListResponse};

pub mod action_logs;
pub mod config;
pub mod create;
pub mod fallback;
pub mod get;
pub mod helpers;
pub mod list;
pub mod money;
pub mod order_refunds;
pub mod request;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Everything a command produced. Front ends decide how to present it.
#[derive(Debug, Default)]
pub struct CmdResult {
    /// A single refund, either fetched or created through the Open API.
    pub refund: Option<Refund>,
    pub refunds: Option<RefundsListResponse>,
    pub fallback_refund: Option<AdminFallbackRefund>,
    pub inferred: Option<InferredRefunds>,
    pub config: Option<ShopConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_refund(mut self, refund: Refund) -> Self {
        self.refund = Some(refund);
        self
    }

    pub fn with_refunds(mut self, refunds: RefundsListResponse) -> Self {
        self.refunds = Some(refunds);
        self
    }

    pub fn with_fallback_refund(mut self, refund: AdminFallbackRefund) -> Self {
        self.fallback_refund = Some(refund);
        self
    }

    pub fn with_inferred(mut self, inferred: InferredRefunds) -> Self {
        self.inferred = Some(inferred);
        self
    }

    pub fn with_config(mut self, config: ShopConfig) -> Self {
        self.config = Some(config);
        self
    }
}

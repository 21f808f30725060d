use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Structured error returned by the Open API for any response with status >= 400.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(skip)]
    pub status: u16,
}

impl ApiError {
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {}", self.status)?;
        if !self.code.is_empty() {
            write!(f, " ({})", self.code)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Error returned by the Admin API for any response with status >= 400.
///
/// `hint` is set for backend failure modes the operator has to fix outside
/// this tool (expired sessions and the like).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminApiError {
    pub status: u16,
    pub body: String,
    pub hint: Option<&'static str>,
}

impl fmt::Display for AdminApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "admin API error {}: {}", self.status, self.body)?;
        if let Some(hint) = self.hint {
            write!(f, " ({})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for AdminApiError {}

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Api(ApiError),

    #[error("{0}")]
    AdminUnavailable(String),

    #[error("{0}")]
    AdminApi(AdminApiError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse order action logs for admin fallback: {0}")]
    LogParse(#[source] serde_json::Error),

    #[error("{0}")]
    Conversion(String),

    #[error("failed to load order {order_id} for admin fallback: {source}")]
    OrderLoad {
        order_id: String,
        #[source]
        source: Box<ShopError>,
    },

    #[error("failed to auto-detect admin refund fields from action logs: {0}")]
    ActionLogFetch(#[source] Box<ShopError>),

    #[error("{0}")]
    MissingAdminField(String),

    #[error("failed to create refund: {primary}{}", fallback_suffix("admin fallback", .fallback))]
    CreateRefund {
        primary: Box<ShopError>,
        fallback: Option<Box<ShopError>>,
    },

    #[error("failed to list order refunds: {primary}{}", fallback_suffix("action-log fallback", .fallback))]
    ListOrderRefunds {
        primary: Box<ShopError>,
        fallback: Option<Box<ShopError>>,
    },

    #[error("failed to list refunds: {0}")]
    ListRefunds(#[source] Box<ShopError>),

    #[error("failed to get refund: {0}")]
    GetRefund(#[source] Box<ShopError>),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("operation cancelled")]
    Cancelled,
}

fn fallback_suffix(label: &str, fallback: &Option<Box<ShopError>>) -> String {
    match fallback {
        Some(err) => format!("; {} failed: {}", label, err),
        None => String::new(),
    }
}

impl ShopError {
    pub fn validation(message: impl Into<String>) -> Self {
        ShopError::Validation(message.into())
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        ShopError::Conversion(message.into())
    }
}

impl From<ApiError> for ShopError {
    fn from(err: ApiError) -> Self {
        ShopError::Api(err)
    }
}

impl From<AdminApiError> for ShopError {
    fn from(err: AdminApiError) -> Self {
        ShopError::AdminApi(err)
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_refund_error_without_fallback_shows_primary_only() {
        let err = ShopError::CreateRefund {
            primary: Box::new(ApiError::new(500, "HTTP_500", "Server Error").into()),
            fallback: None,
        };
        assert_eq!(
            err.to_string(),
            "failed to create refund: API error 500 (HTTP_500): Server Error"
        );
    }

    #[test]
    fn create_refund_error_chains_both_causes() {
        let err = ShopError::CreateRefund {
            primary: Box::new(ApiError::new(404, "HTTP_404", "Not Found").into()),
            fallback: Some(Box::new(ShopError::AdminUnavailable(
                "admin API base URL required".into(),
            ))),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to create refund: API error 404"));
        assert!(msg.ends_with("; admin fallback failed: admin API base URL required"));
    }

    #[test]
    fn list_order_refunds_error_names_action_log_fallback() {
        let err = ShopError::ListOrderRefunds {
            primary: Box::new(ApiError::new(404, "HTTP_404", "").into()),
            fallback: Some(Box::new(ShopError::validation("boom"))),
        };
        assert_eq!(
            err.to_string(),
            "failed to list order refunds: API error 404 (HTTP_404); action-log fallback failed: boom"
        );
    }

    #[test]
    fn admin_error_appends_hint() {
        let err = AdminApiError {
            status: 401,
            body: "login expired".into(),
            hint: Some("session expired; refresh the login session and retry"),
        };
        assert_eq!(
            err.to_string(),
            "admin API error 401: login expired (session expired; refresh the login session and retry)"
        );
    }
}

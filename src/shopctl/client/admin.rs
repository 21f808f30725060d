use super::http::{join_segments, parse_base_url, HTTP_TIMEOUT};
use super::{AdminApi, AdminProvider};
use crate::config::ShopConfig;
use crate::error::{AdminApiError, Result, ShopError};
use crate::model::AdminRefundRequest;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// `reqwest` client for the admin endpoints, proxied per merchant with a bearer token.
pub struct AdminClient {
    base_url: Url,
    token: String,
    merchant_id: String,
    http: reqwest::Client,
}

impl AdminClient {
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        merchant_id: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: token.into(),
            merchant_id: merchant_id.into(),
            http,
        })
    }

    fn merchant_endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut all = vec!["merchants", self.merchant_id.as_str()];
        all.extend_from_slice(segments);
        join_segments(&self.base_url, &all)
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn admin_refund_order(&self, order_id: &str, req: &AdminRefundRequest) -> Result<Value> {
        let url = self.merchant_endpoint(&["orders", order_id, "refund"])?;
        tracing::debug!(%url, amount = req.amount, "admin POST");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_client_error() || status.is_server_error() {
            return Err(admin_api_error(status, &body).into());
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[derive(Deserialize)]
struct AdminErrorBody {
    #[serde(default)]
    error: String,
}

pub(crate) fn admin_api_error(status: StatusCode, body: &[u8]) -> AdminApiError {
    let text = String::from_utf8_lossy(body).trim().to_string();
    let message = match serde_json::from_slice::<AdminErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => parsed.error.trim().to_string(),
        _ => text,
    };

    let hint = if message.contains("登入已超時") || message.to_lowercase().contains("login expired")
    {
        Some("session expired; refresh the login session and retry")
    } else if message.contains("Failed to extract CSRF token") {
        Some("could not fetch dashboard CSRF; verify the session is valid for this user/account and retry")
    } else if message.eq_ignore_ascii_case("Request failed") {
        Some("upstream request failed; verify payload IDs exist for this merchant and session is valid")
    } else {
        None
    };

    AdminApiError {
        status: status.as_u16(),
        body: message,
        hint,
    }
}

/// Builds [`AdminClient`]s from the resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigAdminProvider {
    base_url: Option<String>,
    token: Option<String>,
    merchant_id: Option<String>,
}

impl ConfigAdminProvider {
    pub fn new(config: &ShopConfig) -> Self {
        Self {
            base_url: config.admin_base_url.clone(),
            token: config.admin_token.clone(),
            merchant_id: config.admin_merchant_id.clone(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AdminProvider for ConfigAdminProvider {
    fn admin_client(&self) -> Result<Arc<dyn AdminApi>> {
        let base_url = non_blank(&self.base_url).ok_or_else(|| {
            ShopError::AdminUnavailable(
                "admin API base URL required: set SHOPLINE_ADMIN_BASE_URL env var or `shopctl config admin-base-url <url>`"
                    .to_string(),
            )
        })?;
        let token = non_blank(&self.token).ok_or_else(|| {
            ShopError::AdminUnavailable(
                "admin API token required: set --admin-token or SHOPLINE_ADMIN_TOKEN env var"
                    .to_string(),
            )
        })?;
        let merchant_id = non_blank(&self.merchant_id).ok_or_else(|| {
            ShopError::AdminUnavailable(
                "admin merchant ID required: set --admin-merchant-id or SHOPLINE_ADMIN_MERCHANT_ID env var"
                    .to_string(),
            )
        })?;
        Ok(Arc::new(AdminClient::new(base_url, token, merchant_id)?))
    }
}

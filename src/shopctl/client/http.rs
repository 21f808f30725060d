use super::OpenApi;
use crate::error::{ApiError, Result, ShopError};
use crate::model::{Order, Refund, RefundCreateRequest, RefundsListOptions, RefundsListResponse};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const OPEN_API_BASE_URL: &str = "https://open.shopline.io/v1";

pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_SNIPPET_CHARS: usize = 200;

/// `reqwest` client for the Open API, authenticated with a store-scoped bearer token.
#[derive(Clone)]
pub struct HttpClient {
    base_url: Url,
    token: String,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            base_url,
            token: token.into(),
            http,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        join_segments(&self.base_url, segments)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(api_error(status, &body).into());
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self.send(self.http.get(url)).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl OpenApi for HttpClient {
    async fn list_refunds(&self, opts: &RefundsListOptions) -> Result<RefundsListResponse> {
        let mut url = self.endpoint(&["refunds"])?;
        url.query_pairs_mut()
            .append_pair("page", &opts.page.to_string())
            .append_pair("page_size", &opts.page_size.to_string());
        self.get_json(url).await
    }

    async fn get_refund(&self, id: &str) -> Result<Refund> {
        require_id("refund", id)?;
        self.get_json(self.endpoint(&["refunds", id])?).await
    }

    async fn create_refund(&self, req: &RefundCreateRequest) -> Result<Refund> {
        let url = self.endpoint(&["refunds"])?;
        tracing::debug!(%url, order_id = %req.order_id, "POST");
        let response = self.send(self.http.post(url).json(req)).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn list_order_refunds(&self, order_id: &str) -> Result<RefundsListResponse> {
        require_id("order", order_id)?;
        self.get_json(self.endpoint(&["orders", order_id, "refunds"])?)
            .await
    }

    async fn get_order(&self, order_id: &str) -> Result<Order> {
        require_id("order", order_id)?;
        self.get_json(self.endpoint(&["orders", order_id])?).await
    }

    async fn get_order_action_logs(&self, order_id: &str) -> Result<String> {
        require_id("order", order_id)?;
        let url = self.endpoint(&["orders", order_id, "action_logs"])?;
        tracing::debug!(%url, "GET");
        let response = self.send(self.http.get(url)).await?;
        Ok(response.text().await?)
    }
}

fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ShopError::validation(format!("{} id is required", kind)));
    }
    Ok(())
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ShopError::Config(format!("invalid base URL {:?}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(ShopError::Config(format!("invalid base URL {:?}", raw)));
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ShopError::Config(format!("invalid base URL {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Converts an error response into an [`ApiError`].
///
/// Bodies shaped like `{code, message}` are used as-is; anything else becomes
/// `HTTP_<status>` with the reason phrase and a short, non-HTML body snippet.
pub(crate) fn api_error(status: StatusCode, body: &[u8]) -> ApiError {
    let code = format!("HTTP_{}", status.as_u16());
    let reason = status.canonical_reason().unwrap_or("").to_string();

    if let Ok(mut err) = serde_json::from_slice::<ApiError>(body) {
        err.status = status.as_u16();
        if err.code.trim().is_empty() {
            err.code = code;
        }
        if err.message.trim().is_empty() {
            err.message = reason;
        }
        return err;
    }

    let mut message = reason;
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() && !text.contains("<html") && !text.contains("<HTML") {
        let mut snippet: String = text.chars().take(ERROR_SNIPPET_CHARS).collect();
        if text.chars().count() > ERROR_SNIPPET_CHARS {
            snippet.push_str("...");
        }
        if message.is_empty() {
            message = snippet;
        } else {
            message = format!("{}: {}", message, snippet);
        }
    }
    ApiError::new(status.as_u16(), code, message)
}

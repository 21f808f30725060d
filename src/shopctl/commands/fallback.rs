//! Admin API fallback for refund creation.
//!
//! Some stores do not expose the Open API refund endpoints and answer them
//! with a 404. For those, a refund can still be issued through the Admin API,
//! which wants integer minor units, the id of a performer, and the time the
//! order's payment status last changed. The latter two are taken from the
//! caller when given, otherwise mined from the order's action logs, with the
//! order's own `updated_at` as a last resort for the payment time.

use super::action_logs;
use super::helpers::non_blank;
use super::money::to_minor_units;
use crate::client::{AdminProvider, OpenApi};
use crate::error::{Result, ShopError};
use crate::model::{AdminFallbackRefund, AdminRefundRequest, FallbackMetadata, RefundCreateRequest};
use chrono::{DateTime, Datelike, SecondsFormat, Timelike, Utc};

/// True only for a structured Open API error reporting a 404.
///
/// Errors that merely mention "404" in their text do not count.
pub fn is_not_found(err: &ShopError) -> bool {
    match err {
        ShopError::Api(api) => api.status == 404 || api.code.eq_ignore_ascii_case("HTTP_404"),
        _ => false,
    }
}

/// Values the caller supplied instead of letting them be mined from logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminOverrides {
    pub performer_id: Option<String>,
    pub payment_updated_at: Option<String>,
}

/// Submits `req` through the Admin API.
///
/// Issues at most one order lookup, one action-log fetch, and one Admin call.
pub async fn create_via_admin_fallback<C, P>(
    open: &C,
    provider: &P,
    req: &RefundCreateRequest,
    overrides: &AdminOverrides,
) -> Result<AdminFallbackRefund>
where
    C: OpenApi + ?Sized,
    P: AdminProvider + ?Sized,
{
    let admin = provider.admin_client()?;
    let order_id = req.order_id.trim();

    let order = open
        .get_order(order_id)
        .await
        .map_err(|e| ShopError::OrderLoad {
            order_id: order_id.to_string(),
            source: Box::new(e),
        })?;

    let currency = order.currency.trim().to_string();
    let amount_minor = to_minor_units(&req.amount, &currency)?;
    tracing::debug!(%currency, amount_minor, "converted refund amount");

    let mut performer_id = non_blank(overrides.performer_id.as_deref()).map(str::to_string);
    let mut payment_updated_at =
        non_blank(overrides.payment_updated_at.as_deref()).map(str::to_string);

    if performer_id.is_none() || payment_updated_at.is_none() {
        let raw = open
            .get_order_action_logs(order_id)
            .await
            .map_err(|e| ShopError::ActionLogFetch(Box::new(e)))?;
        let logs = action_logs::parse(&raw)?;

        if performer_id.is_none() {
            performer_id = action_logs::detect_performer_id(&logs);
            tracing::debug!(performer_id = ?performer_id, "performer from action logs");
        }
        if payment_updated_at.is_none() {
            payment_updated_at = action_logs::detect_payment_updated_at(&logs);
            tracing::debug!(payment_updated_at = ?payment_updated_at, "payment time from action logs");
        }
    }

    if payment_updated_at.is_none() {
        if let Some(updated_at) = order.updated_at.filter(|t| !is_zero_instant(t)) {
            tracing::debug!(%updated_at, "payment time from order updated_at");
            payment_updated_at = Some(rfc3339_nano(updated_at));
        }
    }

    let performer_id = performer_id.ok_or_else(|| {
        ShopError::MissingAdminField(
            "missing performer ID for admin fallback; pass --performer-id or ensure order action logs include performer_id/user_id"
                .to_string(),
        )
    })?;
    let payment_updated_at = payment_updated_at.ok_or_else(|| {
        ShopError::MissingAdminField(
            "missing payment updated timestamp for admin fallback; pass --payment-updated-at or ensure order action logs include updated_payment_status entries"
                .to_string(),
        )
    })?;

    let admin_req = AdminRefundRequest {
        performer_id: performer_id.clone(),
        amount: amount_minor,
        order_payment_updated_at: payment_updated_at.clone(),
        refund_remark: non_blank(Some(req.note.as_str())).map(str::to_string),
    };

    let admin_response = admin.admin_refund_order(order_id, &admin_req).await?;
    tracing::info!(order_id, amount_minor, "refund submitted via admin API");

    Ok(AdminFallbackRefund {
        request: req.clone(),
        admin_response,
        meta: FallbackMetadata {
            performer_id,
            payment_updated_at,
            amount_minor,
            currency,
        },
    })
}

/// `0001-01-01T00:00:00Z`, which some backends send for an unset time.
fn is_zero_instant(t: &DateTime<Utc>) -> bool {
    t.year() == 1 && t.ordinal() == 1 && t.num_seconds_from_midnight() == 0 && t.nanosecond() == 0
}

/// RFC 3339 in UTC with as many fractional digits as needed, none if whole.
fn rfc3339_nano(t: DateTime<Utc>) -> String {
    let full = t.to_rfc3339_opts(SecondsFormat::Nanos, true);
    match full.split_once('.') {
        Some((whole, frac)) => {
            let digits = frac.trim_end_matches('Z').trim_end_matches('0');
            if digits.is_empty() {
                format!("{}Z", whole)
            } else {
                format!("{}.{}Z", whole, digits)
            }
        }
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::{Failure, MemoryOpenApi, RecordingAdmin, StaticAdminProvider};
    use crate::error::ApiError;
    use crate::model::Order;
    use bigdecimal::BigDecimal;
    use serde_json::json;
    use std::str::FromStr;
    use std::sync::Arc;

    const LOGS: &str = r#"{"items":[
        {"key":"created_order","performer_id":"usr_old","created_at":"2026-01-04T10:00:00Z"},
        {"key":"updated_payment_status","perform_data":{"performer_id":"usr_1"},"created_at":"2026-01-04T14:34:29.413Z"}
    ]}"#;

    fn order(currency: &str) -> Order {
        Order {
            id: "ord_1".into(),
            currency: currency.into(),
            ..Default::default()
        }
    }

    fn request(amount: &str) -> RefundCreateRequest {
        RefundCreateRequest {
            order_id: "ord_1".into(),
            amount: BigDecimal::from_str(amount).unwrap(),
            note: "  damaged box ".into(),
            ..Default::default()
        }
    }

    fn admin_ok() -> (Arc<RecordingAdmin>, StaticAdminProvider) {
        let admin = Arc::new(RecordingAdmin::responding(json!({"result": "ok"})));
        let provider = StaticAdminProvider::new(admin.clone());
        (admin, provider)
    }

    #[test]
    fn not_found_requires_structured_error() {
        assert!(is_not_found(&ApiError::new(404, "", "").into()));
        assert!(is_not_found(&ApiError::new(0, "http_404", "").into()));
        assert!(!is_not_found(&ApiError::new(500, "HTTP_500", "404 in text").into()));
        assert!(!is_not_found(&ShopError::validation("upstream said 404")));
        assert!(!is_not_found(&ShopError::Io(std::io::Error::other("404"))));
    }

    #[tokio::test]
    async fn mines_performer_and_payment_time_from_logs() {
        let open = MemoryOpenApi::new()
            .with_order(order("TWD"))
            .with_action_logs(LOGS);
        let (admin, provider) = admin_ok();

        let refund = create_via_admin_fallback(&open, &provider, &request("750"), &Default::default())
            .await
            .unwrap();

        let (order_id, sent) = admin.last_request().unwrap();
        assert_eq!(order_id, "ord_1");
        assert_eq!(sent.amount, 750);
        assert_eq!(sent.performer_id, "usr_1");
        assert_eq!(sent.order_payment_updated_at, "2026-01-04T14:34:29.413Z");
        assert_eq!(sent.refund_remark.as_deref(), Some("damaged box"));

        assert_eq!(refund.meta.amount_minor, 750);
        assert_eq!(refund.meta.currency, "TWD");
        assert_eq!(refund.admin_response, json!({"result": "ok"}));
        assert_eq!(open.calls_to("get_order_action_logs"), 1);
    }

    #[tokio::test]
    async fn explicit_overrides_skip_action_logs() {
        let open = MemoryOpenApi::new().with_order(order("USD"));
        let (admin, provider) = admin_ok();
        let overrides = AdminOverrides {
            performer_id: Some(" usr_cli ".into()),
            payment_updated_at: Some("2026-01-01T00:00:00Z".into()),
        };

        create_via_admin_fallback(&open, &provider, &request("10.50"), &overrides)
            .await
            .unwrap();

        let (_, sent) = admin.last_request().unwrap();
        assert_eq!(sent.performer_id, "usr_cli");
        assert_eq!(sent.amount, 1050);
        assert_eq!(open.calls_to("get_order_action_logs"), 0);
    }

    #[tokio::test]
    async fn order_updated_at_is_last_resort_for_payment_time() {
        let mut o = order("JPY");
        o.updated_at = Some("2026-01-04T14:35:00.120Z".parse().unwrap());
        let open = MemoryOpenApi::new()
            .with_order(o)
            .with_action_logs(r#"[{"key":"created_order","user_id":"usr_9"}]"#);
        let (admin, provider) = admin_ok();

        let refund = create_via_admin_fallback(&open, &provider, &request("300"), &Default::default())
            .await
            .unwrap();

        let (_, sent) = admin.last_request().unwrap();
        assert_eq!(sent.performer_id, "usr_9");
        assert_eq!(sent.order_payment_updated_at, "2026-01-04T14:35:00.12Z");
        assert_eq!(refund.meta.payment_updated_at, "2026-01-04T14:35:00.12Z");
    }

    #[tokio::test]
    async fn zero_order_updated_at_is_not_a_payment_time() {
        let mut o = order("USD");
        o.updated_at = Some("0001-01-01T00:00:00Z".parse().unwrap());
        let open = MemoryOpenApi::new()
            .with_order(o)
            .with_action_logs(r#"[{"key":"created_order","performer_id":"p"}]"#);
        let (admin, provider) = admin_ok();

        let err = create_via_admin_fallback(&open, &provider, &request("1"), &Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::MissingAdminField(_)));
        assert!(err.to_string().contains("--payment-updated-at"));
        assert!(admin.requests().is_empty());
    }

    #[test]
    fn zero_instant_is_only_year_one_midnight() {
        assert!(is_zero_instant(&"0001-01-01T00:00:00Z".parse().unwrap()));
        assert!(!is_zero_instant(&"0001-01-01T00:00:01Z".parse().unwrap()));
        assert!(!is_zero_instant(&"1970-01-01T00:00:00Z".parse().unwrap()));
    }

    #[tokio::test]
    async fn missing_performer_fails_before_admin_call() {
        let open = MemoryOpenApi::new()
            .with_order(order("USD"))
            .with_action_logs(r#"{"items":[{"key":"updated_payment_status","created_at":"2026-01-04T10:00:00Z"}]}"#);
        let (admin, provider) = admin_ok();

        let err = create_via_admin_fallback(&open, &provider, &request("1"), &Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::MissingAdminField(_)));
        assert!(err.to_string().contains("--performer-id"));
        assert!(admin.requests().is_empty());
    }

    #[tokio::test]
    async fn missing_payment_time_names_flag() {
        let open = MemoryOpenApi::new()
            .with_order(order("USD"))
            .with_action_logs(r#"[{"key":"created_order","performer_id":"p"}]"#);
        let (admin, provider) = admin_ok();

        let err = create_via_admin_fallback(&open, &provider, &request("1"), &Default::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--payment-updated-at"));
        assert!(admin.requests().is_empty());
    }

    #[tokio::test]
    async fn unavailable_admin_fails_before_any_call() {
        let open = MemoryOpenApi::new().with_order(order("USD"));
        let provider = StaticAdminProvider::unavailable("admin API base URL required");

        let err = create_via_admin_fallback(&open, &provider, &request("1"), &Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::AdminUnavailable(_)));
        assert_eq!(open.calls_to("get_order"), 0);
    }

    #[tokio::test]
    async fn order_load_failure_is_wrapped() {
        let open = MemoryOpenApi::new().failing_order(Failure::not_found());
        let (_, provider) = admin_ok();

        let err = create_via_admin_fallback(&open, &provider, &request("1"), &Default::default())
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("failed to load order ord_1 for admin fallback"));
    }

    #[tokio::test]
    async fn conversion_errors_propagate_verbatim() {
        let open = MemoryOpenApi::new().with_order(order("JPY"));
        let (admin, provider) = admin_ok();

        let err = create_via_admin_fallback(&open, &provider, &request("0.2"), &Default::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "amount is too small after conversion to minor units"
        );
        assert_eq!(open.calls_to("get_order_action_logs"), 0);
        assert!(admin.requests().is_empty());
    }

    #[tokio::test]
    async fn action_log_problems_are_reported() {
        let open = MemoryOpenApi::new()
            .with_order(order("USD"))
            .failing_action_logs(Failure::Other("connection reset".into()));
        let (_, provider) = admin_ok();
        let err = create_via_admin_fallback(&open, &provider, &request("1"), &Default::default())
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("failed to auto-detect admin refund fields from action logs"));

        let open = MemoryOpenApi::new()
            .with_order(order("USD"))
            .with_action_logs("<html>");
        let err = create_via_admin_fallback(&open, &provider, &request("1"), &Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::LogParse(_)));
    }

    #[tokio::test]
    async fn blank_note_is_not_sent() {
        let open = MemoryOpenApi::new()
            .with_order(order("USD"))
            .with_action_logs(LOGS);
        let (admin, provider) = admin_ok();
        let mut req = request("2");
        req.note = "   ".into();

        create_via_admin_fallback(&open, &provider, &req, &Default::default())
            .await
            .unwrap();
        assert_eq!(admin.last_request().unwrap().1.refund_remark, None);
    }

    #[test]
    fn rfc3339_nano_trims_fraction() {
        let t: DateTime<Utc> = "2026-01-04T14:34:29.413Z".parse().unwrap();
        assert_eq!(rfc3339_nano(t), "2026-01-04T14:34:29.413Z");
        let t: DateTime<Utc> = "2026-01-04T14:34:29Z".parse().unwrap();
        assert_eq!(rfc3339_nano(t), "2026-01-04T14:34:29Z");
    }
}

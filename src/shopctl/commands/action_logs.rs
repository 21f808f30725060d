//! Parsing and mining of order action logs.
//!
//! The action-log feed has no fixed schema: it may arrive wrapped in `items`,
//! wrapped in `results`, or as a bare array, and the facts the admin fallback
//! needs (who acted, when payment status last changed) may sit on the entry
//! itself or inside its `data` / `perform_data` maps. Lookups are therefore
//! expressed as ordered `(source, key)` rules evaluated top to bottom.

use super::helpers::{first_non_empty, string_from_map};
use crate::error::{Result, ShopError};
use crate::model::OrderActionLog;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Entry,
    PerformData,
    Data,
}

type Rule = (Source, &'static str);

const PERFORMER_ID_RULES: &[Rule] = &[
    (Source::Entry, "performer_id"),
    (Source::Entry, "user_id"),
    (Source::PerformData, "performer_id"),
    (Source::PerformData, "user_id"),
    (Source::Data, "performer_id"),
    (Source::Data, "user_id"),
];

const PERFORMER_DISPLAY_RULES: &[Rule] = &[
    (Source::Entry, "performer_name"),
    (Source::Entry, "performer_id"),
    (Source::Entry, "user_id"),
    (Source::PerformData, "performer_name"),
    (Source::PerformData, "performer_id"),
    (Source::PerformData, "user_id"),
    (Source::Data, "performer_name"),
    (Source::Data, "performer_id"),
    (Source::Data, "user_id"),
];

const PAYMENT_STATUS_KEYS: &[&str] = &["updated_payment_status", "updated_order_payment_status"];

fn lookup<'a>(log: &'a OrderActionLog, (source, key): Rule) -> Option<&'a str> {
    match source {
        Source::Entry => {
            let value = match key {
                "performer_name" => &log.performer_name,
                "performer_id" => &log.performer_id,
                "user_id" => &log.user_id,
                _ => return None,
            };
            Some(value.trim()).filter(|v| !v.is_empty())
        }
        Source::PerformData => string_from_map(&log.perform_data, key),
        Source::Data => string_from_map(&log.data, key),
    }
}

fn resolve<'a>(log: &'a OrderActionLog, rules: &[Rule]) -> Option<&'a str> {
    rules.iter().find_map(|rule| lookup(log, *rule))
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    items: Option<Vec<OrderActionLog>>,
    #[serde(default)]
    results: Option<Vec<OrderActionLog>>,
}

/// Parses the raw action-log response.
///
/// Tries a non-empty `items` array, then a non-empty `results` array, then a
/// bare top-level array. When no shape fits, the error of the last attempt is
/// returned, so an object with only empty arrays is rejected.
pub fn parse(raw: &str) -> Result<Vec<OrderActionLog>> {
    if let Ok(envelope) = serde_json::from_str::<Envelope>(raw) {
        match (envelope.items, envelope.results) {
            (Some(items), _) if !items.is_empty() => return Ok(items),
            (_, Some(results)) if !results.is_empty() => return Ok(results),
            _ => {}
        }
    }
    serde_json::from_str::<Vec<OrderActionLog>>(raw).map_err(ShopError::LogParse)
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Picks the value whose timestamp is the latest; when no timestamp parses,
/// the last value in input order.
fn latest_or_last<'a, T: Copy>(candidates: impl Iterator<Item = (&'a str, T)>) -> Option<T> {
    let mut best: Option<(DateTime<Utc>, T)> = None;
    let mut last: Option<T> = None;

    for (created_at, value) in candidates {
        last = Some(value);
        if let Some(t) = parse_time(created_at) {
            if best.map_or(true, |(best_t, _)| t > best_t) {
                best = Some((t, value));
            }
        }
    }
    best.map(|(_, v)| v).or(last)
}

/// Identity of whoever acted most recently on the order.
pub fn detect_performer_id(logs: &[OrderActionLog]) -> Option<String> {
    let candidates = logs
        .iter()
        .filter_map(|log| resolve(log, PERFORMER_ID_RULES).map(|id| (log.created_at.as_str(), id)));
    latest_or_last(candidates).map(str::to_string)
}

/// `key`, falling back to `name`.
pub fn action_label(log: &OrderActionLog) -> &str {
    first_non_empty(&[log.key.as_str(), log.name.as_str()])
}

fn is_payment_update(log: &OrderActionLog) -> bool {
    let label = action_label(log).to_lowercase();
    PAYMENT_STATUS_KEYS.contains(&label.as_str())
        || label.contains("payment_status")
        || log.data.contains_key("updated_payment_status")
        || log.perform_data.contains_key("updated_payment_status")
}

/// Raw `created_at` of the latest payment-status change.
pub fn detect_payment_updated_at(logs: &[OrderActionLog]) -> Option<String> {
    let candidates = logs
        .iter()
        .filter(|log| !log.created_at.trim().is_empty() && is_payment_update(log))
        .map(|log| (log.created_at.trim(), log.created_at.trim()));
    latest_or_last(candidates).map(str::to_string)
}

fn mentions_refund(text: &str) -> bool {
    text.to_lowercase().contains("refund")
}

/// Entries whose label, or any key of `data`/`perform_data`, mentions a refund.
pub fn filter_refund_action_logs(logs: &[OrderActionLog]) -> Vec<OrderActionLog> {
    logs.iter()
        .filter(|log| {
            mentions_refund(action_label(log))
                || log.data.keys().any(|k| mentions_refund(k))
                || log.perform_data.keys().any(|k| mentions_refund(k))
        })
        .cloned()
        .collect()
}

/// Human-readable performer for one entry: name when known, else an id.
pub fn display_performer(log: &OrderActionLog) -> &str {
    resolve(log, PERFORMER_DISPLAY_RULES).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log(value: serde_json::Value) -> OrderActionLog {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parse_accepts_items_results_and_bare_arrays() {
        let items = parse(r#"{"items":[{"key":"a"}]}"#).unwrap();
        assert_eq!(items[0].key, "a");

        let results = parse(r#"{"results":[{"key":"b"},{"key":"c"}]}"#).unwrap();
        assert_eq!(results.len(), 2);

        let bare = parse(r#"[{"name":"d"}]"#).unwrap();
        assert_eq!(bare[0].name, "d");
    }

    #[test]
    fn parse_prefers_items_over_results() {
        let logs = parse(r#"{"items":[{"key":"from_items"}],"results":[{"key":"from_results"}]}"#)
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].key, "from_items");

        let logs = parse(r#"{"items":[],"results":[{"key":"from_results"}]}"#).unwrap();
        assert_eq!(logs[0].key, "from_results");
    }

    #[test]
    fn parse_rejects_objects_with_only_empty_arrays() {
        for raw in [r#"{"items":[]}"#, r#"{"results":[]}"#, r#"{"items":[],"results":[]}"#] {
            let err = parse(raw).unwrap_err();
            assert!(matches!(err, ShopError::LogParse(_)), "{}", raw);
        }
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_unknown_shapes() {
        for raw in ["not json", "{}", r#"{"data":[]}"#, "42"] {
            let err = parse(raw).unwrap_err();
            assert!(matches!(err, ShopError::LogParse(_)), "{}", raw);
            assert!(err
                .to_string()
                .contains("failed to parse order action logs"));
        }
    }

    #[test]
    fn performer_lookup_follows_rule_order() {
        let entry = log(json!({
            "user_id": "u_entry",
            "perform_data": {"performer_id": "p_perform"},
            "data": {"performer_id": "p_data"}
        }));
        assert_eq!(detect_performer_id(&[entry]).as_deref(), Some("u_entry"));

        let nested = log(json!({
            "perform_data": {"user_id": "u_perform", "performer_id": 7},
            "data": {"performer_id": "p_data"}
        }));
        assert_eq!(detect_performer_id(&[nested]).as_deref(), Some("u_perform"));

        let data_only = log(json!({"data": {"user_id": " u_data "}}));
        assert_eq!(detect_performer_id(&[data_only]).as_deref(), Some("u_data"));
    }

    #[test]
    fn performer_is_the_latest_across_all_locations() {
        let logs = vec![
            log(json!({"performer_id": "early", "created_at": "2026-01-04T10:00:00Z"})),
            log(json!({"data": {"user_id": "latest"}, "created_at": "2026-01-04T12:00:00.5+00:00"})),
            log(json!({"perform_data": {"performer_id": "middle"}, "created_at": "2026-01-04T11:00:00Z"})),
            log(json!({"key": "no_identity", "created_at": "2026-01-05T00:00:00Z"})),
        ];
        assert_eq!(detect_performer_id(&logs).as_deref(), Some("latest"));
    }

    #[test]
    fn performer_falls_back_to_last_candidate_without_timestamps() {
        let logs = vec![
            log(json!({"performer_id": "first", "created_at": "yesterday"})),
            log(json!({"performer_id": "second"})),
            log(json!({"key": "noise"})),
        ];
        assert_eq!(detect_performer_id(&logs).as_deref(), Some("second"));
        assert_eq!(detect_performer_id(&[]), None);
    }

    #[test]
    fn payment_update_matches_labels_and_map_keys() {
        let logs = vec![
            log(json!({"key": "Updated_Payment_Status", "created_at": "2026-01-04T10:00:00Z"})),
            log(json!({"name": "order_payment_status_changed", "created_at": "2026-01-04T11:00:00Z"})),
            log(json!({"key": "other", "data": {"updated_payment_status": "paid"}, "created_at": "2026-01-04T14:34:29.413Z"})),
            log(json!({"key": "created_refund", "created_at": "2026-01-05T00:00:00Z"})),
        ];
        assert_eq!(
            detect_payment_updated_at(&logs).as_deref(),
            Some("2026-01-04T14:34:29.413Z")
        );
    }

    #[test]
    fn payment_update_skips_blank_times_and_keeps_raw_fallback() {
        let logs = vec![
            log(json!({"key": "updated_order_payment_status", "created_at": "Jan 4"})),
            log(json!({"key": "updated_payment_status", "created_at": "Jan 5"})),
            log(json!({"key": "updated_payment_status", "created_at": "  "})),
        ];
        assert_eq!(detect_payment_updated_at(&logs).as_deref(), Some("Jan 5"));

        let none = vec![log(json!({"key": "created_order", "created_at": "2026-01-04T10:00:00Z"}))];
        assert_eq!(detect_payment_updated_at(&none), None);
    }

    #[test]
    fn refund_filter_checks_labels_and_map_keys() {
        let logs = vec![
            log(json!({"key": "CREATED_REFUND"})),
            log(json!({"name": "order refunded"})),
            log(json!({"key": "x", "perform_data": {"refund_amount": 10}})),
            log(json!({"key": "y", "data": {"Refund": true}})),
            log(json!({"key": "updated_payment_status", "data": {"status": "refunded"}})),
        ];
        let kept = filter_refund_action_logs(&logs);
        assert_eq!(kept.len(), 4);
        assert!(kept.iter().all(|l| l.key != "updated_payment_status"));
    }

    #[test]
    fn refund_filter_uses_key_before_name() {
        let logs = vec![
            log(json!({"key": "order_updated", "name": "Refund issued"})),
            log(json!({"key": "", "name": "Refund issued"})),
        ];
        let kept = filter_refund_action_logs(&logs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Refund issued");
        assert!(kept[0].key.is_empty());
    }

    #[test]
    fn display_performer_prefers_names() {
        let entry = log(json!({"performer_id": "p1", "data": {"performer_name": "Alice"}}));
        assert_eq!(display_performer(&entry), "p1");

        let named = log(json!({"user_id": "u1", "performer_name": "Bob"}));
        assert_eq!(display_performer(&named), "Bob");

        let nested = log(json!({"perform_data": {"performer_name": "Carol"}, "data": {"user_id": "u2"}}));
        assert_eq!(display_performer(&nested), "Carol");

        assert_eq!(display_performer(&log(json!({"key": "k"}))), "");
    }
}

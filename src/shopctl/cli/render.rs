//! # Rendering Module
//!
//! Turns command results into terminal text. Layout (column widths, padding,
//! truncation) is computed here with Unicode-aware widths; styling comes from
//! [`SHOP_THEME`] and is dropped automatically when stdout is not a terminal.
//!
//! Every `render_*` function returns a `String` so output can be tested
//! without a terminal. The `_internal` variants take an explicit color flag.

use super::styles::SHOP_THEME;
use chrono::{DateTime, Utc};
use console::Style;
use serde::Serialize;
use shopctl::api::{CmdMessage, MessageLevel};
use shopctl::commands::action_logs::{action_label, display_performer};
use shopctl::config::{ShopConfig, CONFIG_KEYS};
use shopctl::error::Result;
use shopctl::model::{AdminFallbackRefund, InferredRefunds, Refund, RefundsListResponse};
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";
const NOTE_WIDTH: usize = 20;

fn styled(style: &Style, text: &str, use_color: Option<bool>) -> String {
    match use_color {
        Some(force) => style.clone().force_styling(force).apply_to(text).to_string(),
        None => style.apply_to(text).to_string(),
    }
}

/// Pads every column to its widest cell. The last column is never padded.
fn render_table(headers: &[&str], rows: &[Vec<String>], use_color: Option<bool>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let line = |cells: Vec<String>, raw: &[String]| -> String {
        let last = cells.len().saturating_sub(1);
        let mut out = String::new();
        for (i, cell) in cells.iter().enumerate() {
            out.push_str(cell);
            if i < last {
                out.push_str(&" ".repeat(widths[i].saturating_sub(raw[i].width())));
                out.push_str(COLUMN_GAP);
            }
        }
        out.push('\n');
        out
    };

    let raw_headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let styled_headers: Vec<String> = headers
        .iter()
        .map(|h| styled(&SHOP_THEME.header, h, use_color))
        .collect();

    let mut out = line(styled_headers, &raw_headers);
    for row in rows {
        out.push_str(&line(row.clone(), row));
    }
    out
}

fn truncate_note(note: &str) -> String {
    if note.chars().count() > NOTE_WIDTH {
        let head: String = note.chars().take(NOTE_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        note.to_string()
    }
}

fn format_time(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn refund_rows(refunds: &[Refund]) -> Vec<Vec<String>> {
    refunds
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.order_id.clone(),
                r.status.clone(),
                r.amount.clone(),
                r.currency.clone(),
                truncate_note(&r.note),
                r.line_items.len().to_string(),
                format_time(r.created_at),
            ]
        })
        .collect()
}

const REFUND_HEADERS: &[&str] = &[
    "ID", "ORDER", "STATUS", "AMOUNT", "CURRENCY", "NOTE", "ITEMS", "CREATED",
];

pub fn render_refund_list(resp: &RefundsListResponse) -> String {
    render_refund_list_internal(resp, None)
}

fn render_refund_list_internal(resp: &RefundsListResponse, use_color: Option<bool>) -> String {
    let mut out = render_table(REFUND_HEADERS, &refund_rows(&resp.items), use_color);
    out.push_str(&format!(
        "\nShowing {} of {} refunds\n",
        resp.items.len(),
        resp.total_count
    ));
    out
}

pub fn render_order_refunds(order_id: &str, resp: &RefundsListResponse) -> String {
    render_order_refunds_internal(order_id, resp, None)
}

fn render_order_refunds_internal(
    order_id: &str,
    resp: &RefundsListResponse,
    use_color: Option<bool>,
) -> String {
    let mut out = render_table(REFUND_HEADERS, &refund_rows(&resp.items), use_color);
    out.push_str(&format!(
        "\nShowing {} refunds for order {}\n",
        resp.items.len(),
        order_id
    ));
    out
}

pub fn render_inferred(inferred: &InferredRefunds) -> String {
    render_inferred_internal(inferred, None)
}

fn render_inferred_internal(inferred: &InferredRefunds, use_color: Option<bool>) -> String {
    if inferred.events.is_empty() {
        return format!(
            "No refund-related action logs found for order {}.\n",
            inferred.order_id
        );
    }

    let rows: Vec<Vec<String>> = inferred
        .events
        .iter()
        .map(|log| {
            vec![
                action_label(log).to_string(),
                display_performer(log).to_string(),
                log.created_at.trim().to_string(),
            ]
        })
        .collect();

    let mut out = render_table(&["ACTION", "PERFORMER", "CREATED"], &rows, use_color);
    out.push_str(&format!(
        "\nShowing {} refund-related action logs for order {}\n",
        inferred.events.len(),
        inferred.order_id
    ));
    out
}

pub fn render_refund_detail(refund: &Refund) -> String {
    render_refund_detail_internal(refund, None)
}

fn render_refund_detail_internal(refund: &Refund, use_color: Option<bool>) -> String {
    let label = |text: &str| styled(&SHOP_THEME.label, &format!("{:<12}", text), use_color);
    let mut out = String::new();

    out.push_str(&format!("{}{}\n", label("ID:"), refund.id));
    out.push_str(&format!("{}{}\n", label("Order:"), refund.order_id));
    out.push_str(&format!("{}{}\n", label("Status:"), refund.status));
    out.push_str(&format!(
        "{}{} {}\n",
        label("Amount:"),
        refund.amount,
        refund.currency
    ));
    if !refund.note.is_empty() {
        out.push_str(&format!("{}{}\n", label("Note:"), refund.note));
    }
    out.push_str(&format!("{}{}\n", label("Restock:"), refund.restock));
    if refund.processed_at.is_some() {
        out.push_str(&format!(
            "{}{}\n",
            label("Processed:"),
            format_time(refund.processed_at)
        ));
    }
    out.push_str(&format!(
        "{}{}\n",
        label("Created:"),
        format_time(refund.created_at)
    ));

    if !refund.line_items.is_empty() {
        out.push_str(&format!("\n{}\n", styled(&SHOP_THEME.header, "Line items:", use_color)));
        for item in &refund.line_items {
            out.push_str(&format!(
                "  {}  x{}  {}\n",
                item.line_item_id,
                item.quantity,
                styled(&SHOP_THEME.dim, &item.subtotal.to_string(), use_color)
            ));
        }
    }
    out
}

pub fn render_config(config: &ShopConfig) -> String {
    CONFIG_KEYS
        .iter()
        .filter_map(|key| config.get(key).map(|val| format!("{} = {}\n", key, val)))
        .collect()
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

pub fn render_fallback_json(refund: &AdminFallbackRefund) -> Result<String> {
    render_json(&refund.envelope())
}

pub fn render_inferred_json(inferred: &InferredRefunds) -> Result<String> {
    render_json(&inferred.envelope())
}

fn message_style(level: &MessageLevel) -> &'static Style {
    match level {
        MessageLevel::Info => &SHOP_THEME.info,
        MessageLevel::Success => &SHOP_THEME.success,
        MessageLevel::Warning => &SHOP_THEME.warning,
        MessageLevel::Error => &SHOP_THEME.error,
    }
}

fn is_diagnostic(level: &MessageLevel) -> bool {
    matches!(level, MessageLevel::Warning | MessageLevel::Error)
}

/// Renders the messages meant for stdout: info and success.
pub fn render_messages(messages: &[CmdMessage]) -> String {
    render_messages_internal(messages, false, None)
}

fn render_messages_internal(
    messages: &[CmdMessage],
    diagnostics: bool,
    use_color: Option<bool>,
) -> String {
    messages
        .iter()
        .filter(|m| is_diagnostic(&m.level) == diagnostics)
        .map(|m| format!("{}\n", styled(message_style(&m.level), &m.content, use_color)))
        .collect()
}

/// Prints messages: warnings and errors always go to stderr so that JSON on
/// stdout stays parseable; info and success only show in text mode.
pub fn print_messages(messages: &[CmdMessage], text_mode: bool) {
    let diagnostics = render_messages_internal(messages, true, None);
    if !diagnostics.is_empty() {
        eprint!("{}", diagnostics);
    }
    if text_mode {
        let output = render_messages(messages);
        if !output.is_empty() {
            print!("{}", output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopctl::model::{OrderActionLog, RefundLineItem};

    fn refund(id: &str, note: &str) -> Refund {
        Refund {
            id: id.into(),
            order_id: "ord_1".into(),
            status: "completed".into(),
            amount: "10.5".into(),
            currency: "USD".into(),
            note: note.into(),
            created_at: Some("2026-01-04T14:34:29Z".parse().unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_refund_list_columns_and_footer() {
        let resp = RefundsListResponse {
            items: vec![
                refund("ref_1", "short"),
                refund("ref_22", "a note that is far too long to show"),
            ],
            total_count: 7,
            ..Default::default()
        };
        let output = render_refund_list_internal(&resp, Some(false));
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("ID      ORDER  STATUS"));
        assert!(lines[1].starts_with("ref_1   ord_1"));
        assert!(lines[2].contains("a note that is fa..."));
        assert!(lines[1].ends_with("2026-01-04 14:34"));
        assert!(output.ends_with("\nShowing 2 of 7 refunds\n"));
    }

    #[test]
    fn test_order_refunds_footer() {
        let resp = RefundsListResponse {
            items: vec![refund("ref_1", "")],
            ..Default::default()
        };
        let output = render_order_refunds_internal("ord_1", &resp, Some(false));
        assert!(output.ends_with("Showing 1 refunds for order ord_1\n"));
    }

    #[test]
    fn test_inferred_empty_message() {
        let inferred = InferredRefunds {
            order_id: "ord_9".into(),
            events: vec![],
        };
        assert_eq!(
            render_inferred_internal(&inferred, Some(false)),
            "No refund-related action logs found for order ord_9.\n"
        );
    }

    #[test]
    fn test_inferred_table() {
        let events: Vec<OrderActionLog> = serde_json::from_str(
            r#"[
                {"key":"created_refund","performer_name":"Alice","created_at":" 2026-01-02T00:00:00Z "},
                {"name":"refund_updated","data":{"user_id":"u_7"},"created_at":"2026-01-03T00:00:00Z"}
            ]"#,
        )
        .unwrap();
        let inferred = InferredRefunds {
            order_id: "ord_1".into(),
            events,
        };
        let output = render_inferred_internal(&inferred, Some(false));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "ACTION          PERFORMER  CREATED");
        assert_eq!(lines[1], "created_refund  Alice      2026-01-02T00:00:00Z");
        assert_eq!(lines[2], "refund_updated  u_7        2026-01-03T00:00:00Z");
        assert!(output.ends_with("\nShowing 2 refund-related action logs for order ord_1\n"));
    }

    #[test]
    fn test_refund_detail() {
        let mut r = refund("ref_1", "");
        r.line_items = vec![RefundLineItem {
            line_item_id: "li_1".into(),
            quantity: 2,
            subtotal: 5.25,
        }];
        let output = render_refund_detail_internal(&r, Some(false));
        assert!(output.contains("Amount:     10.5 USD"));
        assert!(!output.contains("Note:"));
        assert!(!output.contains("Processed:"));
        assert!(output.contains("li_1  x2  5.25"));
    }

    #[test]
    fn test_render_with_color_includes_ansi() {
        let resp = RefundsListResponse::default();
        let output = render_refund_list_internal(&resp, Some(true));
        assert!(output.contains("\u{1b}["));
    }

    #[test]
    fn test_messages_split_by_level() {
        let messages = vec![
            CmdMessage::warning("Open API /refunds endpoint returned 404"),
            CmdMessage::success("Created refund ref_1"),
        ];
        let stdout = render_messages_internal(&messages, false, Some(false));
        let stderr = render_messages_internal(&messages, true, Some(false));
        assert_eq!(stdout, "Created refund ref_1\n");
        assert_eq!(stderr, "Open API /refunds endpoint returned 404\n");
    }

    #[test]
    fn test_config_masks_tokens() {
        let config = ShopConfig {
            admin_token: Some("adm_0123456789".into()),
            ..Default::default()
        };
        let output = render_config(&config);
        assert!(output.contains("admin-token = ****6789"));
        assert!(output.contains("api-base-url = https://open.shopline.io/v1"));
    }
}

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One line of a refund request: which order line and how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundLineItemRequest {
    pub line_item_id: String,
    #[serde(default)]
    pub quantity: i64,
}

/// Body of `POST /refunds`.
///
/// Built fresh per invocation from `--body`/`--body-file` and the shorthand
/// flags; see [`crate::commands::request`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefundCreateRequest {
    #[serde(default)]
    pub order_id: String,
    #[serde(default, serialize_with = "decimal_number::serialize")]
    pub amount: BigDecimal,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    #[serde(default)]
    pub restock: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<RefundLineItemRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefundLineItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub line_item_id: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub subtotal: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub order_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub note: String,
    #[serde(default)]
    pub restock: bool,
    #[serde(default, deserialize_with = "lenient::list")]
    pub line_items: Vec<RefundLineItem>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefundsListResponse {
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Vec<Refund>,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundsListOptions {
    pub page: u32,
    pub page_size: u32,
}

impl Default for RefundsListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

/// The slice of an order the refund fallback needs. Always loaded fresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One audit-trail record from `GET /orders/{id}/action_logs`.
///
/// The feed has no fixed schema: identity and payment facts may sit on the
/// entry itself or inside either of the untyped maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderActionLog {
    #[serde(default, deserialize_with = "lenient::string")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub performer_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub performer_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::map")]
    pub data: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::map")]
    pub perform_data: Map<String, Value>,
}

/// Body of the Admin API refund call. Amounts are integer minor units only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRefundRequest {
    pub performer_id: String,
    pub amount: i64,
    pub order_payment_updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_remark: Option<String>,
}

/// What the admin fallback resolved, kept for presentation. Never transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackMetadata {
    pub performer_id: String,
    pub payment_updated_at: String,
    pub amount_minor: i64,
    pub currency: String,
}

/// A refund that was submitted through the Admin API instead of the Open API.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminFallbackRefund {
    pub request: RefundCreateRequest,
    pub admin_response: Value,
    pub meta: FallbackMetadata,
}

impl AdminFallbackRefund {
    pub fn envelope(&self) -> AdminFallbackEnvelope<'_> {
        AdminFallbackEnvelope {
            id: "",
            order_id: &self.request.order_id,
            status: "submitted",
            amount: &self.request.amount,
            currency: &self.meta.currency,
            note: &self.request.note,
            restock: self.request.restock,
            via: "admin_fallback",
            admin_amount_minor: self.meta.amount_minor,
            performer_id: &self.meta.performer_id,
            order_payment_updated_at: &self.meta.payment_updated_at,
            admin_response: &self.admin_response,
        }
    }
}

/// JSON shape printed for a refund created through the admin fallback.
#[derive(Debug, Serialize)]
pub struct AdminFallbackEnvelope<'a> {
    pub id: &'a str,
    pub order_id: &'a str,
    pub status: &'a str,
    #[serde(serialize_with = "decimal_number::serialize")]
    pub amount: &'a BigDecimal,
    pub currency: &'a str,
    pub note: &'a str,
    pub restock: bool,
    pub via: &'a str,
    pub admin_amount_minor: i64,
    pub performer_id: &'a str,
    pub order_payment_updated_at: &'a str,
    pub admin_response: &'a Value,
}

/// Refund activity reconstructed from action logs when the order refunds
/// endpoint is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct InferredRefunds {
    pub order_id: String,
    pub events: Vec<OrderActionLog>,
}

impl InferredRefunds {
    pub fn envelope(&self) -> InferredRefundsEnvelope<'_> {
        InferredRefundsEnvelope {
            items: Vec::new(),
            total_count: 0,
            order_id: &self.order_id,
            endpoint_unavailable: true,
            reason: "refunds_endpoint_404",
            inferred_refund_events: &self.events,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InferredRefundsEnvelope<'a> {
    pub items: Vec<Refund>,
    pub total_count: i64,
    pub order_id: &'a str,
    pub endpoint_unavailable: bool,
    pub reason: &'a str,
    pub inferred_refund_events: &'a [OrderActionLog],
}

/// Writes a decimal as a JSON number: integral values as integers, anything
/// else as a float.
pub(crate) mod decimal_number {
    use bigdecimal::{BigDecimal, ToPrimitive};
    use serde::Serializer;
    use std::borrow::Borrow;

    pub fn serialize<S, D>(value: &D, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        D: Borrow<BigDecimal>,
    {
        let value = value.borrow();
        if value.with_scale(0) == *value {
            if let Some(whole) = value.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        match value.to_f64() {
            Some(float) => serializer.serialize_f64(float),
            None => serializer.serialize_str(&value.to_string()),
        }
    }
}

/// Deserializers that tolerate the loose typing of the platform's responses.
pub(crate) mod lenient {
    use chrono::{DateTime, Utc};
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    /// Strings, numbers, and booleans become strings; null becomes empty.
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(D::Error::custom(format!("expected a string, got {}", other))),
        }
    }

    pub fn map<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Map<String, Value>, D::Error> {
        Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// RFC 3339 timestamps; null and empty strings mean "not set".
    pub fn timestamp<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .map(|t| Some(t.with_timezone(&Utc)))
                .map_err(D::Error::custom),
        }
    }
}

//! Builds the refund-creation request from a JSON body and individual flags.

use crate::error::{Result, ShopError};
use crate::model::RefundCreateRequest;
use bigdecimal::BigDecimal;

/// Individual refund flags. `None` means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefundFlags {
    pub order_id: Option<String>,
    pub amount: Option<BigDecimal>,
    pub note: Option<String>,
    pub restock: Option<bool>,
}

impl RefundFlags {
    pub fn any_set(&self) -> bool {
        self.order_id.is_some()
            || self.amount.is_some()
            || self.note.is_some()
            || self.restock.is_some()
    }
}

/// Merges an optional JSON `body` with `flags`. Flags that were given always
/// win over the body.
pub fn build(body: Option<&str>, flags: &RefundFlags) -> Result<RefundCreateRequest> {
    let body = body.filter(|b| !b.trim().is_empty());
    if body.is_none() && !flags.any_set() {
        return Err(ShopError::validation(
            "provide refund data via --body/--body-file or individual flags (--order-id, --amount, --note, --restock)",
        ));
    }

    let mut req = match body {
        Some(raw) => serde_json::from_str::<RefundCreateRequest>(raw)
            .map_err(|e| ShopError::validation(format!("invalid refund body JSON: {}", e)))?,
        None => RefundCreateRequest::default(),
    };

    if let Some(order_id) = &flags.order_id {
        req.order_id = order_id.clone();
    }
    if let Some(amount) = &flags.amount {
        req.amount = amount.clone();
    }
    if let Some(note) = &flags.note {
        req.note = note.clone();
    }
    if let Some(restock) = flags.restock {
        req.restock = restock;
    }

    req.order_id = req.order_id.trim().to_string();
    if req.order_id.is_empty() {
        return Err(ShopError::validation(
            "order_id is required (set --order-id or include order_id in --body/--body-file)",
        ));
    }
    Ok(req)
}

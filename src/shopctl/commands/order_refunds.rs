use super::action_logs;
use super::fallback::is_not_found;
use crate::client::OpenApi;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShopError};
use crate::model::InferredRefunds;

pub const ACTION_LOG_FALLBACK_NOTICE: &str =
    "Refund endpoint unavailable (404) for this store; using action logs as fallback.";

/// Lists the refunds of one order. When the endpoint is missing for this
/// store, refund activity is inferred from the order's action logs instead.
pub async fn run<C>(open: &C, order_id: &str) -> Result<CmdResult>
where
    C: OpenApi + ?Sized,
{
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(ShopError::validation("order id is required"));
    }

    let primary = match open.list_order_refunds(order_id).await {
        Ok(refunds) => return Ok(CmdResult::default().with_refunds(refunds)),
        Err(err) => err,
    };

    if !is_not_found(&primary) {
        return Err(ShopError::ListOrderRefunds {
            primary: Box::new(primary),
            fallback: None,
        });
    }

    tracing::warn!(order_id, "order refunds endpoint returned 404, inferring from action logs");
    let events = match infer_from_action_logs(open, order_id).await {
        Ok(events) => events,
        Err(err) => {
            return Err(ShopError::ListOrderRefunds {
                primary: Box::new(primary),
                fallback: Some(Box::new(err)),
            })
        }
    };
    tracing::debug!(order_id, events = events.len(), "refund events from action logs");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(ACTION_LOG_FALLBACK_NOTICE));
    Ok(result.with_inferred(InferredRefunds {
        order_id: order_id.to_string(),
        events,
    }))
}

async fn infer_from_action_logs<C>(
    open: &C,
    order_id: &str,
) -> Result<Vec<crate::model::OrderActionLog>>
where
    C: OpenApi + ?Sized,
{
    let raw = open.get_order_action_logs(order_id).await?;
    let logs = action_logs::parse(&raw)?;
    Ok(action_logs::filter_refund_action_logs(&logs))
}

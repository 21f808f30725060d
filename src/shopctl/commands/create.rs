use super::fallback::{self, AdminOverrides};
use crate::client::{AdminProvider, OpenApi};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShopError};
use crate::model::RefundCreateRequest;

pub const ADMIN_FALLBACK_NOTICE: &str =
    "Open API /refunds endpoint returned 404; attempting Admin API fallback.";

/// Creates a refund through the Open API, degrading to the Admin API when the
/// refunds endpoint is missing for this store.
pub async fn run<C, P>(
    open: &C,
    provider: &P,
    req: RefundCreateRequest,
    overrides: &AdminOverrides,
) -> Result<CmdResult>
where
    C: OpenApi + ?Sized,
    P: AdminProvider + ?Sized,
{
    let primary = match open.create_refund(&req).await {
        Ok(refund) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::success(format!(
                "Created refund {} (status: {})",
                refund.id, refund.status
            )));
            return Ok(result.with_refund(refund));
        }
        Err(err) => err,
    };

    if !fallback::is_not_found(&primary) {
        return Err(ShopError::CreateRefund {
            primary: Box::new(primary),
            fallback: None,
        });
    }

    tracing::warn!(order_id = %req.order_id, "refunds endpoint returned 404, trying admin API");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(ADMIN_FALLBACK_NOTICE));

    match fallback::create_via_admin_fallback(open, provider, &req, overrides).await {
        Ok(refund) => {
            result.add_message(CmdMessage::success(format!(
                "Created refund via admin fallback for order {} (amount minor units: {})",
                refund.request.order_id, refund.meta.amount_minor
            )));
            Ok(result.with_fallback_refund(refund))
        }
        Err(err) => Err(ShopError::CreateRefund {
            primary: Box::new(primary),
            fallback: Some(Box::new(err)),
        }),
    }
}

use crate::client::OpenApi;
use crate::commands::CmdResult;
use crate::error::{Result, ShopError};

pub async fn run<C>(open: &C, refund_id: &str) -> Result<CmdResult>
where
    C: OpenApi + ?Sized,
{
    let refund_id = refund_id.trim();
    if refund_id.is_empty() {
        return Err(ShopError::validation("refund id is required"));
    }
    let refund = open
        .get_refund(refund_id)
        .await
        .map_err(|e| ShopError::GetRefund(Box::new(e)))?;
    Ok(CmdResult::default().with_refund(refund))
}

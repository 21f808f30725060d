use crate::client::OpenApi;
use crate::commands::CmdResult;
use crate::error::{Result, ShopError};
use crate::model::RefundsListOptions;

pub async fn run<C>(open: &C, opts: RefundsListOptions) -> Result<CmdResult>
where
    C: OpenApi + ?Sized,
{
    let opts = RefundsListOptions {
        page: opts.page.max(1),
        page_size: opts.page_size.max(1),
    };
    let refunds = open
        .list_refunds(&opts)
        .await
        .map_err(|e| ShopError::ListRefunds(Box::new(e)))?;
    Ok(CmdResult::default().with_refunds(refunds))
}

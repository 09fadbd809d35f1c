//! Resolve and show commands - run the lookup hook

use crate::cli::args::{ResolveArgs, ShowArgs};
use crate::error::{ProxyError, ProxyResult};
use crate::loader::{ProxyContext, Resolution};

/// Print the path claimed for an identifier
pub async fn execute(args: ResolveArgs, ctx: &ProxyContext) -> ProxyResult<()> {
    match ctx.loader.resolve(&args.identifier).await? {
        Resolution::Claimed(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Resolution::Declined => Err(ProxyError::ProxyNotFound(args.identifier)),
    }
}

/// Print the source of a claimed proxy
pub async fn show(args: ShowArgs, ctx: &ProxyContext) -> ProxyResult<()> {
    let loaded = ctx.loader.load(&args.identifier).await?;
    print!("{}", loaded.source);
    Ok(())
}

//! Remote-rm command - delete a path on the remote archive

use crate::cli::args::RemoteRmArgs;
use crate::config::Config;
use crate::error::HubResult;
use crate::ui::{report, UiContext};

/// Execute the remote-rm command
pub async fn execute(args: RemoteRmArgs, config: &Config) -> HubResult<()> {
    let sync = super::remote_sync(config)?;
    sync.remove(&args.path).await?;

    let ctx = UiContext::detect();
    report::removed(&ctx, &format!("remote {}", args.path));
    Ok(())
}

//! Evict command - delete a category subtree from the local cache

use crate::cli::args::EvictArgs;
use crate::config::Config;
use crate::error::HubResult;
use crate::fetch::Silent;
use crate::ui::{self, report, TaskSpinner, UiContext};
use std::sync::Arc;

/// Execute the evict command
pub async fn execute(args: EvictArgs, config: &Config) -> HubResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let cache = super::artifact_cache(config, Arc::new(Silent));
    let dir = cache.resolver().category_dir(args.category);

    let prompt = format!("Delete everything under {}?", dir.display());
    if !ui::confirm(&ctx, &prompt, true).await? {
        report::notice(&ctx, "Aborted", None);
        return Ok(());
    }

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Evicting {}...", args.category));
    match cache.evict(args.category).await {
        Ok(true) => spinner.stop(&format!("Evicted {}", dir.display())),
        Ok(false) => spinner.stop(&format!("Nothing cached under {}", dir.display())),
        Err(e) => {
            spinner.stop_error(&format!("Failed to evict {}", args.category));
            return Err(e);
        }
    }

    Ok(())
}

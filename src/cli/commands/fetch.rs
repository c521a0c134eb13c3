//! Fetch command - materialize artifacts into the local cache

use crate::cli::args::{FetchArgs, ReportFormat};
use crate::config::Config;
use crate::error::{HubError, HubResult};
use crate::fetch::{Progress, Silent};
use crate::ui::{report, TransferProgress, UiContext};
use std::sync::Arc;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> HubResult<()> {
    let json = args.format == ReportFormat::Json;
    let ctx = UiContext::detect().plain_if(json);
    let progress: Arc<dyn Progress> = if json {
        Arc::new(Silent)
    } else {
        Arc::new(TransferProgress::new(&ctx))
    };
    let cache = super::artifact_cache(config, progress);

    match (args.all, args.category, args.name) {
        (Some(name), _, _) => {
            let paths = cache.materialize_all(&name).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&paths)?);
            } else {
                report::resolved(&ctx, &name, &paths);
            }
        }
        (None, Some(category), Some(name)) => {
            let materialized = cache.materialize(&name, category).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&materialized)?);
            } else {
                report::materialized(&ctx, &materialized);
            }
        }
        _ => {
            return Err(HubError::User(
                "Specify <CATEGORY> <NAME> or --all <NAME>".to_string(),
            ))
        }
    }

    Ok(())
}

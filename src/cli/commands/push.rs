//! Push command - mirror a local directory to the remote archive

use crate::cli::args::{PushArgs, ReportFormat};
use crate::config::Config;
use crate::error::HubResult;
use crate::ui::{report, TaskSpinner, UiContext};

/// Execute the push command
pub async fn execute(args: PushArgs, config: &Config) -> HubResult<()> {
    let sync = super::remote_sync(config)?;
    let json = args.format == ReportFormat::Json;
    let ctx = UiContext::detect().plain_if(json);

    let mut spinner = TaskSpinner::new(&ctx);
    if !json {
        spinner.start(&format!(
            "Uploading {} to {}...",
            args.local_dir.display(),
            args.remote_dir
        ));
    }

    let summary = match sync
        .push(&args.local_dir, &args.remote_dir, args.remove_source)
        .await
    {
        Ok(summary) => summary,
        Err(e) => {
            if !json {
                spinner.stop_error("Upload failed");
            }
            return Err(e);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    spinner.stop(&format!("Uploaded {} file(s)", summary.uploaded.len()));
    report::pushed(&ctx, &summary, &args.local_dir);

    Ok(())
}

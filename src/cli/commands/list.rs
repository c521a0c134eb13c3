//! List command - show cached artifacts of one category

use crate::artifact::Category;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::HubResult;
use crate::fetch::Silent;
use crate::ui::{report, UiContext};
use console::style;
use std::sync::Arc;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> HubResult<()> {
    let cache = super::artifact_cache(config, Arc::new(Silent));
    let entries = cache.list(args.category).await?;

    if entries.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                report::notice(&ctx, &format!("No cached {} entries", args.category), None);
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(args.category, &entries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry);
            }
        }
    }

    Ok(())
}

fn print_table(category: Category, entries: &[String]) {
    println!("{}", style(category.to_string().to_uppercase()).bold());
    println!("{}", "-".repeat(40));
    for entry in entries {
        println!("{}", entry);
    }
    println!();
    println!("{} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
}

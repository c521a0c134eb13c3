//! Registry command - show configured artifacts

use crate::artifact::Category;
use crate::cli::args::{OutputFormat, RegistryArgs};
use crate::config::Config;
use crate::error::HubResult;
use crate::ui::{report, UiContext};
use console::style;

/// Execute the registry command
pub async fn execute(args: RegistryArgs, config: &Config) -> HubResult<()> {
    let registry = &config.artifacts;

    if registry.is_empty() {
        match args.format {
            OutputFormat::Json => println!("{{}}"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                report::notice(
                    &ctx,
                    "No artifacts configured",
                    Some("Add [artifacts.<name>] tables to the config or pass --registry FILE"),
                );
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(registry)?),
        OutputFormat::Plain => {
            for (name, _) in registry.iter() {
                println!("{}", name);
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<24} {:<16} {:<8} {:<8}",
                style("NAME").bold(),
                style("APPLICATION").bold(),
                style("DATASET").bold(),
                style("REPO").bold()
            );
            println!("{}", "-".repeat(58));
            for (name, descriptor) in registry.iter() {
                let mark = |category| {
                    if descriptor.source(category).is_some() {
                        "yes"
                    } else {
                        "-"
                    }
                };
                println!(
                    "{:<24} {:<16} {:<8} {:<8}",
                    name,
                    descriptor.application,
                    mark(Category::Dataset),
                    mark(Category::Repo)
                );
            }
            println!();
            println!("{} artifact(s)", registry.len());
        }
    }

    Ok(())
}

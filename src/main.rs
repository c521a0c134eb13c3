//! modelhub CLI entry point
//!
//! Loads configuration, installs logging, and dispatches to subcommands.

use clap::Parser;
use console::style;
use modelhub::cli::{commands, Cli, Commands};
use modelhub::config::{load_registry, Config, ConfigManager, LogFormat};
use modelhub::error::{HubError, HubResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> HubResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions { shell } = cli.command {
        commands::completions(shell);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| HubError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let mut config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_logging(&cli, &config);

    match local_config_path {
        Some(ref path) => debug!("Using local config: {}", path.display()),
        None if cli.no_local => debug!("Local config discovery disabled (--no-local)"),
        None => {}
    }

    apply_overrides(&cli, &mut config).await?;
    debug!(
        "Cache root {}, {} artifact(s)",
        config.storage.root().display(),
        config.artifacts.len()
    );

    match cli.command {
        Commands::Completions { .. } => Ok(()),
        Commands::Fetch(args) => commands::fetch(args, &config).await,
        Commands::List(args) => commands::list(args, &config).await,
        Commands::Evict(args) => commands::evict(args, &config).await,
        Commands::Push(args) => commands::push(args, &config).await,
        Commands::RemoteRm(args) => commands::remote_rm(args, &config).await,
        Commands::Registry(args) => commands::registry(args, &config).await,
        Commands::Config(args) => commands::config(args, &config_manager, &config).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `--log-format` beats the config file
fn init_logging(cli: &Cli, config: &Config) {
    let filter = match cli.verbose {
        0 => EnvFilter::new("modelhub=warn"),
        1 => EnvFilter::new("modelhub=info"),
        _ => EnvFilter::new("modelhub=debug"),
    };

    let format = cli.log_format.unwrap_or(config.general.log_format);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.without_time().init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Per-invocation flags layered over the loaded configuration
async fn apply_overrides(cli: &Cli, config: &mut Config) -> HubResult<()> {
    if let Some(ref root) = cli.root {
        config.storage.local_root = Some(root.clone());
    }
    if let Some(ref remote) = cli.remote {
        config.remote.base_url = Some(remote.clone());
    }
    if let Some(ref path) = cli.registry {
        let extra = load_registry(path).await?;
        debug!("Merged {} artifact(s) from {}", extra.len(), path.display());
        config.artifacts = std::mem::take(&mut config.artifacts).merged(extra);
    }
    Ok(())
}

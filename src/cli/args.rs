//! CLI argument definitions using clap derive

use crate::artifact::Category;
use crate::config::LogFormat;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// modelhub - local cache for models, datasets and their source repos
///
/// Materializes named artifacts from a registry into a local cache and
/// mirrors local directories to a remote archive.
#[derive(Parser, Debug)]
#[command(name = "modelhub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MODELHUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .modelhub.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,

    /// Cache root for this invocation
    #[arg(long, global = true, env = "MODELHUB_ROOT")]
    pub root: Option<PathBuf>,

    /// Remote archive base URL for this invocation
    #[arg(long, global = true, env = "MODELHUB_REMOTE")]
    pub remote: Option<String>,

    /// Extra registry file (JSON or TOML) merged over the configured one
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialize an artifact into the local cache
    Fetch(FetchArgs),

    /// List cached artifacts of one category
    List(ListArgs),

    /// Delete a whole category from the local cache
    Evict(EvictArgs),

    /// Upload a local directory's files to the remote archive
    Push(PushArgs),

    /// Delete a path on the remote archive
    RemoteRm(RemoteRmArgs),

    /// Show configured artifacts
    Registry(RegistryArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// What to materialize
    #[arg(required_unless_present = "all")]
    pub category: Option<Category>,

    /// Artifact name
    #[arg(required_unless_present = "all")]
    pub name: Option<String>,

    /// Materialize model, dataset and repo for NAME (skipping absent sources)
    #[arg(long, value_name = "NAME", conflicts_with_all = ["category", "name"])]
    pub all: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Category to list
    pub category: Category,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the evict command
#[derive(Parser, Debug)]
pub struct EvictArgs {
    /// Category to delete
    pub category: Category,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the push command
#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Local directory whose files are uploaded
    pub local_dir: PathBuf,

    /// Remote directory (created level by level)
    pub remote_dir: String,

    /// Delete LOCAL_DIR after every upload succeeded
    #[arg(long)]
    pub remove_source: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the remote-rm command
#[derive(Parser, Debug)]
pub struct RemoteRmArgs {
    /// Remote path to delete
    pub path: String,
}

/// Arguments for the registry command
#[derive(Parser, Debug)]
pub struct RegistryArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Output format for operation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable steps
    Text,
    /// JSON document on stdout
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_fetch() {
        let cli = Cli::parse_from(["modelhub", "fetch", "dataset", "resnet"]);
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.category, Some(Category::Dataset));
                assert_eq!(args.name.as_deref(), Some("resnet"));
                assert!(args.all.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Fetch command"),
        }
    }

    #[test]
    fn cli_parses_fetch_all() {
        let cli = Cli::parse_from(["modelhub", "fetch", "--all", "resnet", "-f", "json"]);
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.all.as_deref(), Some("resnet"));
                assert!(args.category.is_none());
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Fetch command"),
        }
    }

    #[test]
    fn cli_rejects_fetch_without_target() {
        assert!(Cli::try_parse_from(["modelhub", "fetch"]).is_err());
        assert!(Cli::try_parse_from(["modelhub", "fetch", "weights", "resnet"]).is_err());
    }

    #[test]
    fn cli_parses_push() {
        let cli = Cli::parse_from(["modelhub", "push", "out", "a/b", "--remove-source"]);
        match cli.command {
            Commands::Push(args) => {
                assert_eq!(args.local_dir, PathBuf::from("out"));
                assert_eq!(args.remote_dir, "a/b");
                assert!(args.remove_source);
            }
            _ => panic!("expected Push command"),
        }
    }

    #[test]
    fn cli_parses_remote_rm() {
        let cli = Cli::parse_from(["modelhub", "remote-rm", "a/b"]);
        assert!(matches!(cli.command, Commands::RemoteRm(ref args) if args.path == "a/b"));
    }

    #[test]
    fn cli_parses_evict_yes() {
        let cli = Cli::parse_from(["modelhub", "evict", "repo", "--yes"]);
        match cli.command {
            Commands::Evict(args) => {
                assert_eq!(args.category, Category::Repo);
                assert!(args.yes);
            }
            _ => panic!("expected Evict command"),
        }
    }

    #[test]
    fn cli_global_overrides() {
        let cli = Cli::parse_from([
            "modelhub",
            "list",
            "model",
            "--root",
            "/tmp/cache",
            "--remote",
            "https://archive.example",
            "--log-format",
            "json",
            "--no-local",
        ]);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(cli.remote.as_deref(), Some("https://archive.example"));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert!(cli.no_local);
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["modelhub", "registry"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["modelhub", "-v", "registry"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["modelhub", "-vv", "registry"]);
        assert_eq!(cli.verbose, 2);
    }
}

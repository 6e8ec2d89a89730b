//! CLI module for helmsman
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `monitor` - Run the decision loop on an interval until interrupted
//! - `select` - Evaluate one switch/keep decision and exit
//! - `delays` - Print the fastest nodes of the group and exit
//! - `current` - Print the active node and its delay and exit
//! - `endpoints` - Probe configured endpoints through the tunnel and exit
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # One dry-run decision, machine-readable
//! helmsman select --dry-run --json
//!
//! # Long-running monitor with a custom config
//! helmsman monitor -c /etc/helmsman.toml
//! ```

pub mod completions;
pub mod config;
pub mod current;
pub mod delays;
pub mod endpoints;
pub mod monitor;
pub mod output;
pub mod select;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::{ConfigError, HelmsmanConfig, LogFormat, LoggingConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// helmsman - latency-aware proxy failover monitor
#[derive(Parser, Debug)]
#[command(
    name = "helmsman",
    version,
    about = "Latency-aware failover monitor for proxy controller APIs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the decision loop until interrupted
    Monitor(MonitorArgs),
    /// Evaluate one switch/keep decision and exit
    Select(SelectArgs),
    /// Print the fastest nodes of the group and exit
    Delays(DelaysArgs),
    /// Print the active node and its delay and exit
    Current(CurrentArgs),
    /// Probe configured endpoints through the tunnel and exit
    Endpoints(EndpointsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "helmsman.toml")]
    pub config: PathBuf,

    /// Use JSON output
    #[arg(long)]
    pub json: bool,

    /// Evaluate decisions without applying switches
    #[arg(long)]
    pub dry_run: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HELMSMAN_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "helmsman.toml")]
    pub config: PathBuf,

    /// Use JSON output
    #[arg(long)]
    pub json: bool,

    /// Evaluate the decision without applying a switch
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct DelaysArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "helmsman.toml")]
    pub config: PathBuf,

    /// Use JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CurrentArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "helmsman.toml")]
    pub config: PathBuf,

    /// Use JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EndpointsArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "helmsman.toml")]
    pub config: PathBuf,

    /// Use JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "helmsman.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration for a data-path command: file (when present), then
/// environment overrides, then validation.
pub fn load_config(path: &Path) -> Result<HelmsmanConfig, ConfigError> {
    let config = if path.exists() {
        HelmsmanConfig::load(Some(path))?
    } else {
        HelmsmanConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Everything a data-path command needs: validated config plus the shared
/// controller client and endpoint prober.
pub struct Runtime {
    pub config: HelmsmanConfig,
    pub client: crate::controller::ControllerClient,
    pub prober: crate::probe::EndpointProber,
}

/// Load config, initialize tracing, and construct the shared collaborators.
pub fn build_runtime(config_path: &Path, log_level: Option<&str>) -> anyhow::Result<Runtime> {
    let mut config = load_config(config_path)?;
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }
    init_tracing(&config.logging)?;

    if !config.probe.endpoint_urls.is_empty() && config.probe.proxy_addr().is_none() {
        tracing::warn!(
            "probe.endpoint_urls is set but probe.proxy_addr is empty; endpoint checks are disabled"
        );
    }

    let client = crate::controller::ControllerClient::new(&config.controller)?;
    let prober = crate::probe::EndpointProber::new(&config.probe)?;
    Ok(Runtime {
        config,
        client,
        prober,
    })
}

/// Initialize tracing based on configuration. Logs go to stderr so stdout
/// stays machine-parseable.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_monitor_defaults() {
        let cli = Cli::try_parse_from(["helmsman", "monitor"]).unwrap();
        match cli.command {
            Commands::Monitor(args) => {
                assert_eq!(args.config, PathBuf::from("helmsman.toml"));
                assert!(!args.json);
                assert!(!args.dry_run);
            }
            _ => panic!("Expected Monitor command"),
        }
    }

    #[test]
    fn test_cli_parse_select_dry_run() {
        let cli = Cli::try_parse_from(["helmsman", "select", "--dry-run", "--json"]).unwrap();
        match cli.command {
            Commands::Select(args) => {
                assert!(args.dry_run);
                assert!(args.json);
            }
            _ => panic!("Expected Select command"),
        }
    }

    #[test]
    fn test_cli_parse_custom_config_path() {
        let cli = Cli::try_parse_from(["helmsman", "delays", "-c", "custom.toml"]).unwrap();
        match cli.command {
            Commands::Delays(args) => assert_eq!(args.config, PathBuf::from("custom.toml")),
            _ => panic!("Expected Delays command"),
        }
    }

    #[test]
    fn test_cli_parse_current() {
        let cli = Cli::try_parse_from(["helmsman", "current"]).unwrap();
        assert!(matches!(cli.command, Commands::Current(_)));
    }

    #[test]
    fn test_cli_parse_endpoints_json() {
        let cli = Cli::try_parse_from(["helmsman", "endpoints", "--json"]).unwrap();
        match cli.command {
            Commands::Endpoints(args) => assert!(args.json),
            _ => panic!("Expected Endpoints command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["helmsman", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => assert!(args.force),
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["helmsman"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["helmsman", "select", "--frobnicate"]).is_err());
    }
}

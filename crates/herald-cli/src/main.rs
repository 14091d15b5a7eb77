//! Herald CLI - Contact-point action policy.
//!
//! Evaluates a contact-point listing for the selected Alertmanager and
//! caller, and prints which page and row actions are enabled, disabled or
//! hidden.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use herald_config::Config;
use herald_policy::{ContactPointsTab, ViewQuery};

mod commands;
mod config_bridge;
mod theme;

use commands::{ActionArg, OutputFormat, PolicyArgs, authorize, capabilities, config, evaluate};
use config_bridge::PolicyOverrides;

/// Herald - Contact-point action policy
#[derive(Parser)]
#[command(name = "herald")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use a single configuration file instead of the layered lookup
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive page and per-contact-point actions for a listing
    Evaluate {
        /// JSON array of contact points as returned by the API
        listing: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Only show contact points whose name contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Page tab: `contact_points` or `templates`
        #[arg(long)]
        tab: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Check whether one action may be attempted on one contact point
    Authorize {
        /// JSON array of contact points as returned by the API
        listing: PathBuf,

        /// Contact point name
        name: String,

        /// Action to check
        #[arg(value_enum)]
        action: ActionArg,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show what each Alertmanager flavor supports
    Capabilities {
        /// Only show this flavor
        #[arg(long)]
        flavor: Option<String>,

        /// Enable the alerting API server feature toggle
        #[arg(long)]
        alerting_api_server: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// View and validate configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
        /// Show only a specific section (e.g. alertmanager, permissions, logging)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Validate the current configuration
    Validate,
    /// Show config file paths being checked
    Paths,
}

/// Load the configuration the policy commands run with.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let workspace_root = std::env::current_dir().ok();
            Ok(Config::load(workspace_root.as_deref())
                .context("failed to load configuration")?
                .config)
        },
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref());

    // Set up logging from config, with --verbose override.
    let terminal = std::io::stderr().is_terminal();
    let log_config = if let Ok(cfg) = &loaded {
        let mut lc = config_bridge::to_log_config(cfg, terminal);
        if cli.verbose {
            "debug".clone_into(&mut lc.level);
        }
        lc
    } else {
        // Fallback if config loading fails.
        let level = if cli.verbose { "debug" } else { "warn" };
        let lc = herald_telemetry::LogConfig::new(level);
        if terminal { lc } else { lc.without_ansi() }
    };
    if let Err(e) = herald_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Evaluate {
            listing,
            policy,
            search,
            tab,
            format,
        } => {
            let query = ViewQuery::default()
                .with_tab(ContactPointsTab::from_query(tab.as_deref()))
                .with_search(search.unwrap_or_default());
            evaluate::run_evaluate(&loaded?, &PolicyOverrides::from(policy), &listing, &query, format)?;
        },
        Commands::Authorize {
            listing,
            name,
            action,
            policy,
            format,
        } => {
            let decision = authorize::decide(
                &loaded?,
                &PolicyOverrides::from(policy),
                &listing,
                &name,
                action.into(),
            )?;
            if !authorize::report(&decision, format)? {
                std::process::exit(1);
            }
        },
        Commands::Capabilities {
            flavor,
            alerting_api_server,
            format,
        } => {
            let overrides = PolicyOverrides {
                alerting_api_server,
                ..PolicyOverrides::default()
            };
            let features = config_bridge::to_feature_flags(&loaded?, &overrides);
            capabilities::show_capabilities(flavor.as_deref(), &features, format)?;
        },
        Commands::Config { command } => handle_config(command, cli.config.as_deref())?,
    }

    Ok(())
}

fn handle_config(command: ConfigCommands, path: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Show { format, section } => {
            config::show_config(path, &format, section.as_deref())
        },
        ConfigCommands::Validate => {
            if !config::validate_config(path)? {
                std::process::exit(1);
            }
            Ok(())
        },
        ConfigCommands::Paths => config::show_paths(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "herald",
            "evaluate",
            "listing.json",
            "--alertmanager",
            "mimir",
            "--grant",
            "alerting.notifications.external:read",
            "--grant",
            "alerting.notifications.external:write",
            "--tab",
            "templates",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Evaluate {
            listing,
            policy,
            tab,
            format,
            ..
        } = cli.command
        else {
            panic!("expected evaluate");
        };
        assert_eq!(listing, PathBuf::from("listing.json"));
        assert_eq!(policy.alertmanager.as_deref(), Some("mimir"));
        assert_eq!(policy.grants.len(), 2);
        assert_eq!(tab.as_deref(), Some("templates"));
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_authorize() {
        let cli = Cli::try_parse_from([
            "herald",
            "-v",
            "authorize",
            "listing.json",
            "lotsa-emails",
            "manage-permissions",
            "--license",
            "accesscontrol",
        ])
        .unwrap();
        assert!(cli.verbose);

        let Commands::Authorize {
            name,
            action,
            policy,
            format,
            ..
        } = cli.command
        else {
            panic!("expected authorize");
        };
        assert_eq!(name, "lotsa-emails");
        assert_eq!(action, ActionArg::ManagePermissions);
        assert_eq!(policy.license, vec!["accesscontrol".to_string()]);
        assert_eq!(format, OutputFormat::Pretty);
    }

    #[test]
    fn test_load_single_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herald.toml");
        std::fs::write(
            &path,
            "[alertmanager]\nname = \"ops\"\nflavor = \"prometheus\"\n",
        )
        .unwrap();

        let cfg = load_config(Some(path.as_path())).unwrap();
        assert_eq!(cfg.alertmanager.name, "ops");
        assert_eq!(cfg.alertmanager.flavor, "prometheus");

        assert!(load_config(Some(dir.path().join("missing.toml").as_path())).is_err());
    }

    #[test]
    fn test_config_flag_reaches_config_subcommands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[alertmanager]\nflavor = \"loki\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "herald",
            "config",
            "validate",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(path.as_path()));
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Validate
            }
        ));
        assert!(!config::validate_config(cli.config.as_deref()).unwrap());
    }
}

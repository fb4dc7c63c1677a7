//! depmerge CLI entry point

mod cli;

use anstream::eprintln;
use clap::{Parser, Subcommand};
use cli::style::Stylize;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter
const LOG_ENV: &str = "DEPMERGE_LOG";

/// Merge dependency update PRs from your GitHub notifications
#[derive(Parser)]
#[command(name = "depmerge", version, about, long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub Enterprise host (overrides the config file)
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Triage notifications and merge passing dependency updates (default)
    Run {
        /// Show what would be done without approving, merging, or marking read
        #[arg(long)]
        dry_run: bool,
    },
    /// Check authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Show how a notification title would be classified and merged
    Classify {
        /// Notification subject title
        title: String,
        /// Treat the PR as touching a dependency manifest
        #[arg(long)]
        manifest_changed: bool,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Verify the token and its scopes
    Test,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the default config file path
    Path,
    /// Print the effective configuration
    Show,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "depmerge=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let host = cli.host.as_deref();

    let result = match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => {
            cli::run_triage_command(config_path, host, cli::RunOptions { dry_run }).await
        }
        Commands::Auth {
            action: AuthAction::Test,
        } => cli::run_auth_test(config_path, host).await,
        Commands::Classify {
            title,
            manifest_changed,
        } => {
            cli::run_classify(&title, manifest_changed);
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => cli::run_config_path(),
            ConfigAction::Show => cli::run_config_show(config_path),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".error());
        std::process::exit(1);
    }
}

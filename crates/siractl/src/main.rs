//! Sira Control - dashboard client for the Sira instrument-tracking service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sira_common::DashboardConfig;

use siractl::{commands, logging, tui};

#[derive(Parser)]
#[command(name = "siractl")]
#[command(about = "Sira surgical-instrument tracking dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config file and environment)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Auto-refresh period in seconds
    #[arg(long, global = true)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard (default)
    Dashboard,

    /// Fetch one snapshot and print it
    Status,

    /// Resolve an active alert by id
    Resolve {
        /// Alert id as shown in the alerts section
        id: u64,
    },

    /// Probe every backend endpoint and report health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(interval) = cli.interval {
        config.refresh_secs = interval;
    }

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => {
            logging::init(true)?;
            tui::run(config).await
        }
        Commands::Status => {
            logging::init(false)?;
            commands::status(&config).await
        }
        Commands::Resolve { id } => {
            logging::init(false)?;
            commands::resolve(&config, id).await
        }
        Commands::Doctor => {
            logging::init(false)?;
            commands::doctor(&config).await
        }
    }
}

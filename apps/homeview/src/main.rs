//! homeview - Real-estate sales dashboard
//!
//! Serves the dashboard over HTTP, or prints its parts in the terminal.

mod commands;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use homeview_core::DashboardConfig;

/// Real-estate sales dashboard
#[derive(Parser, Debug)]
#[command(name = "homeview", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `homeview_core=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the data and serve the dashboard
    Serve {
        /// Listen address (overrides config and HOMEVIEW_ADDR)
        #[arg(short, long)]
        addr: Option<SocketAddr>,
    },

    /// Evaluate the ten hypotheses
    Hypotheses {
        /// Show a single hypothesis with its chart data, e.g. `h3`
        #[arg(long)]
        id: Option<String>,
    },

    /// Print the filtered buy and sell reports
    Reports {
        /// Comma separated zip codes
        #[arg(long)]
        zipcode: Option<String>,

        /// Comma separated condition ratings
        #[arg(long)]
        condition: Option<String>,

        /// Filter expression, e.g. `price < 500000`
        #[arg(long)]
        filter: Option<String>,

        /// Only this report (`buy` or `sell`)
        #[arg(long)]
        kind: Option<String>,

        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
    },

    /// Run the feature deriver over the listings
    Derive {
        /// Write the augmented listings to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = DashboardConfig::load(cli.config.as_deref())?;
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Command::Serve { addr } => commands::serve(config, addr).await,
        Command::Hypotheses { id } => commands::hypotheses(&config, id.as_deref()),
        Command::Reports {
            zipcode,
            condition,
            filter,
            kind,
            csv,
        } => {
            let query = homeview_core::DashboardQuery {
                zipcode,
                condition,
                filter,
            };
            commands::reports(&config, &query, kind.as_deref(), csv)
        }
        Command::Derive { output } => commands::derive(&config, output.as_deref()),
    }
}

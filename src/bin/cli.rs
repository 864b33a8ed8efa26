//! quakefeed CLI
//!
//! Runs the HTTP API or a single query against the live feed.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use quakefeed::{
    api,
    error::{AppError, Result},
    models::Config,
    services::{EarthquakeFeed, FeedClient, LogObserver},
};
use serde::Serialize;
use tokio::net::TcpListener;

/// quake - today's earthquakes from the USGS feed
#[derive(Parser, Debug)]
#[command(name = "quake", version, about = "Derived views over today's USGS earthquake feed")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Listen address (default: server.bind from config)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the most recent earthquake today
    Latest,

    /// Print the largest earthquake today
    Biggest,

    /// Print today's earthquakes above a magnitude
    BiggerThan {
        #[arg(allow_negative_numbers = true)]
        threshold: f64,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging from the verbosity flag or the configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    log::info!("Loaded configuration from {}", cli.config.display());

    if let Command::Serve { bind: Some(bind) } = &cli.command {
        config.server.bind = bind.clone();
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let feed = FeedClient::new(&config.feed)?.with_observer(Arc::new(LogObserver));

    match cli.command {
        Command::Serve { .. } => {
            let addr = config.server.bind_addr()?;
            let listener = TcpListener::bind(addr).await?;
            log::info!("Listening on {}", listener.local_addr()?);
            api::serve(listener, Arc::new(feed), shutdown_signal()).await?;
        }

        Command::Latest => print_json(&feed.latest().await?)?,

        Command::Biggest => print_json(&feed.biggest().await?)?,

        Command::BiggerThan { threshold } => {
            if !threshold.is_finite() {
                return Err(AppError::validation(format!(
                    "Invalid threshold: {threshold}"
                )));
            }
            print_json(&feed.bigger_than(threshold).await?)?;
        }

        Command::Validate => {
            log::info!("✓ Config OK");
            log::info!("Feed: {}", config.feed.base_url);
            log::info!(
                "Timeouts: {}s request, {}s connect",
                config.feed.timeout_secs,
                config.feed.connect_timeout_secs
            );
            log::info!("Bind: {}", config.server.bind);
        }
    }

    Ok(())
}

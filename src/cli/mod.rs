//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod find;
pub mod history;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Find the closest city by driving distance within a radius
#[derive(Parser)]
#[command(name = "closest-city")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the closest city to an anchor
    Find(find::FindArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// View and manage search history
    History(history::HistoryArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Find(args) => find::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::History(args) => history::run(args),
    }
}

/// Install the stderr tracing subscriber, honouring `RUST_LOG`
pub(crate) fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

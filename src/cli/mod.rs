//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod locate;
pub mod search;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};

/// Location resolution gateway for a city-scoped marketplace
#[derive(Parser)]
#[command(name = "city-locator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show gateway status
    Status(status::StatusArgs),

    /// Search for a place through a running gateway
    Search(search::SearchArgs),

    /// Resolve the current city, or the place at a coordinate
    Locate(locate::LocateArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
        Commands::Search(args) => search::run(args).await,
        Commands::Locate(args) => locate::run(args).await,
    }
}

//! Meete backend server
//!
//! Loads configuration, wires the container and serves every handler
//! group found under `routing.package`.

// Force-link meete-providers so its linkme registrations are included
extern crate meete_providers;

use clap::Parser;
use meete_server::run_server;

/// Command line interface for the Meete backend
#[derive(Parser, Debug)]
#[command(name = "meete")]
#[command(about = "Meete - classroom attendance and messaging backend")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run_server(cli.config.as_deref()).await
}

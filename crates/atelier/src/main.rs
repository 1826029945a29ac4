//! Atelier CLI - batch host for the photo ingestion pipeline.
//!
//! Ingests photos from disk through the portfolio pipeline (EXIF extraction,
//! transcoding, storage placement) and emits the resulting catalog records
//! as JSON lines for the portfolio application to import.
//!
//! # Usage
//!
//! ```bash
//! # Ingest a single photo
//! atelier ingest photo.jpg --title "Morning fog"
//!
//! # Bulk-ingest a directory
//! atelier ingest ./shoot-2024-03/ --output records.jsonl
//!
//! # Remove a stored asset (both renditions)
//! atelier remove 1712000000000-dsc-1234.jpg
//!
//! # View configuration
//! atelier config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Atelier - photo ingestion pipeline for a photography portfolio.
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest photos: extract EXIF, transcode, place in storage
    Ingest(cli::ingest::IngestArgs),

    /// Remove a stored asset and its thumbnail
    Remove(cli::remove::RemoveArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match atelier_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `atelier config path`."
            );
            atelier_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Atelier v{}", atelier_core::VERSION);

    match cli.command {
        Commands::Ingest(args) => cli::ingest::execute(args, config).await,
        Commands::Remove(args) => cli::remove::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

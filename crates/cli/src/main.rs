//! # Bazaar CLI
//!
//! Command-line interface for the Bazaar backend.
//!
//! ## Usage
//!
//! ```bash
//! bazaar serve     # Start the API server
//! bazaar validate  # Verify environment configuration
//! bazaar --help    # Show help
//! ```

use clap::{CommandFactory as _, Parser};
use error::Result;

mod commands;
mod config;
mod server;

use commands::Commands;

/// Bazaar - e-commerce platform backend
#[derive(Parser, Debug)]
#[command(name = "bazaar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "BAZAAR_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Optional file to append logs to
    #[arg(long, env = "BAZAAR_LOG_FILE")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Bazaar CLI starting...");

    match cli.command {
        Commands::Serve(args) => server::serve(&args).await?,
        Commands::Completions(args) => commands::completions::completions(args.shell, &mut Cli::command())?,
        Commands::Validate => commands::validate::validate()?,
    }

    logging::info!(target: "app", "Bazaar CLI completed successfully");
    Ok(())
}

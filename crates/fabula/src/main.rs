//! Fabula CLI binary.
//!
//! This binary provides command-line access to Fabula's story engine:
//! - Start a story from a premise
//! - Continue a stored story by picking a choice
//! - Show or list stored stories

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, report_error, run_command};

    // Load GEMINI_API_KEY and friends from .env when present
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    let telemetry = cli.telemetry;

    if telemetry {
        fabula::init_telemetry(log_level)?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Execute the requested command
    let outcome = run_command(cli).await;

    if telemetry {
        fabula::shutdown_telemetry();
    }

    if let Err(err) = outcome {
        report_error(&err);
        std::process::exit(1);
    }

    Ok(())
}

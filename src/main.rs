//! lockage CLI entry point.
//!
//! Parses arguments, wires up logging, runs the report pipeline, and turns
//! fatal errors into a single user-friendly diagnostic with exit code 1.

use anyhow::Result;
use clap::Parser;
use lockage::cli::Cli;
use lockage::core::user_friendly_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // RUST_LOG wins over the CLI verbosity flags when set.
    let filter = if std::env::var("RUST_LOG").is_ok() {
        Some(EnvFilter::from_default_env())
    } else {
        cli.log_filter().map(EnvFilter::new)
    };
    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}

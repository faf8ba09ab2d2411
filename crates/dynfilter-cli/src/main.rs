//! Dynfilter CLI binary.

use anyhow::Result;
use dynfilter_cli::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the dynfilter CLI.
///
/// Uses tokio's current_thread runtime; the only I/O is reading a few files.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the resolved JSON.
    // Example: RUST_LOG=dynfilter=trace dynfilter resolve filter.json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dynfilter=info,dynfilter_cli=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting dynfilter CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Dynfilter CLI completed successfully");
    Ok(())
}

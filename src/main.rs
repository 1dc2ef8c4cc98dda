use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use simrun::cli::Cli;
use simrun::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling and logging
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let outcome = cli.into_scenario()?.run().await?;

    debug!("simrun exiting, success: {}", outcome.success);
    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}

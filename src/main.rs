//! Meteo Ingest CLI
//!
//! Provides commands for:
//! - `serve`: run the HTTP trigger service
//! - `init-schema`: create the observation tables and key indexes
//! - `ingest`: run one fetch-then-store cycle from the command line

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use meteo_ingest::cli::{Cli, Commands};
use meteo_ingest::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("meteo_ingest=info".parse()?))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            meteo_ingest::cli::serve::execute(settings).await?;
        }
        Commands::InitSchema => {
            meteo_ingest::cli::schema::execute(settings).await?;
        }
        Commands::Ingest(args) => {
            meteo_ingest::cli::ingest::execute(settings, args).await?;
        }
    }

    Ok(())
}

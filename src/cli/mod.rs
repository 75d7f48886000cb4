//! Command-line interface.

pub mod ingest;
pub mod schema;
pub mod serve;

use clap::{Parser, Subcommand};

/// Meteo Ingest CLI
#[derive(Parser)]
#[command(name = "meteo-ingest")]
#[command(about = "Ingest Open-Meteo weather and air-quality series into PostgreSQL")]
#[command(version)]
pub struct Cli {
    /// Path to a config file (defaults to `meteo-ingest.*` in the working
    /// directory, merged with `METEO_INGEST__*` environment variables)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP trigger service
    Serve,
    /// Create the observation tables, key indexes, and place registry
    InitSchema,
    /// Run one ingest cycle from the command line
    Ingest(ingest::IngestArgs),
}

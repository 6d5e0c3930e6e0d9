use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a trip plan file and print the full diagnostic report
    Validate(ValidateArgs),
    /// Merge local modifications into a trip plan and write the export artifact
    Export(ExportArgs),
    /// Enrich a trip plan's activities with stable place identifiers
    Enrich(EnrichArgs),
    /// List trips available at a trip index endpoint
    Trips(TripsArgs),
    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Trip plan JSON file (bare document or { tripData: ... } envelope)
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Trip plan JSON file to merge and export
    pub file: PathBuf,

    /// Directory to write the export artifact into (defaults to the
    /// input file's directory)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Data directory holding persisted user modifications
    #[arg(long, env = "WANDERLOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct EnrichArgs {
    /// Trip plan JSON file to rewrite in place
    pub file: PathBuf,

    /// Base URL of the place-search API
    #[arg(long, env = "WANDERLOG_PLACES_URL")]
    pub api_base: String,

    /// API key for the place-search API
    #[arg(long, env = "WANDERLOG_PLACES_KEY")]
    pub api_key: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TripsArgs {
    /// Base URL serving trip documents and index.json
    #[arg(long, env = "WANDERLOG_TRIPS_URL")]
    pub base_url: String,
}

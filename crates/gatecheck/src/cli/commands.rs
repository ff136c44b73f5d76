//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Catalog command arguments.
#[derive(Debug, Args)]
pub struct CatalogCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Validate command arguments.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Path to a JSON file mapping question keys to answers
    pub file: PathBuf,

    /// Remarks text to validate alongside the answers
    #[arg(short, long, default_value = "")]
    pub remarks: String,
}

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Path to a JSON file mapping question keys to answers
    pub file: PathBuf,

    /// Remarks text (must exceed 5 characters)
    #[arg(short, long)]
    pub remarks: String,

    /// Staff number of the submitter
    #[arg(long)]
    pub staff_number: String,

    /// Staff name of the submitter
    #[arg(long)]
    pub staff_name: String,

    /// Fleet number of the inspected vehicle
    #[arg(long)]
    pub fleet_number: String,

    /// Latitude of the last known location fix
    #[arg(long)]
    pub latitude: f64,

    /// Longitude of the last known location fix
    #[arg(long)]
    pub longitude: f64,

    /// Bearer credential for the backend
    #[arg(long)]
    pub token: String,
}

/// Records command arguments.
#[derive(Debug, Args)]
pub struct RecordsCommand {
    /// Bearer credential for the backend
    #[arg(long)]
    pub token: String,

    /// Filter by staff number
    #[arg(short, long)]
    pub staff: Option<String>,

    /// Filter by submission date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

//! Command-line interface for gatecheck.
//!
//! This module provides the CLI structure and command handlers for the
//! `gatecheck` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CatalogCommand, ConfigCommand, RecordsCommand, SubmitCommand, ValidateCommand,
};

/// gatecheck - Capture and submit vehicle inspection forms
///
/// Answers a structured questionnaire about a vehicle's condition and
/// submits a timestamped, geotagged record to the inspection backend.
#[derive(Debug, Parser)]
#[command(name = "gatecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the inspection questionnaire
    Catalog(CatalogCommand),

    /// Check a draft answer file against the completion rules
    Validate(ValidateCommand),

    /// Submit a completed inspection form
    Submit(SubmitCommand),

    /// List previously submitted inspection records
    Records(RecordsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

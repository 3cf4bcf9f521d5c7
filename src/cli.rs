//! Command-line interface definitions.
//!
//! This module defines all CLI arguments, subcommands, and options using the
//! clap derive API, with global options (verbosity) and one subcommand per
//! pass.
//!
//! # Example
//!
//! ```bash
//! # Find duplicate photos under a library root
//! phototriage dedupe ~/Pictures
//!
//! # Machine-readable duplicate mapping
//! phototriage dedupe ~/Pictures --output json
//!
//! # Capture-time extraction with the snapshot cache
//! phototriage timestamps ~/Pictures
//!
//! # Force a fresh extraction pass
//! phototriage timestamps ~/Pictures --refresh
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Personal photo-library triage toolkit.
///
/// Crawls a directory tree of photos and videos, extracts capture timestamps,
/// and groups files into likely duplicates using cheap metadata fingerprints
/// that escalate to pixel sampling only when needed.
#[derive(Debug, Parser)]
#[command(name = "phototriage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find likely-duplicate photos under a directory
    Dedupe(DedupeArgs),
    /// Extract capture timestamps for every file under a directory
    Timestamps(TimestampArgs),
}

/// Arguments for the dedupe subcommand.
#[derive(Debug, Args)]
pub struct DedupeArgs {
    /// Directory to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format for the duplicate mapping
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the timestamps subcommand.
#[derive(Debug, Args)]
pub struct TimestampArgs {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Ignore any existing snapshot and re-run the extraction pass
    #[arg(long)]
    pub refresh: bool,

    /// Skip the regeneration prompt when the snapshot is missing
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Path to the snapshot cache file
    ///
    /// If not specified, the configured or platform-specific default is used.
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,
}

/// Output format for the duplicate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable groups
    Text,
    /// JSON for scripting and the external review UI
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

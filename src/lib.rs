//! phototriage - Personal Photo-Library Triage
//!
//! Crawls a directory tree of photos and videos, extracts capture timestamps
//! and file metadata, and groups files into likely duplicates with a
//! two-phase, cost-aware fingerprinting pipeline: cheap metadata buckets
//! first, pixel-level comparison only where coarse buckets collide and
//! capture times fail to corroborate the match.

pub mod cache;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod scanner;
pub mod timestamps;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use cache::Snapshot;
use cli::{Cli, Commands, DedupeArgs, OutputFormat, TimestampArgs};
use config::Config;
use duplicates::{DuplicateFinder, FinderConfig};
use error::ExitCode;
use progress::Progress;
use timestamps::MethodTimings;

/// Run the application with parsed CLI arguments, returning the exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Dedupe(args) => run_dedupe(&args, cli.quiet),
        Commands::Timestamps(args) => run_timestamps(&args, cli.quiet),
    }
}

/// Drive the two-phase duplicate pipeline and print the mapping.
fn run_dedupe(args: &DedupeArgs, quiet: bool) -> Result<ExitCode> {
    let progress = Arc::new(Progress::new(quiet));
    let finder = DuplicateFinder::new(FinderConfig::default().with_progress(progress));

    let outcome = finder
        .find_duplicates(&args.path)
        .with_context(|| format!("Duplicate scan failed for {}", args.path.display()))?;

    match args.output {
        OutputFormat::Text => output::print_duplicates_text(&outcome),
        OutputFormat::Json => output::print_duplicates_json(&outcome)?,
    }

    if outcome.groups.is_empty() {
        Ok(ExitCode::NoDuplicates)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Drive the capture-time extraction pass, going through the snapshot cache.
fn run_timestamps(args: &TimestampArgs, quiet: bool) -> Result<ExitCode> {
    run_timestamps_with(args, quiet, prompt::yes_no)
}

/// [`run_timestamps`] with the confirmation step injected, so the decline
/// path can be exercised without a terminal.
fn run_timestamps_with<F>(args: &TimestampArgs, quiet: bool, mut confirm: F) -> Result<ExitCode>
where
    F: FnMut(&str) -> std::io::Result<bool>,
{
    let config = Config::load();
    let snapshot_path = args
        .cache
        .clone()
        .unwrap_or_else(|| config.snapshot_path());

    let mut timings: Option<MethodTimings> = None;

    let snapshot = match load_usable_snapshot(&snapshot_path, &args.path, args.refresh) {
        Some(snapshot) => {
            log::info!("Using snapshot from {}", snapshot_path.display());
            snapshot
        }
        None => {
            if !args.refresh && !args.yes {
                let question = format!(
                    "No timestamp snapshot at {}. Scan {} now? [y/n]",
                    snapshot_path.display(),
                    args.path.display()
                );
                if !confirm(&question)? {
                    println!("Aborted.");
                    return Ok(ExitCode::Success);
                }
            }

            let progress = Progress::new(quiet);
            let report = timestamps::collect_capture_times(&args.path, &progress)
                .with_context(|| format!("Timestamp scan failed for {}", args.path.display()))?;
            timings = Some(report.timings);

            let snapshot = Snapshot::new(&args.path, report);
            if let Err(e) = snapshot.save(&snapshot_path) {
                // Persistence is an optimization; the report still prints
                log::warn!("Could not save snapshot to {}: {:#}", snapshot_path.display(), e);
            }
            snapshot
        }
    };

    output::print_timestamp_report(&snapshot, timings.as_ref());
    Ok(ExitCode::Success)
}

/// Load the snapshot if it exists, verifies, and matches this root.
fn load_usable_snapshot(snapshot_path: &Path, root: &Path, refresh: bool) -> Option<Snapshot> {
    if refresh || !snapshot_path.exists() {
        return None;
    }

    match Snapshot::load(snapshot_path) {
        Ok(snapshot) if snapshot.matches_root(root) => Some(snapshot),
        Ok(snapshot) => {
            log::warn!(
                "Snapshot at {} is for {}, not {}; regenerating",
                snapshot_path.display(),
                snapshot.root.display(),
                root.display()
            );
            None
        }
        Err(e) => {
            log::warn!(
                "Snapshot at {} unusable ({:#}); regenerating",
                snapshot_path.display(),
                e
            );
            None
        }
    }
}

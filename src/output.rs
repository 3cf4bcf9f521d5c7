//! Console output for scan results.
//!
//! The duplicate mapping printed here is the crate's terminal output; the
//! external review UI consumes the JSON form and calls back into
//! [`crate::scanner::metadata::pretty`] per path.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Datelike;

use crate::cache::Snapshot;
use crate::duplicates::DedupeOutcome;
use crate::scanner::metadata;
use crate::timestamps::MethodTimings;

/// Print the duplicate mapping as human-readable groups, followed by run
/// statistics.
pub fn print_duplicates_text(outcome: &DedupeOutcome) {
    for (index, group) in outcome.groups.iter().enumerate() {
        println!("[{}] {}", index + 1, group.fingerprint);
        for path in &group.paths {
            println!("    {}", path.display());
            for line in metadata::pretty(path).lines() {
                println!("        {line}");
            }
        }
    }

    let stats = &outcome.stats;
    println!();
    println!(
        "Scanned {} files ({} unreadable, {} skipped on errors)",
        stats.scanned_files, stats.unreadable_files, stats.scan_errors
    );
    println!(
        "{} coarse-collision groups: {} confirmed by capture time, {} refined by pixel sampling",
        stats.coarse_groups, stats.short_circuit_groups, stats.escalated_groups
    );
    println!("Identified {} duplicate groups", outcome.groups.len());
}

/// Print the duplicate mapping as JSON for the external review UI.
pub fn print_duplicates_json(outcome: &DedupeOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(&outcome.groups)?;
    println!("{json}");
    Ok(())
}

/// Print the timestamp-extraction summary.
///
/// `timings` is only available when the pass actually ran this invocation;
/// a snapshot loaded from cache has no cost breakdown to report.
pub fn print_timestamp_report(snapshot: &Snapshot, timings: Option<&MethodTimings>) {
    let missing: Vec<_> = snapshot
        .records
        .iter()
        .filter(|r| r.capture_time.is_none())
        .collect();

    if !missing.is_empty() {
        println!("Files without timestamps:");
        for record in &missing {
            println!("    {}", record.path.display());
        }
        println!();
    }

    println!(
        "Found {} lone sidecar files.\n{} images had corresponding sidecar files.",
        snapshot.lone_sidecars.len(),
        snapshot.sidecar_map.len()
    );
    println!(
        "Found {} files.\n{} did not have timestamps.",
        snapshot.records.len(),
        missing.len()
    );

    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for record in &snapshot.records {
        if let Some(ts) = record.capture_time {
            *months.entry((ts.year(), ts.month())).or_default() += 1;
        }
    }

    if !months.is_empty() {
        println!();
        for ((year, month), count) in &months {
            println!("{year:04}-{month:02}: {count}");
        }
    }

    if let Some(timings) = timings {
        println!();
        println!(
            "Extraction cost: image EXIF {:.2}s, video probe {:.2}s, container EXIF {:.2}s",
            timings.image_exif.as_secs_f64(),
            timings.video_probe.as_secs_f64(),
            timings.container_exif.as_secs_f64()
        );
    }
}

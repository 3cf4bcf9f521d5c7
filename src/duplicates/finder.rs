//! Duplicate finder with two-phase, cost-aware detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//!
//! 1. **Phase 1 - Coarse grouping**: every file gets a cheap fingerprint from
//!    filesize + dimensions + format; only fingerprints shared by 2+ files
//!    survive.
//! 2. **Phase 2 - Escalation**: a coarse group whose members all carry the
//!    same capture time is accepted as-is, with no pixel work. Groups that
//!    fail that check are re-described with pixel sampling and re-grouped by
//!    the fine fingerprint.
//!
//! Each phase fully consumes one collection and produces the next; there is
//! no shared mutable map across files. The fine-describe step is a parameter
//! of [`phase2_refine`] so tests can verify the short-circuit really skips
//! pixel sampling.
//!
//! # Example
//!
//! ```no_run
//! use phototriage::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let outcome = finder.find_duplicates(Path::new("/photos"))?;
//! for group in &outcome.groups {
//!     println!("{}: {} copies", group.fingerprint, group.len());
//! }
//! # Ok::<(), phototriage::duplicates::FinderError>(())
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::progress::ProgressCallback;
use crate::scanner::{metadata, FileDescriptor, ScanError, Walker};

use super::fingerprint::{self, Fingerprint};
use super::groups::{filter_actionable, group_by_fingerprint, DuplicateGroup};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Optional progress callback.
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl FinderConfig {
    /// Set the progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }
}

/// Counters describing one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupeStats {
    /// Files scanned in Phase 1
    pub scanned_files: usize,
    /// Files that degraded to the minimal descriptor
    pub unreadable_files: usize,
    /// Traversal/stat errors skipped over
    pub scan_errors: usize,
    /// Coarse groups with 2+ members
    pub coarse_groups: usize,
    /// Coarse groups accepted on capture-time agreement alone
    pub short_circuit_groups: usize,
    /// Coarse groups that required pixel-level refinement
    pub escalated_groups: usize,
    /// Files re-described with pixel sampling
    pub refined_files: usize,
    /// Confirmed duplicate groups after Phase 2
    pub confirmed_groups: usize,
}

/// Errors that can abort a finder run.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan root is not a directory.
    #[error("Scan root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A scan error that could not be recovered from.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Final output of a pipeline run: the confirmed duplicate mapping plus
/// run statistics.
#[derive(Debug, Clone, Default)]
pub struct DedupeOutcome {
    /// Confirmed duplicate groups, sorted by fingerprint for stable output.
    pub groups: Vec<DuplicateGroup>,
    /// Run counters.
    pub stats: DedupeStats,
}

/// Two-phase duplicate finder.
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Run the full pipeline over a directory tree.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NotADirectory`] for a bad root. Per-file
    /// errors degrade or are skipped, never abort.
    pub fn find_duplicates(&self, root: &Path) -> Result<DedupeOutcome, FinderError> {
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.to_path_buf()));
        }

        let mut stats = DedupeStats::default();

        let coarse_groups = self.phase1_coarse(root, &mut stats);
        log::info!(
            "Phase 1: {} files -> {} coarse-collision groups",
            stats.scanned_files,
            stats.coarse_groups
        );

        let confirmed = phase2_refine(
            coarse_groups,
            |path| metadata::describe(path, true),
            self.config.progress.as_deref(),
            &mut stats,
        );
        log::info!(
            "Phase 2: {} short-circuited, {} escalated, {} confirmed",
            stats.short_circuit_groups,
            stats.escalated_groups,
            stats.confirmed_groups
        );

        let mut groups: Vec<DuplicateGroup> = confirmed
            .into_iter()
            .map(|(fingerprint, members)| DuplicateGroup {
                fingerprint,
                paths: members.into_iter().map(|m| m.path).collect(),
            })
            .collect();
        groups.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));

        Ok(DedupeOutcome { groups, stats })
    }

    /// Phase 1: walk the tree, describe each file cheaply, group by coarse
    /// fingerprint and keep only collisions.
    fn phase1_coarse(
        &self,
        root: &Path,
        stats: &mut DedupeStats,
    ) -> HashMap<Fingerprint, Vec<FileDescriptor>> {
        if let Some(ref callback) = self.config.progress {
            callback.on_phase_start("scan", None);
        }

        let walker = Walker::new(root);
        let mut pairs: Vec<(Fingerprint, FileDescriptor)> = Vec::new();

        for entry in walker.walk() {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    log::warn!("Skipping during scan: {}", e);
                    stats.scan_errors += 1;
                    continue;
                }
            };

            if let Some(ref callback) = self.config.progress {
                callback.on_progress(&path.to_string_lossy());
            }

            let desc = match metadata::describe(&path, false) {
                Ok(desc) => desc,
                Err(e) => {
                    log::warn!("Cannot stat {}: {}", path.display(), e);
                    stats.scan_errors += 1;
                    continue;
                }
            };

            stats.scanned_files += 1;
            let fp = if desc.is_degraded() {
                stats.unreadable_files += 1;
                fingerprint::degraded(&desc)
            } else {
                fingerprint::coarse(&desc)
            };
            pairs.push((fp, desc));
        }

        if let Some(ref callback) = self.config.progress {
            callback.on_phase_end("scan");
        }

        let (actionable, grouping) = filter_actionable(group_by_fingerprint(pairs));
        stats.coarse_groups = grouping.actionable_groups;
        actionable
    }
}

/// Phase 2: apply the escalation policy to each coarse-collision group.
///
/// A group whose members all carry the *same, present* capture time is
/// accepted without any pixel work; capture-time agreement is treated as
/// sufficient corroborating evidence. Disagreeing or missing timestamps
/// escalate the group: each member is re-described by `describe_fine`
/// (pixel sampling included) and re-grouped by its fine fingerprint. A
/// member that fails re-description degrades, exactly like an unreadable
/// file in Phase 1.
///
/// Both accepted and refined groups land in one output map, which is then
/// filtered back down to entries with 2+ members.
pub fn phase2_refine<F>(
    coarse_groups: HashMap<Fingerprint, Vec<FileDescriptor>>,
    mut describe_fine: F,
    progress: Option<&dyn ProgressCallback>,
    stats: &mut DedupeStats,
) -> HashMap<Fingerprint, Vec<FileDescriptor>>
where
    F: FnMut(&Path) -> Result<FileDescriptor, ScanError>,
{
    if let Some(callback) = progress {
        callback.on_phase_start("refine", Some(coarse_groups.len()));
    }

    let mut pairs: Vec<(Fingerprint, FileDescriptor)> = Vec::new();

    for (fingerprint, members) in coarse_groups {
        if let Some(callback) = progress {
            callback.on_progress(fingerprint.as_str());
        }

        if capture_times_agree(&members) {
            log::debug!(
                "Accepting group {} on capture-time agreement ({} members)",
                fingerprint,
                members.len()
            );
            stats.short_circuit_groups += 1;
            pairs.extend(members.into_iter().map(|m| (fingerprint.clone(), m)));
            continue;
        }

        stats.escalated_groups += 1;
        for member in members {
            stats.refined_files += 1;
            let refined = match describe_fine(&member.path) {
                Ok(desc) => desc,
                Err(e) => {
                    log::warn!("Cannot refine {}: {}", member.path.display(), e);
                    FileDescriptor::degraded(member.path.clone(), member.filesize)
                }
            };
            let fp = fingerprint::fine(&refined);
            pairs.push((fp, refined));
        }
    }

    if let Some(callback) = progress {
        callback.on_phase_end("refine");
    }

    let (confirmed, _) = filter_actionable(group_by_fingerprint(pairs));
    stats.confirmed_groups = confirmed.len();
    confirmed
}

/// Whether every member carries the same, present capture time.
///
/// Missing timestamps never corroborate a match: any absent value forces
/// escalation.
fn capture_times_agree(members: &[FileDescriptor]) -> bool {
    let mut times = members.iter().map(|m| m.capture_time);
    let Some(Some(first)) = times.next() else {
        return false;
    };
    times.all(|t| t == Some(first))
}

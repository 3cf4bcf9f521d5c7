//! Fingerprint grouping.
//!
//! # Overview
//!
//! Pure grouping layer shared by both phases of the pipeline: a sequence of
//! `(fingerprint, descriptor)` pairs becomes a map fingerprint -> descriptors
//! in first-seen order, and a filter keeps only the actionable entries (two
//! or more members). Both operations are order-stable and idempotent;
//! re-running them on the same input yields identical groupings.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::FileDescriptor;

use super::Fingerprint;

/// A confirmed duplicate set: one fingerprint, two or more paths.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// The shared fingerprint.
    pub fingerprint: Fingerprint,
    /// Member paths in first-seen order.
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of member files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Statistics from a grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total descriptors that entered the pass
    pub total_files: usize,
    /// Distinct fingerprints seen
    pub distinct_fingerprints: usize,
    /// Groups with 2+ members
    pub actionable_groups: usize,
    /// Files inside actionable groups
    pub potential_duplicates: usize,
}

/// Group descriptors by fingerprint, preserving first-seen member order.
pub fn group_by_fingerprint(
    pairs: impl IntoIterator<Item = (Fingerprint, FileDescriptor)>,
) -> HashMap<Fingerprint, Vec<FileDescriptor>> {
    let mut groups: HashMap<Fingerprint, Vec<FileDescriptor>> = HashMap::new();
    for (fingerprint, desc) in pairs {
        groups.entry(fingerprint).or_default().push(desc);
    }
    groups
}

/// Keep only entries with 2+ members, returning the filtered map and stats.
///
/// Filtering an already-filtered map yields the same map.
pub fn filter_actionable(
    groups: HashMap<Fingerprint, Vec<FileDescriptor>>,
) -> (HashMap<Fingerprint, Vec<FileDescriptor>>, GroupingStats) {
    let mut stats = GroupingStats {
        distinct_fingerprints: groups.len(),
        ..Default::default()
    };

    let mut filtered: HashMap<Fingerprint, Vec<FileDescriptor>> = HashMap::new();
    for (fingerprint, members) in groups {
        stats.total_files += members.len();
        if members.len() > 1 {
            stats.actionable_groups += 1;
            stats.potential_duplicates += members.len();
            filtered.insert(fingerprint, members);
        } else {
            log::trace!("Eliminated singleton fingerprint {}", fingerprint);
        }
    }

    (filtered, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::fingerprint;
    use std::path::Path;

    fn desc(path: &str, filesize: u64) -> FileDescriptor {
        FileDescriptor {
            path: Path::new(path).to_path_buf(),
            filesize,
            dimensions: Some((10, 10)),
            format: Some("JPEG".to_string()),
            capture_time: None,
            pixels: None,
        }
    }

    fn pairs(descs: Vec<FileDescriptor>) -> Vec<(Fingerprint, FileDescriptor)> {
        descs
            .into_iter()
            .map(|d| (fingerprint::coarse(&d), d))
            .collect()
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let groups = group_by_fingerprint(pairs(vec![
            desc("/a.jpg", 100),
            desc("/b.jpg", 100),
            desc("/c.jpg", 100),
        ]));

        assert_eq!(groups.len(), 1);
        let members = groups.values().next().unwrap();
        let paths: Vec<_> = members.iter().map(|m| m.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("/a.jpg").to_path_buf(),
                Path::new("/b.jpg").to_path_buf(),
                Path::new("/c.jpg").to_path_buf()
            ]
        );
    }

    #[test]
    fn test_filter_keeps_only_actionable() {
        let groups = group_by_fingerprint(pairs(vec![
            desc("/a.jpg", 100),
            desc("/b.jpg", 100),
            desc("/solo.jpg", 999),
        ]));

        let (filtered, stats) = filter_actionable(groups);

        assert_eq!(filtered.len(), 1);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.distinct_fingerprints, 2);
        assert_eq!(stats.actionable_groups, 1);
        assert_eq!(stats.potential_duplicates, 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let groups = group_by_fingerprint(pairs(vec![
            desc("/a.jpg", 100),
            desc("/b.jpg", 100),
            desc("/solo.jpg", 999),
        ]));

        let (once, _) = filter_actionable(groups);
        let reference = once.clone();
        let (twice, stats) = filter_actionable(once);

        assert_eq!(twice, reference);
        assert_eq!(stats.actionable_groups, 1);
        assert_eq!(stats.total_files, stats.potential_duplicates);
    }

    #[test]
    fn test_rerunning_yields_identical_groupings() {
        let make = || {
            group_by_fingerprint(pairs(vec![
                desc("/a.jpg", 100),
                desc("/b.jpg", 100),
                desc("/c.jpg", 200),
            ]))
        };
        assert_eq!(make(), make());
    }
}

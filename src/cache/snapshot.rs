//! Snapshot persistence with integrity checking.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::timestamps::{CaptureRecord, ExtractionReport};

/// Current version of the snapshot file format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Envelope for snapshot files to include integrity checks.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEnvelope {
    /// SHA256 checksum of the serialized snapshot data.
    checksum: String,
    /// The actual snapshot data.
    snapshot: Snapshot,
}

/// Persisted output of one timestamp-extraction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u32,
    /// When the snapshot was created.
    pub created_at: DateTime<Utc>,
    /// Root path the pass was run over.
    pub root: PathBuf,
    /// One record per scanned file.
    pub records: Vec<CaptureRecord>,
    /// Sidecars with no base-name sibling.
    pub lone_sidecars: Vec<PathBuf>,
    /// Image path -> sidecar path pairings.
    pub sidecar_map: BTreeMap<PathBuf, PathBuf>,
}

impl Snapshot {
    /// Build a snapshot from a finished extraction pass.
    #[must_use]
    pub fn new(root: &Path, report: ExtractionReport) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            created_at: Utc::now(),
            root: root.to_path_buf(),
            records: report.records,
            lone_sidecars: report.lone_sidecars,
            sidecar_map: report.sidecar_map,
        }
    }

    /// Whether this snapshot was produced for the given root.
    #[must_use]
    pub fn matches_root(&self, root: &Path) -> bool {
        self.root == root
    }

    /// Saves the snapshot to a file with an integrity checksum.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        let json = self.to_json()?;
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create snapshot file: {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write snapshot to: {}", path.display()))?;
        Ok(())
    }

    /// Serializes the snapshot to a JSON string with an integrity checksum.
    pub fn to_json(&self) -> Result<String> {
        // Serialize the snapshot alone first to get the data to hash
        let snapshot_json = serde_json::to_string(&self)
            .context("Failed to serialize snapshot for checksum calculation")?;

        let mut hasher = Sha256::new();
        hasher.update(snapshot_json.as_bytes());
        let checksum = format!("{:x}", hasher.finalize());

        let envelope = SnapshotEnvelope {
            checksum,
            snapshot: self.clone(),
        };

        let final_json = serde_json::to_string_pretty(&envelope)
            .context("Failed to serialize snapshot envelope")?;

        Ok(final_json)
    }

    /// Loads a snapshot from a file and verifies its integrity.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

        let envelope: SnapshotEnvelope = serde_json::from_str(&content).context(
            "Failed to parse snapshot envelope. The file might be corrupted or in an old format.",
        )?;

        // Re-serialize to verify the checksum; MUST use the same (compact)
        // serialization settings as to_json
        let snapshot_json = serde_json::to_string(&envelope.snapshot)
            .context("Failed to re-serialize snapshot for integrity check")?;

        let mut hasher = Sha256::new();
        hasher.update(snapshot_json.as_bytes());
        let calculated_checksum = format!("{:x}", hasher.finalize());

        if calculated_checksum != envelope.checksum {
            anyhow::bail!(
                "Snapshot integrity check failed: checksum mismatch. The file may be corrupted."
            );
        }

        let snapshot = envelope.snapshot;

        if snapshot.version != SNAPSHOT_VERSION {
            anyhow::bail!(
                "Unsupported snapshot version: {}. Current version is {}.",
                snapshot.version,
                SNAPSHOT_VERSION
            );
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamps::CaptureRecord;
    use tempfile::tempdir;

    fn sample_report() -> ExtractionReport {
        let mut report = ExtractionReport::default();
        report
            .records
            .push(CaptureRecord::new(PathBuf::from("/photos/a.jpg"), None));
        report.lone_sidecars.push(PathBuf::from("/photos/x.aae"));
        report.sidecar_map.insert(
            PathBuf::from("/photos/b.jpg"),
            PathBuf::from("/photos/b.aae"),
        );
        report
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let snapshot = Snapshot::new(Path::new("/photos"), sample_report());
        snapshot.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded.version, SNAPSHOT_VERSION);
        assert!(loaded.matches_root(Path::new("/photos")));
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.lone_sidecars.len(), 1);
        assert_eq!(loaded.sidecar_map.len(), 1);
    }

    #[test]
    fn test_snapshot_rejects_tampering() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let snapshot = Snapshot::new(Path::new("/photos"), sample_report());
        snapshot.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let tampered = content.replace("a.jpg", "z.jpg");
        assert_ne!(content, tampered);
        std::fs::write(&path, tampered).unwrap();

        let err = Snapshot::load(&path).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "not json at all").unwrap();

        assert!(Snapshot::load(&path).is_err());
    }

    #[test]
    fn test_snapshot_root_mismatch_detected() {
        let snapshot = Snapshot::new(Path::new("/photos"), ExtractionReport::default());
        assert!(!snapshot.matches_root(Path::new("/other")));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("cache").join("snap.json");

        let snapshot = Snapshot::new(Path::new("/photos"), ExtractionReport::default());
        snapshot.save(&path).unwrap();

        assert!(path.exists());
    }
}

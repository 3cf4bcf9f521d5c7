//! Adjustment-sidecar detection and pairing.
//!
//! Apple Photos writes edit metadata to `.aae` sidecar files next to the
//! image they belong to, sharing the base filename (`IMG_0042.aae` for
//! `IMG_0042.JPG`). Sidecars are not independent photos: the scanner diverts
//! them here instead of fingerprinting them, and records a mapping from each
//! matched image back to its sidecar. A sidecar with no base-name sibling is
//! recorded as orphaned.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extension (lowercased, without dot) that marks an adjustment sidecar.
pub const SIDECAR_EXTENSION: &str = "aae";

/// Index of sidecar pairings built up during a scan.
#[derive(Debug, Clone, Default)]
pub struct SidecarIndex {
    /// Image path -> sidecar path, for every image sharing a sidecar's base name.
    pub image_to_sidecar: BTreeMap<PathBuf, PathBuf>,
    /// Sidecars with no base-name sibling at all.
    pub orphaned: Vec<PathBuf>,
}

impl SidecarIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a path carries the sidecar extension (case-insensitive).
    #[must_use]
    pub fn is_sidecar(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SIDECAR_EXTENSION))
    }

    /// Register a sidecar file, searching its directory for files that share
    /// its base name. Returns how many images were matched; zero means the
    /// sidecar was recorded as orphaned.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the sidecar's parent directory
    /// cannot be listed.
    pub fn register(&mut self, sidecar: &Path) -> std::io::Result<usize> {
        let parent = sidecar.parent().unwrap_or_else(|| Path::new("."));
        let stem = sidecar
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut matched = 0;
        for entry in std::fs::read_dir(parent)? {
            let entry = entry?;
            let candidate = entry.path();
            if candidate == sidecar {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            // Same prefix semantics as a `BASE*` glob: IMG_0042.aae pairs
            // with IMG_0042.JPG and IMG_0042 (1).JPG alike.
            if !stem.is_empty() && name.starts_with(stem.as_str()) {
                self.image_to_sidecar
                    .insert(candidate, sidecar.to_path_buf());
                matched += 1;
            }
        }

        if matched == 0 {
            log::info!("Sidecar has no corresponding image: {}", sidecar.display());
            self.orphaned.push(sidecar.to_path_buf());
        }

        Ok(matched)
    }

    /// Number of image-to-sidecar pairings recorded.
    #[must_use]
    pub fn paired_count(&self) -> usize {
        self.image_to_sidecar.len()
    }
}

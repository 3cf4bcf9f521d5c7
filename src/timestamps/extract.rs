//! Multi-method capture-time extraction over a photo library.
//!
//! # Overview
//!
//! For every regular file under a root this pass determines when the photo or
//! video was captured, trying three methods in a fixed priority order:
//!
//! 1. **Image EXIF**: for files the image decoder recognizes, the embedded
//!    "date taken" field (falling back to "date digitized").
//! 2. **Video container probe**: MP4/MOV movie-header creation time, which is
//!    stored as seconds since 1904.
//! 3. **Raw container EXIF**: the EXIF block read straight out of the
//!    container, covering formats like HEIC that the image decoder cannot
//!    handle.
//!
//! Every method is best-effort: failure leaves the timestamp unknown and the
//! next method runs. Only the inability to list a directory or stat a file is
//! a real error, and even those are counted and skipped rather than aborting
//! the pass. The cost of each method is accumulated separately so the summary
//! can show where scan time went.
//!
//! Adjustment sidecars (`.aae`) are not photos; they are diverted to a
//! [`SidecarIndex`](crate::scanner::SidecarIndex) and paired with the images
//! sharing their base name.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::progress::ProgressCallback;
use crate::scanner::{metadata, ScanError, SidecarIndex, Walker};

use super::parse_timestamp;

/// MP4 epoch offset: the container stores seconds since 1904-01-01.
const SECONDS_FROM_1904_TO_1970: u64 = 2_082_844_800;

/// Capture-time record for one scanned file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// Path of the file.
    pub path: PathBuf,
    /// Parent directory, kept for per-directory reporting.
    pub directory: PathBuf,
    /// Capture time, or `None` when no method produced one.
    pub capture_time: Option<NaiveDateTime>,
}

impl CaptureRecord {
    /// Build a record for a path.
    #[must_use]
    pub fn new(path: PathBuf, capture_time: Option<NaiveDateTime>) -> Self {
        let directory = path
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf);
        Self {
            path,
            directory,
            capture_time,
        }
    }
}

/// Wall-clock cost of each extraction method, accumulated over a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodTimings {
    /// Time spent in the image EXIF method.
    pub image_exif: Duration,
    /// Time spent probing video containers.
    pub video_probe: Duration,
    /// Time spent reading EXIF blocks straight from containers.
    pub container_exif: Duration,
}

/// Output of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// One record per scanned file (sidecars excluded).
    pub records: Vec<CaptureRecord>,
    /// Sidecars with no base-name sibling.
    pub lone_sidecars: Vec<PathBuf>,
    /// Image path -> sidecar path pairings.
    pub sidecar_map: std::collections::BTreeMap<PathBuf, PathBuf>,
    /// Per-method cost breakdown.
    pub timings: MethodTimings,
    /// Files or directories skipped because of traversal/stat errors.
    pub scan_errors: usize,
}

impl ExtractionReport {
    /// Records that ended up without a capture time.
    #[must_use]
    pub fn missing_timestamps(&self) -> Vec<&CaptureRecord> {
        self.records
            .iter()
            .filter(|r| r.capture_time.is_none())
            .collect()
    }
}

/// Run the extraction pass over every file under `root`.
///
/// Progress is reported per file for observability only; the pass is
/// sequential and each record is computed independently.
///
/// # Errors
///
/// Returns [`ScanError::NotADirectory`] when the root is not a directory.
/// Per-file errors are counted in the report instead.
pub fn collect_capture_times(
    root: &Path,
    progress: &dyn ProgressCallback,
) -> Result<ExtractionReport, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut report = ExtractionReport::default();
    let mut sidecars = SidecarIndex::new();

    progress.on_phase_start("timestamps", None);

    let walker = Walker::new(root);
    for entry in walker.walk() {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Skipping during timestamp scan: {}", e);
                report.scan_errors += 1;
                continue;
            }
        };

        progress.on_progress(&path.to_string_lossy());

        if SidecarIndex::is_sidecar(&path) {
            if let Err(e) = sidecars.register(&path) {
                log::warn!("Cannot pair sidecar {}: {}", path.display(), e);
                report.scan_errors += 1;
            }
            continue;
        }

        let capture_time = capture_time_for(&path, &mut report.timings);
        report.records.push(CaptureRecord::new(path, capture_time));
    }

    progress.on_phase_end("timestamps");

    report.lone_sidecars = sidecars.orphaned;
    report.sidecar_map = sidecars.image_to_sidecar;

    log::info!(
        "Timestamp pass: {} files, {} without timestamps, {} scan errors",
        report.records.len(),
        report.missing_timestamps().len(),
        report.scan_errors
    );

    Ok(report)
}

/// Determine the capture time of one file, trying each method in priority
/// order and accumulating its cost.
#[must_use]
pub fn capture_time_for(path: &Path, timings: &mut MethodTimings) -> Option<NaiveDateTime> {
    let start = Instant::now();
    let mut capture_time = image_exif_time(path);
    timings.image_exif += start.elapsed();

    if capture_time.is_none() {
        let start = Instant::now();
        capture_time = video_creation_time(path);
        timings.video_probe += start.elapsed();
    }

    if capture_time.is_none() {
        let start = Instant::now();
        capture_time = container_exif_time(path);
        timings.container_exif += start.elapsed();
    }

    capture_time
}

/// Method 1: EXIF capture time for files the image decoder recognizes.
fn image_exif_time(path: &Path) -> Option<NaiveDateTime> {
    let reader = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .ok()?;
    // Formats the decoder does not know (HEIC among them) are left for the
    // container methods.
    reader.format()?;
    metadata::exif_capture_time(path)
}

/// Method 2: movie-header creation time from MP4/MOV containers.
fn video_creation_time(path: &Path) -> Option<NaiveDateTime> {
    let mut file = File::open(path).ok()?;
    let context = match mp4parse::read_mp4(&mut file) {
        Ok(context) => context,
        Err(e) => {
            log::trace!("Not an MP4 container {}: {:?}", path.display(), e);
            return None;
        }
    };

    let seconds_since_1904 = context.creation?.0;
    // Pre-1970 creation times are bogus on real photo libraries; treat as
    // absent rather than wrapping around.
    let unix = seconds_since_1904.checked_sub(SECONDS_FROM_1904_TO_1970)?;
    chrono::DateTime::from_timestamp(i64::try_from(unix).ok()?, 0).map(|dt| dt.naive_utc())
}

/// Method 3: EXIF block read straight from the container, scanning for the
/// original date/time field.
fn container_exif_time(path: &Path) -> Option<NaiveDateTime> {
    let exif = metadata::read_exif(path)?;
    let raw = metadata::ascii_field(&exif, exif::Tag::DateTimeOriginal)?;

    match parse_timestamp(&raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            log::debug!("Bad container timestamp in {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_capture_time_for_plain_png_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.png");
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]))
            .save(&path)
            .unwrap();

        let mut timings = MethodTimings::default();
        assert!(capture_time_for(&path, &mut timings).is_none());
    }

    #[test]
    fn test_video_probe_rejects_garbage_without_panicking() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mov");
        std::fs::write(&path, b"not a movie at all").unwrap();

        assert!(video_creation_time(&path).is_none());
    }

    #[test]
    fn test_collect_requires_directory_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("single.jpg");
        std::fs::write(&file, b"x").unwrap();

        let result = collect_capture_times(&file, &SilentProgress);
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn test_collect_records_every_non_sidecar_file() {
        let dir = TempDir::new().unwrap();
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]))
            .save(dir.path().join("a.png"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        std::fs::write(dir.path().join("IMG_0001.aae"), b"<plist/>").unwrap();
        std::fs::write(dir.path().join("IMG_0001.JPG"), b"stub").unwrap();

        let report = collect_capture_times(dir.path(), &SilentProgress).unwrap();

        // a.png, notes.txt and IMG_0001.JPG get records; the sidecar does not.
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.sidecar_map.len(), 1);
        assert!(report.lone_sidecars.is_empty());
        assert_eq!(report.missing_timestamps().len(), 3);
    }

    #[test]
    fn test_collect_reports_lone_sidecar() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("orphan.aae"), b"<plist/>").unwrap();

        let report = collect_capture_times(dir.path(), &SilentProgress).unwrap();

        assert_eq!(report.lone_sidecars.len(), 1);
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_capture_record_keeps_parent_directory() {
        let record = CaptureRecord::new(PathBuf::from("/photos/2019/IMG.jpg"), None);
        assert_eq!(record.directory, PathBuf::from("/photos/2019"));
    }
}

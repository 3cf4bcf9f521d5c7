//! Scanner module for directory traversal and file metadata extraction.
//!
//! This module provides functionality for:
//! - Lazy recursive directory walking
//! - Image metadata extraction (dimensions, container format, capture time)
//! - Pixel sampling for fine-grained fingerprinting
//! - Adjustment-sidecar pairing (`.aae` files)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`metadata`]: Per-file descriptor construction
//! - [`sidecar`]: Sidecar detection and base-name pairing
//!
//! # Example
//!
//! ```no_run
//! use phototriage::scanner::{metadata, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/photos"));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => {
//!             let desc = metadata::describe(&path, false)?;
//!             println!("{}: {} bytes", desc.path.display(), desc.filesize);
//!         }
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! # Ok::<(), phototriage::scanner::ScanError>(())
//! ```

pub mod metadata;
pub mod sidecar;
pub mod walker;

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;

// Re-export main types
pub use sidecar::SidecarIndex;
pub use walker::Walker;

/// Opaque color sample taken from a decoded image.
///
/// The channel encoding depends on the source format, so the value is only
/// meaningful for equality comparison, never for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelSample([u8; 4]);

impl PixelSample {
    /// Wrap raw decoded channel bytes.
    #[must_use]
    pub fn new(channels: [u8; 4]) -> Self {
        Self(channels)
    }
}

impl fmt::Display for PixelSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// The two pixel samples used for fine fingerprinting: the top-left corner
/// and the center of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelSamples {
    /// Pixel at coordinate (0, 0).
    pub corner: PixelSample,
    /// Pixel at coordinate (width / 2, height / 2).
    pub center: PixelSample,
}

/// Structured descriptor for one scanned file.
///
/// Every scanned path produces exactly one descriptor. Files that cannot be
/// decoded as images degrade to `{path, filesize}` so they never silently
/// disappear from duplicate analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    /// Path the descriptor was built from (identity key).
    pub path: PathBuf,
    /// File size in bytes.
    pub filesize: u64,
    /// Pixel dimensions (width, height); absent for unreadable files.
    pub dimensions: Option<(u32, u32)>,
    /// Container/codec tag, e.g. "JPEG"; absent for unreadable files.
    pub format: Option<String>,
    /// Capture time from embedded metadata, if any.
    pub capture_time: Option<NaiveDateTime>,
    /// Pixel samples, populated only when built with `load_pixels`.
    pub pixels: Option<PixelSamples>,
}

impl FileDescriptor {
    /// Build the degraded fallback descriptor for a file that could not be
    /// decoded as an image.
    #[must_use]
    pub fn degraded(path: PathBuf, filesize: u64) -> Self {
        Self {
            path,
            filesize,
            dimensions: None,
            format: None,
            capture_time: None,
            pixels: None,
        }
    }

    /// Whether this descriptor is the degraded `{path, filesize}` fallback.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.dimensions.is_none() || self.format.is_none()
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A symbolic link cycle was detected and the looping subtree skipped.
    #[error("Symlink cycle at {path} (ancestor: {ancestor})")]
    SymlinkCycle {
        /// The link that closed the cycle
        path: PathBuf,
        /// The ancestor directory the link points back to
        ancestor: PathBuf,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error against the path it occurred on.
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

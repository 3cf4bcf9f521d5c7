//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! The [`Walker`] lazily enumerates every regular file reachable by recursive
//! descent from a root directory. Directories yield no entry themselves and no
//! extension filtering is applied; every regular file is a candidate for
//! duplicate analysis.
//!
//! Traversal order is directory-listing order and is not guaranteed stable
//! across runs. Symbolic links are followed; walkdir detects link cycles and
//! the walker surfaces them as recoverable [`ScanError::SymlinkCycle`] items
//! instead of recursing forever.
//!
//! # Example
//!
//! ```no_run
//! use phototriage::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/photos"));
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ScanError;

/// Lazy recursive file walker.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given root directory.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// Walk the directory tree, yielding file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; an unreadable subdirectory costs its own entries only.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    // Only regular files; directories, sockets and fifos
                    // yield no entry.
                    if entry.file_type().is_file() {
                        Some(Ok(entry.into_path()))
                    } else {
                        None
                    }
                }
                Err(e) => Some(Err(self.convert_error(e))),
            })
    }

    /// Map a walkdir error onto the scanner error taxonomy.
    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::warn!(
                "Symlink cycle detected at {} (back to {}), skipping",
                path.display(),
                ancestor.display()
            );
            return ScanError::SymlinkCycle {
                ancestor: ancestor.to_path_buf(),
                path,
            };
        }

        match error.into_io_error() {
            Some(io_err) => {
                log::warn!("Walker error for {}: {}", path.display(), io_err);
                ScanError::from_io(&path, io_err)
            }
            None => ScanError::Io {
                source: std::io::Error::other("directory traversal failed"),
                path,
            },
        }
    }
}

//! Coarse and fine fingerprint construction.
//!
//! # Overview
//!
//! Fingerprints are cheap string signatures used to bucket files before any
//! expensive comparison:
//!
//! - **Coarse**: filesize + dimensions + format. Identical coarse
//!   fingerprints make two files *candidates* for duplication, nothing more.
//! - **Fine**: the coarse fields plus two sampled pixel values. Computing it
//!   requires re-decoding the file, so it is only built for members of a
//!   coarse-collision group.
//! - **Degraded**: filesize + path, for files that could not be decoded.
//!   The path component makes distinct unreadable files collision-free by
//!   construction; they stay in the analysis for coverage accounting but can
//!   never be flagged as duplicates of each other.
//!
//! Textual components are delimiter-escaped so that adversarial values (a
//! format tag containing `:`, a path containing `\`) cannot make distinct
//! field tuples encode to the same string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scanner::FileDescriptor;

/// Delimiter joining fingerprint components.
pub const DELIMITER: char = ':';

/// A derived file signature, comparable and hashable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backslash-escape the delimiter (and the escape character itself) in a
/// textual component, making the joined encoding injective.
fn escape(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.chars() {
        if c == DELIMITER || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the coarse (phase 1) fingerprint: filesize, dimensions, format.
///
/// Degraded descriptors fall through to [`degraded`].
#[must_use]
pub fn coarse(desc: &FileDescriptor) -> Fingerprint {
    match (desc.dimensions, desc.format.as_deref()) {
        (Some((width, height)), Some(format)) => Fingerprint(format!(
            "{}{DELIMITER}{}x{}{DELIMITER}{}",
            desc.filesize,
            width,
            height,
            escape(format)
        )),
        _ => degraded(desc),
    }
}

/// Build the fine (phase 2) fingerprint: the coarse fields plus the corner
/// and center pixel samples.
///
/// Descriptors without pixel samples (including degraded ones) fall through
/// to [`degraded`]; a file that could not be re-decoded during escalation is
/// treated exactly like any other unreadable file.
#[must_use]
pub fn fine(desc: &FileDescriptor) -> Fingerprint {
    match (desc.dimensions, desc.format.as_deref(), desc.pixels) {
        (Some((width, height)), Some(format), Some(samples)) => Fingerprint(format!(
            "{}{DELIMITER}{}x{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            desc.filesize,
            width,
            height,
            samples.corner,
            samples.center,
            escape(format)
        )),
        _ => degraded(desc),
    }
}

/// Build the degraded fingerprint: filesize plus escaped path.
///
/// Two distinct paths always produce distinct degraded fingerprints, and a
/// degraded fingerprint has two components where image fingerprints have
/// three or five, so the namespaces never overlap.
#[must_use]
pub fn degraded(desc: &FileDescriptor) -> Fingerprint {
    Fingerprint(format!(
        "{}{DELIMITER}{}",
        desc.filesize,
        escape(&desc.path.to_string_lossy())
    ))
}

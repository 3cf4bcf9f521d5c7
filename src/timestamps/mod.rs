//! Capture-time extraction.
//!
//! This module provides functionality for:
//! - Textual timestamp parsing against the admissible formats ([`parse`])
//! - The multi-method capture-time extraction pass over a photo library,
//!   including sidecar pairing and per-method cost accounting ([`extract`])

pub mod extract;
pub mod parse;

pub use extract::{
    collect_capture_times, CaptureRecord, ExtractionReport, MethodTimings,
};
pub use parse::{parse_timestamp, TimestampError};

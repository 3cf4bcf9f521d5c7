//! Textual timestamp parsing.
//!
//! Camera metadata is inconsistent about how it spells datetimes. Three
//! formats are admissible, tried in sequence:
//!
//! 1. EXIF style: `2019:07:14 18:03:22`
//! 2. Dashed: `2019-07-14 18:03:22`
//! 3. ISO-8601 with fractional seconds and `Z` suffix:
//!    `2019-07-14T18:03:22.000000Z`
//!
//! Anything else is a [`TimestampError::UnrecognizedFormat`], which callers
//! recover from locally by treating the timestamp as absent.

use chrono::NaiveDateTime;

/// Formats tried in sequence when parsing a textual timestamp.
const FORMATS: [&str; 3] = [
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

/// Errors from timestamp parsing.
#[derive(thiserror::Error, Debug)]
pub enum TimestampError {
    /// No admissible textual format matched.
    #[error("Could not find a time parser for time {0:?}")]
    UnrecognizedFormat(String),
}

/// Parse a textual timestamp against the admissible formats.
///
/// # Errors
///
/// Returns [`TimestampError::UnrecognizedFormat`] when none of the formats
/// match.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = raw.trim();
    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }
    Err(TimestampError::UnrecognizedFormat(raw.to_string()))
}

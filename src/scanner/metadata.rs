//! Per-file metadata extraction.
//!
//! # Overview
//!
//! [`describe`] opens a file, attempts to decode it as an image, and produces a
//! [`FileDescriptor`]. Decode failure is a recoverable condition: the
//! descriptor degrades to `{path, filesize}` and the scan continues. Only a
//! failing `stat` is reported as a real [`ScanError`], since without a file
//! size not even the degraded descriptor can be built.
//!
//! Pixel sampling (`load_pixels = true`) requires a full decode and is
//! markedly more expensive than the header-only path, so callers should
//! request it only for files already inside a coarse-collision group.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use exif::{In, Tag, Value};
use image::{GenericImageView, ImageFormat, ImageReader};

use crate::timestamps::parse_timestamp;

use super::{FileDescriptor, PixelSample, PixelSamples, ScanError};

/// Build the descriptor for one file.
///
/// With `load_pixels` the image is fully decoded and the (0,0) and center
/// pixels are sampled; without it only the header is read for dimensions and
/// format. The file handle is scoped to this call.
///
/// # Errors
///
/// Returns [`ScanError`] only when the file cannot be stat'ed at all. Decode
/// failures degrade the descriptor instead.
pub fn describe(path: &Path, load_pixels: bool) -> Result<FileDescriptor, ScanError> {
    let filesize = std::fs::metadata(path)
        .map_err(|e| ScanError::from_io(path, e))?
        .len();

    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            log::debug!("Cannot reopen {} for decoding: {}", path.display(), e);
            return Ok(FileDescriptor::degraded(path.to_path_buf(), filesize));
        }
    };

    let Some(format) = reader.format() else {
        log::debug!("Unrecognized image format: {}", path.display());
        return Ok(FileDescriptor::degraded(path.to_path_buf(), filesize));
    };

    let (dimensions, pixels) = if load_pixels {
        match reader.decode() {
            Ok(img) => {
                let (width, height) = img.dimensions();
                let corner = img.get_pixel(0, 0).0;
                let center = img.get_pixel(width / 2, height / 2).0;
                (
                    (width, height),
                    Some(PixelSamples {
                        corner: PixelSample::new(corner),
                        center: PixelSample::new(center),
                    }),
                )
            }
            Err(e) => {
                log::debug!("Decode failed for {}: {}", path.display(), e);
                return Ok(FileDescriptor::degraded(path.to_path_buf(), filesize));
            }
        }
    } else {
        match reader.into_dimensions() {
            Ok(dims) => (dims, None),
            Err(e) => {
                log::debug!("Header read failed for {}: {}", path.display(), e);
                return Ok(FileDescriptor::degraded(path.to_path_buf(), filesize));
            }
        }
    };

    Ok(FileDescriptor {
        path: path.to_path_buf(),
        filesize,
        dimensions: Some(dimensions),
        format: Some(format_tag(format)),
        capture_time: exif_capture_time(path),
        pixels,
    })
}

/// Read the capture time from embedded EXIF metadata.
///
/// Tries the "date taken" field (`DateTimeOriginal`) first and falls back to
/// the "date digitized" field (`DateTimeDigitized`). Absent or unparseable
/// timestamps yield `None`; nothing here is fatal.
#[must_use]
pub fn exif_capture_time(path: &Path) -> Option<NaiveDateTime> {
    let exif = read_exif(path)?;
    let raw = ascii_field(&exif, Tag::DateTimeOriginal)
        .or_else(|| ascii_field(&exif, Tag::DateTimeDigitized))?;

    match parse_timestamp(&raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            log::debug!("Bad EXIF timestamp in {}: {}", path.display(), e);
            None
        }
    }
}

/// Pretty-print the display metadata for one file: capture time and source
/// device. Consumed by the external review UI.
#[must_use]
pub fn pretty(path: &Path) -> String {
    let exif = read_exif(path);

    let taken = exif
        .as_ref()
        .and_then(|e| ascii_field(e, Tag::DateTimeOriginal))
        .unwrap_or_else(|| "unknown".to_string());

    let source = exif
        .as_ref()
        .and_then(source_device)
        .unwrap_or_else(|| "unknown".to_string());

    format!("Taken: {taken}\nSource: {source}")
}

/// Camera make and model joined into one display string.
fn source_device(exif: &exif::Exif) -> Option<String> {
    let parts: Vec<String> = [Tag::Make, Tag::Model]
        .iter()
        .filter_map(|&tag| ascii_field(exif, tag))
        .map(|s| s.trim().to_string())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Parse the EXIF block out of a file's container, if it has one.
pub(crate) fn read_exif(path: &Path) -> Option<exif::Exif> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    exif::Reader::new().read_from_container(&mut reader).ok()
}

/// Extract an ASCII field value as a UTF-8 string.
pub(crate) fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(values) => values
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string()),
        _ => None,
    }
}

/// Stable tag for an image container format.
fn format_tag(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        other => other
            .extensions_str()
            .first()
            .map_or_else(|| "UNKNOWN".to_string(), |ext| ext.to_uppercase()),
    }
}

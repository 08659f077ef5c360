//! Embedded-metadata extraction.
//!
//! The caption oracle needs the descriptive text a camera or tagging tool
//! embedded in an image. This module reads the Exif `ImageDescription`
//! field; any parse or I/O failure surfaces as an error for the oracle to
//! map onto its fail-open policy.

use crate::core::{ClassifierError, Result};
use exif::{In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads the embedded description of an image file, if it has one.
///
/// Returns `Ok(None)` when the file parses but carries no description.
///
/// # Errors
///
/// Returns [`ClassifierError::Metadata`] when the file cannot be opened or
/// its metadata container cannot be parsed (corrupt file, unsupported
/// format, I/O error).
pub fn image_description(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).map_err(|e| ClassifierError::metadata(path, e))?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| ClassifierError::metadata(path, e))?;

    let Some(field) = exif.get_field(Tag::ImageDescription, In::PRIMARY) else {
        return Ok(None);
    };

    match &field.value {
        Value::Ascii(lines) => Ok(lines.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        })),
        _ => Ok(None),
    }
}

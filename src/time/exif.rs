//! EXIF time extraction for images

use super::layout::parse_exif_datetime;
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// Extract capture time from the `DateTime` tag of the primary IFD
pub fn extract_exif_time(path: &Path) -> Result<NaiveDateTime> {
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::ExifDecode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let field = exif
        .get_field(Tag::DateTime, In::PRIMARY)
        .ok_or_else(|| Error::MissingField {
            path: path.to_path_buf(),
            field: "DateTime",
        })?;

    let datetime = ascii_value(&field.value).ok_or_else(|| Error::NotAString {
        path: path.to_path_buf(),
        field: "DateTime",
    })?;

    trace!(?path, datetime, "Found EXIF DateTime");
    parse_exif_datetime(datetime)
}

/// First string of an ASCII value
fn ascii_value(value: &Value) -> Option<&str> {
    match value {
        Value::Ascii(parts) => parts.first().and_then(|p| std::str::from_utf8(p).ok()),
        _ => None,
    }
}

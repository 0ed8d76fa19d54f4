//! Fixed timestamp layouts
//!
//! Both the EXIF datetime and the filename token are fixed-width layouts.
//! Parsing checks the exact shape first (field widths, separators, length)
//! and only then builds the calendar value, so `2021:7:04 10:15:30` or
//! `2021-07-04 10:15:30` never get coerced into something valid.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Human-readable EXIF / sidecar datetime layout
pub const EXIF_LAYOUT: &str = "YYYY:MM:DD HH:MM:SS";

/// Human-readable filename token layout
pub const TOKEN_LAYOUT: &str = "YYYY_MM_DD_HH_MM_SS";

/// chrono format of a per-file timestamp token
pub const TOKEN_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// chrono format of archive names; `{name}` is replaced by the stream name
pub const ARCHIVE_FORMAT: &str = "{name}~%Y-%m-%d.tar";

/// chrono format of the default timestream directory structure
pub const DEFAULT_DIRECTORY_STRUCTURE: &str = "%Y/%Y_%m/%Y_%m_%d/%Y_%m_%d_%H/";

/// Parse an EXIF datetime string: "YYYY:MM:DD HH:MM:SS"
pub fn parse_exif_datetime(s: &str) -> Result<NaiveDateTime> {
    parse_fixed(s, EXIF_LAYOUT)
}

/// Parse a filename timestamp token: "YYYY_MM_DD_HH_MM_SS"
pub fn parse_token(s: &str) -> Result<NaiveDateTime> {
    parse_fixed(s, TOKEN_LAYOUT)
}

/// Parse `s` against a layout where each letter is one ASCII digit and every
/// other character must match exactly
fn parse_fixed(s: &str, layout: &'static str) -> Result<NaiveDateTime> {
    let malformed = |reason| Error::MalformedTimestamp {
        input: s.to_string(),
        layout,
        reason,
    };

    if !matches_layout(s, layout) {
        return Err(malformed("does not match layout"));
    }

    // Shape is verified, so every field sits at a known offset.
    let field = |range: std::ops::Range<usize>| -> u32 {
        s.as_bytes()[range]
            .iter()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
    };

    build_datetime(
        field(0..4) as i32,
        field(5..7),
        field(8..10),
        field(11..13),
        field(14..16),
        field(17..19),
    )
    .ok_or_else(|| malformed("not a valid calendar date/time"))
}

fn matches_layout(s: &str, layout: &str) -> bool {
    s.len() == layout.len()
        && s.bytes().zip(layout.bytes()).all(|(c, l)| {
            if l.is_ascii_alphabetic() {
                c.is_ascii_digit()
            } else {
                c == l
            }
        })
}

fn build_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<NaiveDateTime> {
    // and_hms_opt already rejects 24:00:00 and the leap second 60
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

//! Filename timestamp token parsing

use super::layout::parse_token;
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::trace;

/// Pattern: YYYY_MM_DD_HH_MM_SS, ASCII digits only
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{4}_[0-9]{2}_[0-9]{2}_[0-9]{2}_[0-9]{2}_[0-9]{2}").unwrap()
});

/// First timestamp token in `s`, if any
pub fn find_token(s: &str) -> Option<&str> {
    TOKEN_RE.find(s).map(|m| m.as_str())
}

/// Parse capture time from the timestamp token embedded in a path
///
/// The whole path string is scanned, not just the file name, and the first
/// token wins. A token whose digits do not form a calendar point is an error
/// rather than a reason to look for a later one.
pub fn parse_filename_time(path: &Path) -> Result<NaiveDateTime> {
    let path_str = path.to_string_lossy();

    let token = find_token(&path_str).ok_or_else(|| Error::TokenNotFound {
        path: path.to_path_buf(),
    })?;

    trace!(?path, token, "Matched timestamp token");
    parse_token(token)
}

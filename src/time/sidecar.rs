//! JSON sidecar metadata
//!
//! A sidecar lives next to the media file at `<full path>.json` and carries
//! the EXIF datetime fields that were extracted upstream. Only `DateTime` is
//! used.

use super::layout::parse_exif_datetime;
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Datetime fields stored in a sidecar file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SidecarRecord {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date_time_original: Option<String>,
    #[serde(default)]
    pub date_time_digitized: Option<String>,
}

/// Path of the sidecar belonging to `path`
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".json");
    PathBuf::from(s)
}

/// Whether a sidecar exists for `path`
///
/// Any stat failure counts as absent.
pub fn has_sidecar(path: &Path) -> bool {
    fs::metadata(sidecar_path(path)).is_ok()
}

/// Read and parse the sidecar of `path`
pub fn read_sidecar(path: &Path) -> Result<SidecarRecord> {
    let sidecar = sidecar_path(path);
    let bytes = fs::read(&sidecar).map_err(|e| Error::open(&sidecar, e))?;

    serde_json::from_slice(&bytes).map_err(|e| Error::MalformedSidecar {
        path: sidecar,
        source: e,
    })
}

/// Extract capture time from the sidecar of `path`
///
/// The caller is expected to have checked [`has_sidecar`]; a missing file
/// surfaces as a `NotFound` error here.
pub fn extract_sidecar_time(path: &Path) -> Result<NaiveDateTime> {
    let record = read_sidecar(path)?;

    let datetime = record.date_time.ok_or_else(|| Error::MissingField {
        path: sidecar_path(path),
        field: "DateTime",
    })?;

    trace!(?path, %datetime, "Found sidecar DateTime");
    parse_exif_datetime(&datetime)
}

//! Capture time resolution
//!
//! This module determines when a media file was captured from:
//! - A JSON sidecar next to the file (`<path>.json`)
//! - EXIF metadata embedded in the file
//! - A `YYYY_MM_DD_HH_MM_SS` token in the path
//!
//! Each source is a [`TimeStrategy`]. A [`Resolver`] walks its strategies in
//! order and advances only when a strategy reports that it does not apply.
//! Once a strategy has been entered, its failure ends resolution unless the
//! resolver runs with [`CascadePolicy::AnyFailure`].

pub mod exif;
pub mod filename;
pub mod layout;
pub mod sidecar;

pub use filename::parse_filename_time;
pub use layout::parse_exif_datetime;

use crate::config::{CascadePolicy, ResolveConfig};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::fmt;
use std::path::Path;
use tracing::{debug, trace};

/// Source of the extracted timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Read from the JSON sidecar
    Sidecar,
    /// Read from embedded EXIF metadata
    Exif,
    /// Parsed from a token in the path
    Filename,
}

impl fmt::Display for TimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeSource::Sidecar => "sidecar",
            TimeSource::Exif => "exif",
            TimeSource::Filename => "filename",
        })
    }
}

/// Result of timestamp extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTime {
    /// The extracted timestamp
    pub timestamp: NaiveDateTime,
    /// Source of the timestamp
    pub source: TimeSource,
}

/// Outcome of a single strategy
#[derive(Debug)]
pub enum Resolution {
    Found(NaiveDateTime),
    /// The evidence this strategy reads is not there
    NotApplicable,
    Failed(Error),
}

impl Resolution {
    fn from_result(result: Result<NaiveDateTime>) -> Self {
        match result {
            Ok(timestamp) => Resolution::Found(timestamp),
            Err(e) => Resolution::Failed(e),
        }
    }
}

/// One way of finding a capture time
pub trait TimeStrategy: Send + Sync {
    fn source(&self) -> TimeSource;

    fn resolve(&self, path: &Path) -> Resolution;
}

/// Sidecar JSON; applies only when `<path>.json` exists
#[derive(Debug, Default, Clone, Copy)]
pub struct SidecarStrategy;

impl TimeStrategy for SidecarStrategy {
    fn source(&self) -> TimeSource {
        TimeSource::Sidecar
    }

    fn resolve(&self, path: &Path) -> Resolution {
        if !sidecar::has_sidecar(path) {
            return Resolution::NotApplicable;
        }
        Resolution::from_result(sidecar::extract_sidecar_time(path))
    }
}

/// Embedded EXIF; always applies, so every failure is reported
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifStrategy;

impl TimeStrategy for ExifStrategy {
    fn source(&self) -> TimeSource {
        TimeSource::Exif
    }

    fn resolve(&self, path: &Path) -> Resolution {
        Resolution::from_result(exif::extract_exif_time(path))
    }
}

/// Path token; applies only when the path contains one
#[derive(Debug, Default, Clone, Copy)]
pub struct FilenameStrategy;

impl TimeStrategy for FilenameStrategy {
    fn source(&self) -> TimeSource {
        TimeSource::Filename
    }

    fn resolve(&self, path: &Path) -> Resolution {
        match filename::parse_filename_time(path) {
            Err(Error::TokenNotFound { .. }) => Resolution::NotApplicable,
            result => Resolution::from_result(result),
        }
    }
}

/// Ordered chain of strategies
pub struct Resolver {
    strategies: Vec<Box<dyn TimeStrategy>>,
    cascade: CascadePolicy,
}

impl Default for Resolver {
    /// Sidecar, then EXIF, stopping at the first failure
    fn default() -> Self {
        Self::new(
            vec![Box::new(SidecarStrategy), Box::new(ExifStrategy)],
            CascadePolicy::Strict,
        )
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("strategies", &self.sources())
            .field("cascade", &self.cascade)
            .finish()
    }
}

impl Resolver {
    pub fn new(strategies: Vec<Box<dyn TimeStrategy>>, cascade: CascadePolicy) -> Self {
        Self { strategies, cascade }
    }

    /// Default chain, with the filename token appended when configured
    pub fn from_config(config: &ResolveConfig) -> Self {
        let mut strategies: Vec<Box<dyn TimeStrategy>> =
            vec![Box::new(SidecarStrategy), Box::new(ExifStrategy)];
        if config.filename_fallback {
            strategies.push(Box::new(FilenameStrategy));
        }
        Self::new(strategies, config.cascade)
    }

    /// Sources in the order they are tried
    pub fn sources(&self) -> Vec<TimeSource> {
        self.strategies.iter().map(|s| s.source()).collect()
    }

    pub fn cascade(&self) -> CascadePolicy {
        self.cascade
    }

    /// Resolve the capture time of `path`
    pub fn resolve(&self, path: &Path) -> Result<ExtractedTime> {
        let mut last_error = None;

        for strategy in &self.strategies {
            let source = strategy.source();
            match strategy.resolve(path) {
                Resolution::Found(timestamp) => {
                    debug!(?path, %source, %timestamp, "Resolved capture time");
                    return Ok(ExtractedTime { timestamp, source });
                }
                Resolution::NotApplicable => {
                    trace!(?path, %source, "Time source not applicable");
                }
                Resolution::Failed(e) => match self.cascade {
                    CascadePolicy::Strict => {
                        debug!(?path, %source, error = %e, "Time source failed");
                        return Err(e);
                    }
                    CascadePolicy::AnyFailure => {
                        debug!(?path, %source, error = %e, "Time source failed, trying next");
                        last_error = Some(e);
                    }
                },
            }
        }

        Err(last_error.unwrap_or_else(|| Error::NoTimeSource {
            path: path.to_path_buf(),
        }))
    }
}

/// Resolve capture time from the sidecar, or from EXIF when there is none
///
/// The filename token is not consulted; call [`parse_filename_time`] for that.
pub fn resolve_capture_time(path: &Path) -> Result<NaiveDateTime> {
    Resolver::default().resolve(path).map(|t| t.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::time::exif::tests::jpeg_with_datetime;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn media(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_time_source_display() {
        assert_eq!(TimeSource::Sidecar.to_string(), "sidecar");
        assert_eq!(TimeSource::Exif.to_string(), "exif");
        assert_eq!(TimeSource::Filename.to_string(), "filename");
    }

    #[test]
    fn test_sidecar_wins_over_exif() {
        let dir = TempDir::new().unwrap();
        let path = media(&dir, "a.jpg", &jpeg_with_datetime("2019:11:02 08:30:00"));
        fs::write(sidecar::sidecar_path(&path), r#"{"DateTime": "2021:07:04 10:15:30"}"#).unwrap();

        let t = Resolver::default().resolve(&path).unwrap();
        assert_eq!(t.source, TimeSource::Sidecar);
        assert_eq!(t.timestamp.to_string(), "2021-07-04 10:15:30");
    }

    #[test]
    fn test_exif_when_no_sidecar() {
        let dir = TempDir::new().unwrap();
        let path = media(&dir, "a.jpg", &jpeg_with_datetime("2019:11:02 08:30:00"));

        let t = Resolver::default().resolve(&path).unwrap();
        assert_eq!(t.source, TimeSource::Exif);
        assert_eq!(resolve_capture_time(&path).unwrap(), t.timestamp);
    }

    #[test]
    fn test_broken_sidecar_does_not_fall_through() {
        let dir = TempDir::new().unwrap();
        let path = media(
            &dir,
            "cam_2018_01_01_00_00_00.jpg",
            &jpeg_with_datetime("2019:11:02 08:30:00"),
        );
        fs::write(sidecar::sidecar_path(&path), "{ broken").unwrap();

        let err = resolve_capture_time(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMetadata);

        let config = ResolveConfig {
            filename_fallback: true,
            ..Default::default()
        };
        let err = Resolver::from_config(&config).resolve(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMetadata);
    }

    #[test]
    fn test_exif_failure_does_not_reach_filename_when_strict() {
        let dir = TempDir::new().unwrap();
        let path = media(&dir, "cam_2018_01_01_00_00_00.jpg", b"no exif");

        let config = ResolveConfig {
            filename_fallback: true,
            cascade: CascadePolicy::Strict,
        };
        let err = Resolver::from_config(&config).resolve(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMetadata);
    }

    #[test]
    fn test_any_failure_cascades_to_filename() {
        let dir = TempDir::new().unwrap();
        let path = media(&dir, "cam_2018_01_01_00_00_00.jpg", b"no exif");
        fs::write(sidecar::sidecar_path(&path), "{ broken").unwrap();

        let config = ResolveConfig {
            filename_fallback: true,
            cascade: CascadePolicy::AnyFailure,
        };
        let t = Resolver::from_config(&config).resolve(&path).unwrap();
        assert_eq!(t.source, TimeSource::Filename);
        assert_eq!(t.timestamp.to_string(), "2018-01-01 00:00:00");
    }

    #[test]
    fn test_any_failure_surfaces_last_error() {
        let dir = TempDir::new().unwrap();
        let path = media(&dir, "plain.jpg", b"no exif");

        let config = ResolveConfig {
            filename_fallback: true,
            cascade: CascadePolicy::AnyFailure,
        };
        // Filename does not apply, so the EXIF failure is what remains
        let err = Resolver::from_config(&config).resolve(&path).unwrap_err();
        assert!(matches!(err, Error::ExifDecode { .. }), "{err:?}");
    }

    #[test]
    fn test_no_applicable_strategy() {
        let resolver = Resolver::new(
            vec![Box::new(SidecarStrategy), Box::new(FilenameStrategy)],
            CascadePolicy::Strict,
        );
        let err = resolver.resolve(Path::new("/nowhere/plain.jpg")).unwrap_err();
        assert!(matches!(err, Error::NoTimeSource { .. }), "{err:?}");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_config_sources() {
        assert_eq!(
            Resolver::default().sources(),
            vec![TimeSource::Sidecar, TimeSource::Exif]
        );

        let config = ResolveConfig {
            filename_fallback: true,
            ..Default::default()
        };
        let resolver = Resolver::from_config(&config);
        assert_eq!(
            resolver.sources(),
            vec![TimeSource::Sidecar, TimeSource::Exif, TimeSource::Filename]
        );
        assert_eq!(resolver.cascade(), CascadePolicy::Strict);
    }
}

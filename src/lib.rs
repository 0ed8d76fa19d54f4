//! Timestream Sort - capture time resolution and file relocation
//!
//! This library provides the two building blocks of timestream sorting:
//! - Capture time resolution from a JSON sidecar, embedded EXIF metadata,
//!   or a `YYYY_MM_DD_HH_MM_SS` token in the path
//! - Copy/move relocation that works across filesystem boundaries
//!
//! Working out the destination of a file from its capture time is left to
//! the caller; the layouts in [`time::layout`] are exposed for that.

pub mod cli;
pub mod config;
pub mod error;
pub mod relocate;
pub mod time;

pub use cli::Cli;
pub use config::{CascadePolicy, Config, ConfigError, DeleteFailurePolicy, Durability};
pub use error::{Error, ErrorKind, Result};
pub use relocate::{Relocated, Relocator, SourceDisposition, relocate};
pub use time::{ExtractedTime, Resolver, TimeSource, parse_filename_time, resolve_capture_time};

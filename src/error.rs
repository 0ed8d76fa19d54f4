//! Error types for timestamp resolution and relocation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for timestream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
///
/// Callers that only care about the class of failure (for example to decide
/// whether to try the filename token after the metadata path failed) can
/// match on this instead of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source file or filename token is absent
    NotFound,
    /// Open, read or stat failure
    Unreadable,
    /// Sidecar JSON or embedded metadata could not be decoded
    MalformedMetadata,
    /// Decoded metadata has no datetime field
    MissingField,
    /// Datetime string does not match its layout or is not a calendar point
    MalformedTimestamp,
    /// Destination could not be created, written or closed
    WriteFailure,
}

/// Main error type for timestream operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to find timestamp token in filename {}", path.display())]
    TokenNotFound { path: PathBuf },

    #[error("No time source applies to {}", path.display())]
    NoTimeSource { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse sidecar {}: {source}", path.display())]
    MalformedSidecar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Couldn't decode EXIF from image {}: {message}", path.display())]
    ExifDecode { path: PathBuf, message: String },

    #[error("EXIF field {field} in {} is not a string", path.display())]
    NotAString { path: PathBuf, field: &'static str },

    #[error("Field {field} missing from metadata of {}", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Failed to parse timestamp {input:?} as {layout}: {reason}")]
    MalformedTimestamp {
        input: String,
        layout: &'static str,
        reason: &'static str,
    },

    #[error("Failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to set permissions on {}: {source}", path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to close {}: {source}", path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete source {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Build the error for a failed open, separating absence from other failures
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::SourceNotFound { path, source }
        } else {
            Error::Unreadable { path, source }
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SourceNotFound { .. } | Error::TokenNotFound { .. } | Error::NoTimeSource { .. } => {
                ErrorKind::NotFound
            }
            Error::Unreadable { .. } => ErrorKind::Unreadable,
            Error::MalformedSidecar { .. } | Error::ExifDecode { .. } | Error::NotAString { .. } => {
                ErrorKind::MalformedMetadata
            }
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::MalformedTimestamp { .. } => ErrorKind::MalformedTimestamp,
            Error::Create { .. }
            | Error::Permissions { .. }
            | Error::Copy { .. }
            | Error::Close { .. }
            | Error::Delete { .. } => ErrorKind::WriteFailure,
        }
    }

    /// True when the error only says that the evidence is absent
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

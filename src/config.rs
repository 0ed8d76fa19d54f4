//! Configuration types for resolution and relocation

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What the resolver does when a time source it entered fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CascadePolicy {
    /// Stop and report the failure; only an absent source moves on
    #[default]
    Strict,
    /// Move on to the next source after any failure
    AnyFailure,
}

/// What the relocator does when removing the source fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeleteFailurePolicy {
    /// Keep going silently
    #[default]
    Ignore,
    /// Keep going, but emit a warning event
    Warn,
    /// Return the failure to the caller
    Fail,
}

/// How far the destination is flushed before it is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    /// Flush buffered bytes to the OS
    #[default]
    Flush,
    /// Also fsync data and metadata to stable storage
    Sync,
}

/// Resolver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResolveConfig {
    /// Cascade policy between time sources
    pub cascade: CascadePolicy,

    /// Append the filename token as a last time source
    pub filename_fallback: bool,
}

/// Relocator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RelocateConfig {
    /// Handling of a failed source removal
    pub on_delete_failure: DeleteFailurePolicy,

    /// Destination durability
    pub durability: Durability,

    /// Fail instead of warning when the destination mode cannot be set
    pub strict_permissions: bool,
}

/// Configuration for timestream sorting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolve: ResolveConfig,
    pub relocate: RelocateConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            source: e,
        })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Timestream Sort Configuration File
# This file uses TOML format (https://toml.io)

[resolve]
# What happens when a time source is present but broken:
# - strict: report the failure (a broken sidecar never falls back to EXIF)
# - any-failure: try the next source instead
cascade = "strict"

# Use a YYYY_MM_DD_HH_MM_SS token in the path when nothing else applies
filename_fallback = false

[relocate]
# When the source of a move cannot be removed: "ignore", "warn" or "fail"
on_delete_failure = "ignore"

# "flush" hands bytes to the OS, "sync" also fsyncs the destination
durability = "flush"

# Fail when the destination mode (owner+group read/write) cannot be set.
# By default the copy goes ahead with a warning.
strict_permissions = false
"#
        .to_string()
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize configuration
    SerializeError {
        source: toml::ser::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::WriteError { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path.display(), source)
            }
            ConfigError::SerializeError { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::WriteError { source, .. } => Some(source),
            ConfigError::SerializeError { source } => Some(source),
        }
    }
}

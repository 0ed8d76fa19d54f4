//! CLI argument parsing with clap

use crate::config::{CascadePolicy, Config, DeleteFailurePolicy, Durability};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Timestream Sort - resolve capture times and relocate media files
#[derive(Parser, Debug)]
#[command(name = "timestream-sort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// CLI arguments override config file settings.
    #[arg(short = 'C', long, global = true, env = "TIMESTREAM_SORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long, global = true)]
    pub json_log: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the capture time of each file
    Resolve {
        /// Files or directories to resolve
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,

        /// Descend into directories below the first level
        #[arg(short, long)]
        recursive: bool,

        /// Fall back to a YYYY_MM_DD_HH_MM_SS token in the path
        #[arg(short, long)]
        filename_fallback: bool,

        /// What to do when a time source is present but broken
        #[arg(long, value_enum)]
        cascade: Option<CascadePolicy>,
    },

    /// Copy a file, or move it with --delete
    Relocate {
        source: PathBuf,
        dest: PathBuf,

        /// Remove the source after copying
        #[arg(short, long)]
        delete: bool,

        /// What to do when the source cannot be removed
        #[arg(long, value_enum)]
        on_delete_failure: Option<DeleteFailurePolicy>,

        /// fsync the destination before closing it
        #[arg(long)]
        sync: bool,
    },
}

impl Cli {
    /// Merge CLI arguments into a config
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        match &self.command {
            Command::Resolve {
                filename_fallback,
                cascade,
                ..
            } => {
                if *filename_fallback {
                    config.resolve.filename_fallback = true;
                }
                if let Some(cascade) = cascade {
                    config.resolve.cascade = *cascade;
                }
            }
            Command::Relocate {
                on_delete_failure,
                sync,
                ..
            } => {
                if let Some(policy) = on_delete_failure {
                    config.relocate.on_delete_failure = *policy;
                }
                if *sync {
                    config.relocate.durability = Durability::Sync;
                }
            }
        }

        config
    }
}

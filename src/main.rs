//! Timestream Sort - resolve capture times and relocate media files

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use timestream_sort::cli::Command;
use timestream_sort::{Cli, Config, Relocator, Resolver};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use walkdir::WalkDir;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(&cli)?;

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Resolve {
            paths, recursive, ..
        } => run_resolve(&config, paths, *recursive),
        Command::Relocate {
            source,
            dest,
            delete,
            ..
        } => run_relocate(&config, source, dest, *delete),
    }
}

/// Load configuration from file, then apply CLI overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        Config::load_from_file(config_path)?
    } else {
        Config::default()
    };

    Ok(cli.merge_with_config(config))
}

fn run_resolve(config: &Config, paths: &[PathBuf], recursive: bool) -> Result<()> {
    let files = collect_files(paths, recursive);
    let resolver = Resolver::from_config(&config.resolve);
    info!(files = files.len(), ?resolver, "Resolving capture times");

    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, resolver.resolve(path)))
        .collect();

    let mut failed = 0usize;
    for (path, result) in results {
        match result {
            Ok(time) => println!(
                "{}\t{}\t{}",
                path.display(),
                time.timestamp.format("%Y-%m-%d %H:%M:%S"),
                time.source
            ),
            Err(e) => {
                error!(path = %path.display(), kind = ?e.kind(), "{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} file(s) could not be resolved");
    }
    Ok(())
}

fn run_relocate(config: &Config, source: &Path, dest: &Path, delete: bool) -> Result<()> {
    let relocated = Relocator::new(config.relocate)
        .relocate(source, dest, delete)
        .with_context(|| format!("relocating {}", source.display()))?;

    info!(bytes = relocated.bytes, disposition = ?relocated.source, "Done");
    println!("{}", dest.display());
    Ok(())
}

/// Expand directories into the media files they contain
///
/// Sidecar `.json` files are skipped; they are read through their media file.
fn collect_files(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let is_sidecar = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_sidecar {
                files.push(entry.into_path());
            }
        }
    }

    files
}

/// Setup logging: console always, plus a log file when requested
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (file_writer, guard) = match cli.log_file {
        Some(ref log_path) => {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .with_context(|| format!("opening log file {}", log_path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            (Some(non_blocking), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(file_writer.map(|w| fmt::layer().json().with_ansi(false).with_writer(w)))
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w)))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(guard)
}

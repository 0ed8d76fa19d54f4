//! Copy-then-delete file relocation
//!
//! Files are never renamed: the bytes are streamed into a freshly created
//! destination with [`mode::DEST_MODE`], and for a move the source is removed
//! afterwards. This works across filesystems but is not atomic. A copy that
//! fails halfway leaves the partial destination behind.

pub mod mode;

use crate::config::{DeleteFailurePolicy, Durability, RelocateConfig};
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

const BUF_SIZE: usize = 256 * 1024;

/// What happened to the source after the copy
#[derive(Debug)]
pub enum SourceDisposition {
    /// Copy only
    Kept,
    Deleted,
    /// Source and destination are the same file, nothing was removed
    SameFile,
    /// Removal failed and the policy let it pass
    DeleteFailed(io::Error),
}

/// Summary of a successful relocation
#[derive(Debug)]
pub struct Relocated {
    pub bytes: u64,
    pub source: SourceDisposition,
}

/// Copies or moves files according to a [`RelocateConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Relocator {
    config: RelocateConfig,
}

impl Relocator {
    pub fn new(config: RelocateConfig) -> Self {
        Self { config }
    }

    /// Copy `source` to `dest`, removing `source` afterwards when `delete_source` is set
    ///
    /// `dest` is created or truncated; its parent directory must exist. A failure
    /// to set [`mode::DEST_MODE`] on it is only reported when
    /// `strict_permissions` is configured, otherwise the copy goes ahead.
    ///
    /// The close error surfaced as [`Error::Close`] is the failure of the final
    /// flush (and of the fsync under [`Durability::Sync`]); the result of
    /// close(2) itself is not observable and is dropped with the handle.
    pub fn relocate(&self, source: &Path, dest: &Path, delete_source: bool) -> Result<Relocated> {
        self.relocate_with(source, dest, delete_source, mode::apply)
    }

    fn relocate_with<F>(
        &self,
        source: &Path,
        dest: &Path,
        delete_source: bool,
        set_mode: F,
    ) -> Result<Relocated>
    where
        F: Fn(&File, u32) -> io::Result<()>,
    {
        let src_file = File::open(source).map_err(|e| Error::open(source, e))?;

        let dest_file = File::create(dest).map_err(|e| Error::Create {
            path: dest.to_path_buf(),
            source: e,
        })?;
        if let Err(e) = set_mode(&dest_file, mode::DEST_MODE) {
            self.permissions_failed(dest, e)?;
        }

        let mut reader = BufReader::with_capacity(BUF_SIZE, src_file);
        let mut writer = BufWriter::with_capacity(BUF_SIZE, dest_file);

        let bytes = match copy_stream(&mut reader, &mut writer) {
            Ok(bytes) => bytes,
            Err(e) => {
                // Dropping the writer closes the handle; the partial file stays.
                drop(writer);
                return Err(Error::Copy {
                    from: source.to_path_buf(),
                    to: dest.to_path_buf(),
                    source: e,
                });
            }
        };

        self.close(writer).map_err(|e| Error::Close {
            path: dest.to_path_buf(),
            source: e,
        })?;

        let disposition = if !delete_source {
            SourceDisposition::Kept
        } else if same_file(source, dest) {
            trace!(?source, ?dest, "Source and destination are the same file");
            SourceDisposition::SameFile
        } else {
            match fs::remove_file(source) {
                Ok(()) => SourceDisposition::Deleted,
                Err(e) => self.delete_failed(source, e)?,
            }
        };

        debug!(?source, ?dest, bytes, ?disposition, "Relocated file");
        Ok(Relocated {
            bytes,
            source: disposition,
        })
    }

    /// Flush, and fsync when configured; the handle is closed on drop
    fn close(&self, writer: BufWriter<File>) -> io::Result<()> {
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.config.durability == Durability::Sync {
            file.sync_all()?;
        }
        Ok(())
    }

    fn permissions_failed(&self, dest: &Path, error: io::Error) -> Result<()> {
        if self.config.strict_permissions {
            return Err(Error::Permissions {
                path: dest.to_path_buf(),
                source: error,
            });
        }
        warn!(?dest, %error, "Failed to set destination permissions, copying anyway");
        Ok(())
    }

    fn delete_failed(&self, source: &Path, error: io::Error) -> Result<SourceDisposition> {
        match self.config.on_delete_failure {
            DeleteFailurePolicy::Ignore => {
                trace!(?source, %error, "Ignoring failed source removal");
                Ok(SourceDisposition::DeleteFailed(error))
            }
            DeleteFailurePolicy::Warn => {
                warn!(?source, %error, "Failed to remove source after copy");
                Ok(SourceDisposition::DeleteFailed(error))
            }
            DeleteFailurePolicy::Fail => Err(Error::Delete {
                path: source.to_path_buf(),
                source: error,
            }),
        }
    }
}

/// Copy or move a file with the default policies
///
/// Failures to remove the source are ignored.
pub fn relocate(source: &Path, dest: &Path, delete_source: bool) -> Result<()> {
    Relocator::default()
        .relocate(source, dest, delete_source)
        .map(|_| ())
}

fn copy_stream<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buffer = vec![0u8; BUF_SIZE];
    let mut total = 0u64;
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..bytes_read])?;
        total += bytes_read as u64;
    }
    Ok(total)
}

/// Absolute form of `path`, with symlinks resolved when it exists
fn absolute_form(path: &Path) -> PathBuf {
    dunce::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn same_file(a: &Path, b: &Path) -> bool {
    absolute_form(a) == absolute_form(b)
}

//! Upload directory: accepted files, naming and expiry.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::AlfredError;
use crate::table::{Table, TableError};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default age after which [`UploadStore::sweep`] deletes a file.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3600);

/// How an accepted upload will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Csv,
}

impl UploadKind {
    /// Classify by extension (lowercased, after the last `.`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub kind: UploadKind,
}

/// Stores uploads as `<dir>/<uuid>.<ext>`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the upload directory if needed.
    pub async fn ensure_dir(&self) -> Result<(), AlfredError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and persist an upload. Rejected files are never written.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<UploadedFile, AlfredError> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            error!(file = original_name, size = bytes.len(), "File too large");
            return Err(AlfredError::Upload(
                "File too large. Maximum size is 10MB.".into(),
            ));
        }

        let ext = extension_of(original_name);
        let Some(kind) = UploadKind::from_extension(&ext) else {
            error!(file = original_name, ext = %ext, "Unsupported file type");
            return Err(AlfredError::Upload(
                "Unsupported file type. Use PNG, JPEG, or CSV".into(),
            ));
        };

        if kind == UploadKind::Csv {
            match Table::from_reader(bytes) {
                Ok(_) => {}
                Err(TableError::Empty) => {
                    error!(file = original_name, "Invalid CSV: empty or no columns");
                    return Err(AlfredError::Upload(
                        "Invalid CSV file (empty or no columns)".into(),
                    ));
                }
                Err(e) => {
                    error!(file = original_name, error = %e, "Invalid CSV format");
                    return Err(AlfredError::Upload(format!("Invalid CSV format: {e}")));
                }
            }
        }

        self.ensure_dir().await?;
        let path = self.dir.join(format!("{}.{ext}", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), ?kind, "upload stored");
        Ok(UploadedFile { path, kind })
    }

    /// Delete regular files last modified more than `max_age` ago.
    ///
    /// Returns how many files were removed. Per-file failures are logged and
    /// skipped.
    pub async fn sweep(&self, max_age: Duration) -> usize {
        let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
            return 0;
        };
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "cannot read upload directory");
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "error while listing uploads");
                    break;
                }
            };
            let path = entry.path();
            let modified = match entry.metadata().await {
                Ok(meta) if meta.is_file() => meta.modified(),
                Ok(_) => continue,
                Err(e) => Err(e),
            };
            match modified {
                Ok(mtime) if mtime < cutoff => match tokio::fs::remove_file(&path).await {
                    Ok(()) => {
                        info!(path = %path.display(), "Deleted old file");
                        removed += 1;
                    }
                    Err(e) => error!(path = %path.display(), error = %e, "Error deleting file"),
                },
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "cannot stat upload"),
            }
        }
        removed
    }
}

fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or_default().to_lowercase()
}

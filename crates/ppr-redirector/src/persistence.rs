//! Loading and saving documents
//!
//! Disk access sits behind [`ProfileStore`] so the cache can be exercised
//! without a file system and so save failures can be simulated.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ppr_ini::IniDocument;
use tracing::{debug, error, info};

use crate::entry::ConfigEntry;
use crate::error::{RedirectorError, Result};

/// Backing storage for cached documents.
pub trait ProfileStore: Send + Sync {
    /// Read a document. A missing file is `Ok(None)`, not an error.
    fn load(&self, path: &Path) -> Result<Option<IniDocument>>;

    /// Write a document, replacing the previous contents.
    fn save(&self, path: &Path, document: &IniDocument) -> Result<()>;
}

/// [`ProfileStore`] backed by the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl ProfileStore for FileStore {
    fn load(&self, path: &Path) -> Result<Option<IniDocument>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(IniDocument::from_bytes(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, path: &Path, document: &IniDocument) -> Result<()> {
        std::fs::write(path, document.to_bytes()).map_err(|e| RedirectorError::SaveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Outcome of a batch flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Number of dirty documents written
    pub saved: usize,
    /// Files whose save failed; they stay dirty
    pub failed: Vec<PathBuf>,
}

impl FlushReport {
    /// Whether every dirty document was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Save every dirty entry, continuing past individual failures.
pub fn flush_all<I>(entries: I, message: &str) -> FlushReport
where
    I: IntoIterator<Item = Arc<ConfigEntry>>,
{
    info!("Saving changed files: {message}");

    let mut report = FlushReport::default();
    for entry in entries {
        let mut guard = entry.write();
        if !guard.is_dirty() {
            continue;
        }

        match guard.save() {
            Ok(()) => {
                debug!("Saved {}", entry.path().display());
                report.saved += 1;
            }
            Err(e) => {
                error!("Failed to save {}: {e}", entry.path().display());
                report.failed.push(entry.path().to_path_buf());
            }
        }
    }

    info!(
        "Flush finished: {} saved, {} failed",
        report.saved,
        report.failed.len()
    );
    report
}

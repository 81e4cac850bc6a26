//! Path-keyed document cache
//!
//! Maps normalized file paths to [`ConfigEntry`] instances. Entries are created
//! on first request and live as long as the cache. The map's shard lock is
//! only held while looking up or inserting; loading happens afterwards under
//! the entry's own lock, so I/O on one file never blocks access to another.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::entry::ConfigEntry;
use crate::persistence::{self, FlushReport, ProfileStore};

/// Normalize a file path for use as a cache key.
///
/// Both separator styles become `/`, repeated separators and `.` components
/// are dropped, and the result is lowercased. A leading `//` (UNC prefix) is
/// kept. `..` components are left alone since resolving them needs the file
/// system.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");

    let mut normalized = String::with_capacity(unified.len());
    if unified.starts_with("//") {
        normalized.push_str("//");
    } else if unified.starts_with('/') {
        normalized.push('/');
    }

    let mut first = true;
    for component in unified.split('/') {
        if component.is_empty() || component == "." {
            continue;
        }
        if !first {
            normalized.push('/');
        }
        normalized.push_str(component);
        first = false;
    }

    normalized.to_lowercase()
}

/// Cache of every configuration file touched by the process.
pub struct RedirectorCache {
    entries: DashMap<String, Arc<ConfigEntry>>,
    store: Arc<dyn ProfileStore>,
    save_on_write: bool,
}

impl std::fmt::Debug for RedirectorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectorCache")
            .field("entries", &self.entries.len())
            .field("save_on_write", &self.save_on_write)
            .finish_non_exhaustive()
    }
}

impl RedirectorCache {
    /// Create an empty cache backed by `store`.
    pub fn new(store: Arc<dyn ProfileStore>, save_on_write: bool) -> Self {
        Self {
            entries: DashMap::new(),
            store,
            save_on_write,
        }
    }

    /// Return the entry for `path`, creating and loading it on first use.
    ///
    /// Path spellings that normalize to the same key return the same entry.
    pub fn get_or_load(&self, path: &str) -> Arc<ConfigEntry> {
        let key = normalize_path(path);

        let existing = self.entries.get(&key).map(|e| Arc::clone(e.value()));
        let entry = match existing {
            Some(entry) => entry,
            None => {
                let inserted = self
                    .entries
                    .entry(key.clone())
                    .or_insert_with(|| {
                        debug!("Creating cache entry '{key}' for '{path}'");
                        Arc::new(ConfigEntry::new(
                            path,
                            key.clone(),
                            Arc::clone(&self.store),
                            self.save_on_write,
                        ))
                    });
                Arc::clone(inserted.value())
            }
        };

        entry.ensure_loaded();
        entry
    }

    /// Look up an entry without creating it.
    pub fn get(&self, path: &str) -> Option<Arc<ConfigEntry>> {
        self.entries
            .get(&normalize_path(path))
            .map(|e| Arc::clone(e.value()))
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no file has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<Arc<ConfigEntry>> {
        self.entries.iter().map(|e| Arc::clone(e.value())).collect()
    }

    /// Save every dirty entry. Individual failures are logged and reported,
    /// they do not stop the remaining saves.
    pub fn flush_all(&self, message: &str) -> FlushReport {
        // Collect first so no shard lock is held during I/O
        persistence::flush_all(self.entries(), message)
    }
}

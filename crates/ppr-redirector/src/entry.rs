//! Per-file cache entry with read/write locking
//!
//! A [`ConfigEntry`] owns one [`ConfigDocument`] behind a `parking_lot`
//! read/write lock. Readers share the lock; writers, loads and saves take it
//! exclusively. Access goes through guards, so the lock is released on every
//! exit path.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, trace, warn};

use crate::document::ConfigDocument;
use crate::error::Result;
use crate::persistence::ProfileStore;

#[derive(Debug, Default)]
struct EntryState {
    document: ConfigDocument,
    loaded: bool,
}

/// One cached file.
pub struct ConfigEntry {
    /// Path as first requested, used for disk I/O
    path: PathBuf,
    /// Normalized cache key
    key: String,
    state: RwLock<EntryState>,
    store: Arc<dyn ProfileStore>,
    save_on_write: bool,
}

impl std::fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("path", &self.path)
            .field("key", &self.key)
            .field("save_on_write", &self.save_on_write)
            .finish_non_exhaustive()
    }
}

impl ConfigEntry {
    /// Create an entry that loads lazily from `path` on first access.
    pub fn new(
        path: impl Into<PathBuf>,
        key: impl Into<String>,
        store: Arc<dyn ProfileStore>,
        save_on_write: bool,
    ) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            state: RwLock::new(EntryState::default()),
            store,
            save_on_write,
        }
    }

    /// File path used for loading and saving.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalized cache key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the document from the store unless that already happened.
    ///
    /// Any load failure leaves an empty document that is marked as not
    /// present on disk; it is logged and never reported to the caller.
    pub fn ensure_loaded(&self) {
        if self.state.read().loaded {
            return;
        }

        let mut state = self.state.write();
        if state.loaded {
            return;
        }

        state.document = match self.store.load(&self.path) {
            Ok(Some(ini)) => {
                info!(
                    "Loaded '{}': {} sections",
                    self.path.display(),
                    ini.len()
                );
                ConfigDocument::from_disk(ini)
            }
            Ok(None) => {
                debug!("'{}' not found on disk, starting empty", self.path.display());
                ConfigDocument::empty()
            }
            Err(e) => {
                warn!(
                    "Failed to load '{}', starting empty: {e}",
                    self.path.display()
                );
                ConfigDocument::empty()
            }
        };
        state.loaded = true;
    }

    /// Acquire shared access to the document.
    pub fn read(&self) -> EntryReadGuard<'_> {
        self.ensure_loaded();
        EntryReadGuard {
            state: self.state.read(),
        }
    }

    /// Acquire exclusive access to the document.
    pub fn write(&self) -> EntryWriteGuard<'_> {
        self.ensure_loaded();
        EntryWriteGuard {
            entry: self,
            state: self.state.write(),
        }
    }

    /// Whether the document has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.read().is_dirty()
    }
}

/// Shared access to an entry's document.
pub struct EntryReadGuard<'a> {
    state: RwLockReadGuard<'a, EntryState>,
}

impl Deref for EntryReadGuard<'_> {
    type Target = ConfigDocument;

    fn deref(&self) -> &Self::Target {
        &self.state.document
    }
}

/// Exclusive access to an entry's document.
///
/// Mutations mark the document dirty and, when save-on-write is enabled,
/// persist it before returning.
pub struct EntryWriteGuard<'a> {
    entry: &'a ConfigEntry,
    state: RwLockWriteGuard<'a, EntryState>,
}

impl Deref for EntryWriteGuard<'_> {
    type Target = ConfigDocument;

    fn deref(&self) -> &Self::Target {
        &self.state.document
    }
}

impl EntryWriteGuard<'_> {
    /// Assign a value. Returns `false` if the stored value is already identical.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> bool {
        let changed = self.state.document.set(section, key, value);
        if changed {
            self.on_write();
        }
        changed
    }

    /// Remove a key. Returns `false` if it does not exist.
    pub fn delete_key(&mut self, section: &str, key: &str) -> bool {
        let existed = self.state.document.delete_key(section, key);
        if existed {
            self.on_write();
        }
        existed
    }

    /// Remove a section. Returns `false` if it does not exist.
    pub fn delete_section(&mut self, section: &str) -> bool {
        let existed = self.state.document.delete_section(section);
        if existed {
            self.on_write();
        }
        existed
    }

    /// Write the document to the store.
    ///
    /// On failure the document and its dirty flag are left as they were.
    pub fn save(&mut self) -> Result<()> {
        self.entry
            .store
            .save(&self.entry.path, self.state.document.ini())?;
        self.state.document.mark_saved();
        Ok(())
    }

    fn on_write(&mut self) {
        if !self.entry.save_on_write {
            return;
        }

        match self.save() {
            Ok(()) => trace!("Saved '{}' on write", self.entry.path.display()),
            Err(e) => warn!(
                "Save on write failed for '{}': {e}",
                self.entry.path.display()
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::RedirectorError;
    use parking_lot::Mutex;
    use ppr_ini::IniDocument;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingStore {
        initial: Option<String>,
        loads: AtomicUsize,
        saved: Mutex<Vec<String>>,
        fail_saves: bool,
    }

    impl ProfileStore for RecordingStore {
        fn load(&self, _path: &Path) -> Result<Option<IniDocument>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.initial.as_deref().map(IniDocument::parse_str))
        }

        fn save(&self, path: &Path, document: &IniDocument) -> Result<()> {
            if self.fail_saves {
                return Err(RedirectorError::SaveFailed {
                    path: path.to_path_buf(),
                    reason: "disk full".to_string(),
                });
            }
            self.saved.lock().push(document.to_text());
            Ok(())
        }
    }

    fn entry(store: &Arc<RecordingStore>, save_on_write: bool) -> ConfigEntry {
        let store: Arc<dyn ProfileStore> = store.clone();
        ConfigEntry::new("Test.ini", "test.ini", store, save_on_write)
    }

    #[test]
    fn test_loads_once() {
        let store = Arc::new(RecordingStore {
            initial: Some("[A]\nk=v\n".to_string()),
            ..Default::default()
        });
        let entry = entry(&store, false);

        assert_eq!(entry.read().query("A", "k"), Some("v"));
        assert!(entry.read().existed_on_disk());
        entry.ensure_loaded();
        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let store = Arc::new(RecordingStore::default());
        let entry = entry(&store, false);
        assert!(!entry.read().existed_on_disk());
        assert!(entry.read().section_names().is_empty());
    }

    #[test]
    fn test_set_marks_dirty_without_saving() {
        let store = Arc::new(RecordingStore::default());
        let entry = entry(&store, false);

        assert!(entry.write().set("A", "k", "v"));
        assert!(entry.is_dirty());
        assert!(store.saved.lock().is_empty());
    }

    #[test]
    fn test_save_on_write() {
        let store = Arc::new(RecordingStore::default());
        let entry = entry(&store, true);

        assert!(entry.write().set("A", "k", "v"));
        assert!(!entry.is_dirty());
        assert_eq!(store.saved.lock().as_slice(), ["[A]\r\nk=v\r\n"]);

        // identical value: no mutation, no save
        assert!(!entry.write().set("A", "k", "v"));
        assert_eq!(store.saved.lock().len(), 1);

        // absent target: no mutation, no save
        assert!(!entry.write().delete_key("A", "missing"));
        assert_eq!(store.saved.lock().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let store = Arc::new(RecordingStore {
            fail_saves: true,
            ..Default::default()
        });
        let entry = entry(&store, true);

        assert!(entry.write().set("A", "k", "v"));
        assert!(entry.is_dirty());
        assert_eq!(entry.read().query("A", "k"), Some("v"));
        assert!(entry.write().save().is_err());
        assert!(entry.is_dirty());
    }

    #[test]
    fn test_delete_section_marks_dirty() {
        let store = Arc::new(RecordingStore {
            initial: Some("[A]\nk=v\n[B]\nx=1\n".to_string()),
            ..Default::default()
        });
        let entry = entry(&store, false);

        assert!(entry.write().delete_section("a"));
        assert!(entry.is_dirty());
        assert_eq!(entry.read().section_names(), ["B"]);
    }
}

//! Write path of `WritePrivateProfileString`
//!
//! A write is resolved in this order:
//!
//! 1. No path fails with [`LastError::FileNotFound`], no section or a blank
//!    key with [`LastError::InvalidParameter`]. A blank key could not be
//!    read back from the saved file.
//! 2. No key deletes the whole section.
//! 3. No value deletes the key.
//! 4. Otherwise the value is assigned. An identical value is accepted without
//!    touching the document.
//!
//! Saving after a change is handled by the entry guard. When a native API is
//! configured the caller's arguments are forwarded to it afterwards, but the
//! caller always sees the in-memory outcome.

use tracing::{debug, trace};

use crate::cache::RedirectorCache;
use crate::encoding::{ProfileChar, decode_arg};
use crate::error::LastError;
use crate::hook::{NativeProfileApi, NativeWriteArgs};

/// What a write did to the in-memory document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The arguments were invalid; nothing was touched
    Rejected(LastError),
    /// A section delete was requested
    SectionDeleted {
        /// Whether the section existed
        existed: bool,
    },
    /// A key delete was requested
    KeyDeleted {
        /// Whether the key existed
        existed: bool,
    },
    /// A value was assigned
    Assigned {
        /// `false` if the stored value was already identical
        changed: bool,
    },
}

impl WriteOutcome {
    /// The legacy `BOOL` result.
    pub const fn succeeded(self) -> bool {
        match self {
            Self::Rejected(_) => false,
            Self::SectionDeleted { existed } | Self::KeyDeleted { existed } => existed,
            Self::Assigned { .. } => true,
        }
    }

    /// Last-error code to publish, if any.
    pub const fn last_error(self) -> Option<LastError> {
        match self {
            Self::Rejected(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the document was modified.
    pub const fn is_mutation(self) -> bool {
        match self {
            Self::Rejected(_) => false,
            Self::SectionDeleted { existed } | Self::KeyDeleted { existed } => existed,
            Self::Assigned { changed } => changed,
        }
    }
}

/// Applies writes to cached documents and forwards them to the native API
/// when passthrough is enabled.
pub struct WriteCoordinator<'a> {
    cache: &'a RedirectorCache,
    native: Option<&'a dyn NativeProfileApi>,
}

impl<'a> WriteCoordinator<'a> {
    /// Coordinator that only writes to memory.
    pub const fn new(cache: &'a RedirectorCache) -> Self {
        Self {
            cache,
            native: None,
        }
    }

    /// Also forward every write to `native`.
    #[must_use]
    pub const fn with_passthrough(mut self, native: &'a dyn NativeProfileApi) -> Self {
        self.native = Some(native);
        self
    }

    /// Perform one `WritePrivateProfileString` call.
    pub fn write<C: ProfileChar>(
        &self,
        section: Option<&[C]>,
        key: Option<&[C]>,
        value: Option<&[C]>,
        path: Option<&[C]>,
    ) -> WriteOutcome {
        let outcome = self.write_to_memory(
            decode_arg(section),
            decode_arg(key),
            decode_arg(value),
            decode_arg(path),
        );

        if let Some(native) = self.native {
            trace!("Calling native 'WritePrivateProfileString{}'", C::SUFFIX);
            let native_result = native.write_string(NativeWriteArgs {
                section: section.map(C::native),
                key: key.map(C::native),
                value: value.map(C::native),
                path: path.map(C::native),
            });
            if native_result != outcome.succeeded() {
                debug!(
                    "Native write returned {native_result}, in-memory write returned {}",
                    outcome.succeeded()
                );
            }
        }

        outcome
    }

    fn write_to_memory(
        &self,
        section: Option<String>,
        key: Option<String>,
        value: Option<String>,
        path: Option<String>,
    ) -> WriteOutcome {
        let Some(path) = path else {
            return WriteOutcome::Rejected(LastError::FileNotFound);
        };
        let Some(section) = section else {
            return WriteOutcome::Rejected(LastError::InvalidParameter);
        };
        if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            trace!("Blank key in section '{section}' rejected");
            return WriteOutcome::Rejected(LastError::InvalidParameter);
        }

        let entry = self.cache.get_or_load(&path);
        let mut document = entry.write();

        let Some(key) = key else {
            let existed = document.delete_section(&section);
            if existed {
                trace!("Section '{section}' deleted");
            } else {
                trace!("Section '{section}' not found, nothing deleted");
            }
            return WriteOutcome::SectionDeleted { existed };
        };

        let Some(value) = value else {
            let existed = document.delete_key(&section, &key);
            if existed {
                trace!("Key '{key}' in section '{section}' deleted");
            } else {
                trace!("Key '{key}' in section '{section}' not found, nothing deleted");
            }
            return WriteOutcome::KeyDeleted { existed };
        };

        let changed = document.set(&section, &key, &value);
        if changed {
            trace!("Assigned value '{value}' to key '{key}' in section '{section}'");
        } else {
            trace!(
                "Attempt to assign already existing value '{value}' to key '{key}' in section '{section}', write request ignored"
            );
        }

        WriteOutcome::Assigned { changed }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::persistence::FileStore;
    use std::sync::Arc;

    fn cache() -> RedirectorCache {
        RedirectorCache::new(Arc::new(FileStore), false)
    }

    fn arg(text: &str) -> Option<&[u8]> {
        Some(text.as_bytes())
    }

    #[test]
    fn test_validation() {
        let cache = cache();
        let writer = WriteCoordinator::new(&cache);

        let outcome = writer.write(arg("A"), arg("k"), arg("v"), None);
        assert_eq!(outcome, WriteOutcome::Rejected(LastError::FileNotFound));
        assert!(!outcome.succeeded());

        let outcome = writer.write(None, arg("k"), arg("v"), arg("x.ini"));
        assert_eq!(outcome.last_error(), Some(LastError::InvalidParameter));
        assert!(cache.is_empty());

        for key in ["", "  "] {
            let outcome = writer.write(arg("A"), arg(key), arg("v"), arg("x.ini"));
            assert_eq!(outcome, WriteOutcome::Rejected(LastError::InvalidParameter));
            let outcome = writer.write(arg("A"), arg(key), None, arg("x.ini"));
            assert_eq!(outcome, WriteOutcome::Rejected(LastError::InvalidParameter));
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_then_delete() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("Write.ini").to_string_lossy().into_owned();
        let cache = cache();
        let writer = WriteCoordinator::new(&cache);
        let p = arg(&path);

        let outcome = writer.write(arg("A"), arg("k"), arg("v"), p);
        assert_eq!(outcome, WriteOutcome::Assigned { changed: true });

        let outcome = writer.write(arg("A"), arg("k"), arg("v"), p);
        assert_eq!(outcome, WriteOutcome::Assigned { changed: false });
        assert!(outcome.succeeded());
        assert!(!outcome.is_mutation());

        let outcome = writer.write(arg("a"), arg("K"), None, p);
        assert_eq!(outcome, WriteOutcome::KeyDeleted { existed: true });

        let outcome = writer.write(arg("A"), arg("K"), None, p);
        assert_eq!(outcome, WriteOutcome::KeyDeleted { existed: false });
        assert!(!outcome.succeeded());
        assert_eq!(outcome.last_error(), None);

        let outcome = writer.write(arg("A"), None, None, p);
        assert_eq!(outcome, WriteOutcome::SectionDeleted { existed: true });
        let outcome = writer.write(arg("A"), None, None, p);
        assert_eq!(outcome, WriteOutcome::SectionDeleted { existed: false });
    }

    #[test]
    fn test_wide_write_is_visible_as_text() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("Wide.ini").to_string_lossy().into_owned();
        let cache = cache();
        let writer = WriteCoordinator::new(&cache);

        let wide = |s: &str| s.encode_utf16().collect::<Vec<u16>>();
        let outcome = writer.write(
            Some(wide("Sektion").as_slice()),
            Some(wide("Größe").as_slice()),
            Some(wide("10").as_slice()),
            Some(wide(&path).as_slice()),
        );
        assert!(outcome.succeeded());

        let entry = cache.get_or_load(&path);
        assert_eq!(entry.read().query("SEKTION", "GRÖßE"), Some("10"));
    }
}

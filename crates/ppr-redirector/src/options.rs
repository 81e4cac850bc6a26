//! Redirector options
//!
//! Options are read once at startup and passed into the
//! [`Redirector`](crate::Redirector). They can be built in code or read from
//! the redirector's own INI file:
//!
//! ```ini
//! [General]
//! NativeWrite=0
//! SaveOnWrite=1
//! SaveOnThreadDetach=0
//! EnableLog=1
//! ```

use std::path::Path;

use ppr_ini::IniDocument;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RedirectorError, Result};

/// Section of the options file holding all switches.
pub const OPTIONS_SECTION: &str = "General";

/// Default options file name, looked up next to the host module.
pub const OPTIONS_FILE_NAME: &str = "PrivateProfileRedirector.ini";

/// Behaviour switches for the redirector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectorOptions {
    /// Also forward every write to the real OS API
    pub native_write: bool,
    /// Persist a document immediately after each change
    pub save_on_write: bool,
    /// Flush dirty documents whenever a thread detaches
    pub save_on_thread_detach: bool,
    /// Emit diagnostics
    pub log_enabled: bool,
}

impl RedirectorOptions {
    /// Read options from an INI file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match IniDocument::load(path) {
            Ok(doc) => Self::from_document(&doc),
            Err(ppr_ini::IniError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Options file '{}' not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read options from a parsed INI document.
    pub fn from_document(doc: &IniDocument) -> Result<Self> {
        let flag = |key: &str| -> Result<bool> {
            doc.get(OPTIONS_SECTION, key)
                .map_or(Ok(false), |value| parse_flag(key, value))
        };

        Ok(Self {
            native_write: flag("NativeWrite")?,
            save_on_write: flag("SaveOnWrite")?,
            save_on_thread_detach: flag("SaveOnThreadDetach")?,
            log_enabled: flag("EnableLog")?,
        })
    }

    /// Enable or disable forwarding writes to the OS API
    #[must_use]
    pub const fn with_native_write(mut self, enable: bool) -> Self {
        self.native_write = enable;
        self
    }

    /// Enable or disable saving after each change
    #[must_use]
    pub const fn with_save_on_write(mut self, enable: bool) -> Self {
        self.save_on_write = enable;
        self
    }

    /// Enable or disable flushing on thread detach
    #[must_use]
    pub const fn with_save_on_thread_detach(mut self, enable: bool) -> Self {
        self.save_on_thread_detach = enable;
        self
    }

    /// Enable or disable diagnostics
    #[must_use]
    pub const fn with_log(mut self, enable: bool) -> Self {
        self.log_enabled = enable;
        self
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false") || value.is_empty() {
        return Ok(false);
    }
    match value.parse::<i64>() {
        Ok(n) => Ok(n != 0),
        Err(_) => {
            warn!("Option '{key}' has non-boolean value '{value}'");
            Err(RedirectorError::Options(format!(
                "{key}: expected 0, 1, true or false, got '{value}'"
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RedirectorOptions::default();
        assert!(!options.native_write);
        assert!(!options.save_on_write);
        assert!(!options.save_on_thread_detach);
        assert!(!options.log_enabled);
    }

    #[test]
    fn test_from_document() {
        let doc = IniDocument::parse_str(
            "[General]\nNativeWrite=0\nSaveOnWrite=1\nsaveonthreaddetach=true\nEnableLog=2\n",
        );
        let options = RedirectorOptions::from_document(&doc).unwrap();
        assert_eq!(
            options,
            RedirectorOptions::default()
                .with_save_on_write(true)
                .with_save_on_thread_detach(true)
                .with_log(true)
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let options = RedirectorOptions::default()
            .with_native_write(true)
            .with_log(true);
        let json = serde_json::to_string(&options).unwrap();
        let parsed: RedirectorOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_serde_missing_fields_default() {
        let parsed: RedirectorOptions =
            serde_json::from_str(r#"{"save_on_write":true}"#).unwrap();
        assert_eq!(parsed, RedirectorOptions::default().with_save_on_write(true));
    }

    #[test]
    fn test_invalid_flag() {
        let doc = IniDocument::parse_str("[General]\nSaveOnWrite=sometimes\n");
        let result = RedirectorOptions::from_document(&doc);
        assert!(matches!(result, Err(RedirectorError::Options(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let options = RedirectorOptions::load(dir.path().join(OPTIONS_FILE_NAME)).unwrap();
        assert_eq!(options, RedirectorOptions::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(OPTIONS_FILE_NAME);
        std::fs::write(&path, "[General]\r\nNativeWrite=1\r\n").unwrap();
        let options = RedirectorOptions::load(&path).unwrap();
        assert!(options.native_write);
        assert!(!options.save_on_write);
    }
}

//! Error types for redirector operations
//!
//! Internal operations return [`RedirectorError`]. Nothing of that type ever
//! crosses the profile API boundary: the API reports failures as a legacy
//! return value plus a [`LastError`] code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur inside the redirector.
#[derive(Debug, Error)]
pub enum RedirectorError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The INI engine rejected the file contents.
    #[error("INI error: {0}")]
    Ini(#[from] ppr_ini::IniError),

    /// A document could not be written back to disk.
    #[error("Failed to save {path}: {reason}")]
    SaveFailed {
        /// File that was being saved
        path: PathBuf,
        /// Why the save failed
        reason: String,
    },

    /// Invalid redirector options.
    #[error("Invalid options: {0}")]
    Options(String),
}

/// Result type for redirector operations.
pub type Result<T> = std::result::Result<T, RedirectorError>;

/// OS-style last-error values reported alongside legacy return values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LastError {
    /// No file path was supplied (`ERROR_FILE_NOT_FOUND`)
    FileNotFound,
    /// A required name was missing (`ERROR_INVALID_PARAMETER`)
    InvalidParameter,
    /// The destination buffer could not hold the full result
    /// (`ERROR_INSUFFICIENT_BUFFER`)
    InsufficientBuffer,
}

impl LastError {
    /// Numeric code as published through the OS last-error slot.
    pub const fn code(self) -> u32 {
        match self {
            Self::FileNotFound => 2,
            Self::InvalidParameter => 87,
            Self::InsufficientBuffer => 122,
        }
    }

    /// Symbolic name of the code.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FileNotFound => "ERROR_FILE_NOT_FOUND",
            Self::InvalidParameter => "ERROR_INVALID_PARAMETER",
            Self::InsufficientBuffer => "ERROR_INSUFFICIENT_BUFFER",
        }
    }
}

impl std::fmt::Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

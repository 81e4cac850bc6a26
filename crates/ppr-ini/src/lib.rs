//! Order-preserving INI document engine.
//!
//! This crate models the section/key/value text files consumed by the legacy
//! private profile API family. Documents keep sections and keys in the order
//! they were read so that a load/modify/save cycle touches only what changed.
//!
//! # Format
//!
//! ```text
//! ; comment attached to the section below
//! [Display]
//! iSize W=1920
//! iSize H=1080
//!
//! [Audio]
//! fVolume=0.8
//! ```
//!
//! - Section and key lookups are case-insensitive, stored names keep their
//!   original spelling
//! - Keys that appear before any section header belong to the unnamed section
//! - Text encoding (UTF-8, UTF-8 with BOM, UTF-16LE with BOM, Latin-1) and line
//!   endings are detected on load and reproduced on save
//!
//! # Example
//!
//! ```rust
//! use ppr_ini::{IniDocument, SetOutcome};
//!
//! let mut doc = IniDocument::parse_str("[General]\nbEnabled=1\n");
//! assert_eq!(doc.get("general", "BENABLED"), Some("1"));
//! assert_eq!(doc.set("General", "bEnabled", "0"), SetOutcome::Updated);
//! assert_eq!(doc.to_text(), "[General]\nbEnabled=0\n");
//! ```

#![warn(missing_docs)]

use thiserror::Error;

mod document;
mod parser;
mod text;
mod writer;

pub use document::{Entry, IniDocument, Section, SetOutcome};
pub use text::{LineEnding, TextEncoding};

/// Result type for INI operations.
pub type Result<T> = std::result::Result<T, IniError>;

/// Errors that can occur while reading or writing INI documents.
#[derive(Debug, Error)]
pub enum IniError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte stream cannot be decoded as text.
    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(String),
}

/// Compare two section or key names the way profile lookups do.
pub fn names_equal(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

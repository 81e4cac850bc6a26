//! Shared in-memory cache behind the legacy private profile API family.
//!
//! Independent callers inside one host process read and write INI files
//! through `GetPrivateProfileString`, `GetPrivateProfileInt`,
//! `GetPrivateProfileSectionNames`, `GetPrivateProfileSection` and
//! `WritePrivateProfileString`. This crate answers those calls from a single
//! path-keyed document cache so every caller sees one consistent view of a
//! file, and disk I/O happens only on explicit saves.
//!
//! The return values reproduce the fixed-buffer contract of the legacy Win32 API:
//! truncation rules, double-null-terminated name lists, and last-error codes.
//!
//! # Architecture
//!
//! ```text
//! hooked entry point (platform shim)
//!          │
//!          ▼
//!   Redirector (api)  ──► RedirectorCache ──► ConfigEntry (RwLock)
//!          │                                     │
//!          ▼                                     ▼
//!  marshal / multistring                  ConfigDocument ◄──► ProfileStore
//! ```
//!
//! Patching the process's function table is outside this crate; it is reached
//! through the [`hook::HookInstaller`] trait.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ppr_redirector::{Redirector, RedirectorOptions, persistence::FileStore};
//!
//! let dir = std::env::temp_dir();
//! let path = dir.join("ppr-doc-example.ini");
//! let path = path.to_string_lossy();
//!
//! let redirector = Redirector::new(RedirectorOptions::default(), Arc::new(FileStore));
//! let response = redirector.write_string(
//!     Some(b"General".as_slice()),
//!     Some(b"sName".as_slice()),
//!     Some(b"Test".as_slice()),
//!     Some(path.as_bytes()),
//! );
//! assert!(response.value);
//!
//! let mut buffer = [0u8; 16];
//! let response = redirector.get_string(
//!     Some(b"general".as_slice()),
//!     Some(b"SNAME".as_slice()),
//!     None,
//!     &mut buffer,
//!     Some(path.as_bytes()),
//! );
//! assert_eq!(response.value, 4);
//! assert_eq!(&buffer[..5], b"Test\0");
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod cache;
pub mod document;
pub mod encoding;
pub mod entry;
pub mod error;
pub mod hook;
pub mod marshal;
pub mod multistring;
pub mod options;
pub mod persistence;
pub mod redirector;
pub mod writer;

pub use api::ProfileResponse;
pub use cache::RedirectorCache;
pub use document::ConfigDocument;
pub use encoding::ProfileChar;
pub use entry::ConfigEntry;
pub use error::{LastError, RedirectorError, Result};
pub use options::RedirectorOptions;
pub use persistence::{FileStore, FlushReport, ProfileStore};
pub use redirector::Redirector;

/// Version information for the redirector.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name reported in diagnostics.
pub const LIBRARY_NAME: &str = "PrivateProfileRedirector";

//! Command-line driver for the profile redirector.
//!
//! Runs one private profile API call against a file on disk through the same
//! cache and buffer rules the hooked functions use, then flushes any change.
//!
//! ```text
//! ppr Skyrim.ini get General sLanguage
//! ppr --wide --capacity 8 Skyrim.ini sections
//! ppr Skyrim.ini write Display iSize\ W 1920
//! ppr --save-on-write Skyrim.ini options
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ppr_redirector::options::OPTIONS_FILE_NAME;
use ppr_redirector::{FileStore, ProfileChar, ProfileResponse, Redirector, RedirectorOptions};

#[derive(Debug, Parser)]
#[command(
    name = "ppr",
    about = "Query and edit INI files through the private profile redirector",
    version
)]
struct Cli {
    /// Redirector options file
    #[arg(long, env = "PPR_OPTIONS", default_value = OPTIONS_FILE_NAME)]
    options: PathBuf,

    /// Save after every change instead of once on exit
    #[arg(long, env = "PPR_SAVE_ON_WRITE")]
    save_on_write: bool,

    /// Enable diagnostics (filter with `RUST_LOG`)
    #[arg(long, env = "PPR_LOG")]
    log: bool,

    /// Use the wide (UTF-16) API flavour
    #[arg(long)]
    wide: bool,

    /// Destination buffer capacity in text units
    #[arg(long, default_value_t = 32_768)]
    capacity: usize,

    /// INI file to operate on
    file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Read a value (`GetPrivateProfileString`)
    Get {
        section: String,
        key: String,
        /// Returned when the key does not exist
        #[arg(long)]
        default: Option<String>,
    },
    /// Read an integer (`GetPrivateProfileInt`)
    GetInt {
        section: String,
        key: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        default: i32,
    },
    /// List section names (`GetPrivateProfileSectionNames`)
    Sections,
    /// List the key names of a section
    Keys { section: String },
    /// List the entries of a section (`GetPrivateProfileSection`)
    Section { section: String },
    /// Assign a value (`WritePrivateProfileString`)
    Write {
        section: String,
        key: String,
        value: String,
    },
    /// Delete a key, or the whole section when no key is given
    Delete { section: String, key: Option<String> },
    /// Save every cached file with unsaved changes
    Flush,
    /// Print the effective redirector options as JSON
    Options,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = RedirectorOptions::load(&cli.options)
        .with_context(|| format!("Failed to read options from {}", cli.options.display()))?;
    let options = RedirectorOptions {
        save_on_write: options.save_on_write || cli.save_on_write,
        log_enabled: options.log_enabled || cli.log,
        ..options
    };

    let default_filter = if options.log_enabled { "info" } else { "off" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let redirector = Redirector::new(options, Arc::new(FileStore));
    let status = if cli.wide {
        run::<u16>(&redirector, &cli)
    } else {
        run::<u8>(&redirector, &cli)
    };

    let report = redirector.flush_all("On exit");
    if !report.is_complete() {
        bail!("Failed to save {:?}", report.failed);
    }
    status
}

fn run<C: ProfileChar>(redirector: &Redirector, cli: &Cli) -> Result<()> {
    let path = C::encode(&cli.file);
    let path = Some(path.as_slice());
    let mut buffer = vec![C::NUL; cli.capacity];

    match &cli.command {
        Command::Get {
            section,
            key,
            default,
        } => {
            let section = C::encode(section);
            let key = C::encode(key);
            let default = default.as_deref().map(C::encode);
            let response = redirector.get_string(
                Some(section.as_slice()),
                Some(key.as_slice()),
                default.as_deref(),
                &mut buffer,
                path,
            );
            report(&response);
            println!("{}", C::decode(until_len(&buffer, response.value)));
        }
        Command::GetInt {
            section,
            key,
            default,
        } => {
            let section = C::encode(section);
            let key = C::encode(key);
            let response = redirector.get_int(
                Some(section.as_slice()),
                Some(key.as_slice()),
                *default,
                path,
            );
            report(&response);
            println!("{}", response.value.cast_signed());
        }
        Command::Sections => {
            let response = redirector.get_section_names(&mut buffer, path);
            report(&response);
            print_list(until_len(&buffer, response.value));
        }
        Command::Keys { section } => {
            let section = C::encode(section);
            let response =
                redirector.get_string(Some(section.as_slice()), None, None, &mut buffer, path);
            report(&response);
            print_list(until_len(&buffer, response.value));
        }
        Command::Section { section } => {
            let section = C::encode(section);
            let response = redirector.get_section(Some(section.as_slice()), &mut buffer, path);
            report(&response);
            print_list(until_len(&buffer, response.value));
        }
        Command::Write {
            section,
            key,
            value,
        } => {
            let section = C::encode(section);
            let key = C::encode(key);
            let value = C::encode(value);
            let response = redirector.write_string(
                Some(section.as_slice()),
                Some(key.as_slice()),
                Some(value.as_slice()),
                path,
            );
            report(&response);
            if !response.value {
                bail!("Write rejected");
            }
        }
        Command::Delete { section, key } => {
            let section = C::encode(section);
            let key = key.as_deref().map(C::encode);
            let response =
                redirector.write_string(Some(section.as_slice()), key.as_deref(), None, path);
            report(&response);
            if !response.value {
                bail!("Nothing to delete");
            }
        }
        Command::Flush => {
            redirector.cache().get_or_load(&cli.file);
            let report = redirector.flush_all("On request");
            println!("{} saved, {} failed", report.saved, report.failed.len());
        }
        Command::Options => {
            let json = serde_json::to_string_pretty(redirector.options())
                .context("Failed to serialize options")?;
            println!("{json}");
        }
    }

    Ok(())
}

/// The first `len` units of `buffer`, clamped to its size.
fn until_len<C>(buffer: &[C], len: u32) -> &[C] {
    let len = usize::try_from(len).unwrap_or(usize::MAX).min(buffer.len());
    &buffer[..len]
}

fn print_list<C: ProfileChar>(units: &[C]) {
    for name in units.split(|&c| c == C::NUL).filter(|name| !name.is_empty()) {
        println!("{}", C::decode(name));
    }
}

fn report<T: std::fmt::Debug>(response: &ProfileResponse<T>) {
    tracing::debug!("Returned {:?}", response.value);
    if let Some(error) = response.last_error {
        eprintln!("last error: {error}");
    }
}

//! The private profile API surface
//!
//! Each method mirrors one legacy function for both text flavours: `C = u8`
//! for the `A` functions and `C = u16` for the `W` functions. A `None`
//! argument stands for a null pointer. The destination buffer's length is the
//! capacity passed by the caller; an empty slice stands for a null buffer.
//!
//! Nothing here fails with a Rust error. Every call returns the legacy value
//! together with the last-error code the shim should publish.

use tracing::{Level, trace, warn};

use crate::encoding::{ProfileChar, decode_arg, until_nul};
use crate::error::LastError;
use crate::marshal::copy_to_fixed_buffer;
use crate::multistring::MultiString;
use crate::redirector::Redirector;
use crate::writer::WriteCoordinator;

/// A legacy return value and the last-error code that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ProfileResponse<T> {
    /// Value returned to the caller
    pub value: T,
    /// Code to publish through the OS last-error slot, if any
    pub last_error: Option<LastError>,
}

impl<T> ProfileResponse<T> {
    /// A response that leaves the last error untouched.
    pub const fn ok(value: T) -> Self {
        Self {
            value,
            last_error: None,
        }
    }

    /// A response that sets the last error.
    pub const fn error(value: T, last_error: LastError) -> Self {
        Self {
            value,
            last_error: Some(last_error),
        }
    }
}

fn dword(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Parse an integer the way the legacy API reads numbers: surrounding
/// whitespace ignored, optional sign, optional `0x` prefix for hex. Values
/// outside both the signed and unsigned 32-bit range are rejected.
pub fn parse_profile_int(text: &str) -> Option<u32> {
    let text = text.trim();
    let (negative, digits) = if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text.strip_prefix('+').unwrap_or(text))
    };

    let (radix, digits) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    u32::try_from(value)
        .ok()
        .or_else(|| i32::try_from(value).ok().map(i32::cast_unsigned))
}

impl Redirector {
    /// `GetPrivateProfileString`
    ///
    /// With no section, lists all section names. With no key, lists the key
    /// names of `section`. Otherwise copies the value, or `default` if the
    /// value does not exist.
    pub fn get_string<C: ProfileChar>(
        &self,
        section: Option<&[C]>,
        key: Option<&[C]>,
        default: Option<&[C]>,
        buffer: &mut [C],
        path: Option<&[C]>,
    ) -> ProfileResponse<u32> {
        let section = decode_arg(section);
        let key = decode_arg(key);
        let path = decode_arg(path);
        trace!(
            "GetPrivateProfileString{}: section: {section:?}, key: {key:?}, buffer size: {}, path: {path:?}",
            C::SUFFIX,
            buffer.len()
        );

        let Some(path) = path else {
            return ProfileResponse::error(0, LastError::FileNotFound);
        };
        if buffer.len() < 2 {
            buffer.fill(C::NUL);
            return ProfileResponse::error(0, LastError::InsufficientBuffer);
        }

        let entry = self.cache().get_or_load(&path);
        let document = entry.read();

        let Some(section) = section else {
            trace!("Enum all sections of file '{path}'");
            let names = document
                .section_names()
                .into_iter()
                .filter(|name| !name.is_empty());
            let list = MultiString::from_names(names, buffer.len());
            return copy_list("sections", &list, buffer);
        };

        let Some(key) = key else {
            trace!("Enum all keys in '{section}' section of file '{path}'");
            let list = MultiString::from_names(document.key_names(&section), buffer.len());
            return copy_list("keys", &list, buffer);
        };

        if let Some(value) = document.query(&section, &key) {
            trace!("Value found: '{value}'");
            return copy_value(&C::encode(value), buffer);
        }

        match default {
            Some(default) => {
                trace!("Couldn't find the requested data, returning default");
                copy_value(until_nul(default), buffer)
            }
            None => {
                trace!("Couldn't find the requested data, returning empty string");
                copy_to_fixed_buffer(buffer, &[C::NUL]);
                ProfileResponse::ok(0)
            }
        }
    }

    /// `GetPrivateProfileInt`
    ///
    /// Returns `default` when the value is missing or is not a number.
    pub fn get_int<C: ProfileChar>(
        &self,
        section: Option<&[C]>,
        key: Option<&[C]>,
        default: i32,
        path: Option<&[C]>,
    ) -> ProfileResponse<u32> {
        let section = decode_arg(section);
        let key = decode_arg(key);
        let path = decode_arg(path);
        trace!(
            "GetPrivateProfileInt{}: section: {section:?}, key: {key:?}, default: {default}, path: {path:?}",
            C::SUFFIX
        );

        let fallback = default.cast_unsigned();
        let Some(path) = path else {
            return ProfileResponse::error(fallback, LastError::FileNotFound);
        };
        let (Some(section), Some(key)) = (section, key) else {
            return ProfileResponse::error(fallback, LastError::InvalidParameter);
        };

        let entry = self.cache().get_or_load(&path);
        let document = entry.read();

        match document.query(&section, &key) {
            Some(text) => match parse_profile_int(text) {
                Some(value) => {
                    trace!("String '{text}' converted to an integer: '{value}'");
                    ProfileResponse::ok(value)
                }
                None => {
                    trace!(
                        "Couldn't convert string '{text}' to an integer, returning default: {default}"
                    );
                    ProfileResponse::ok(fallback)
                }
            },
            None => {
                trace!("Couldn't find the requested data, returning default: {default}");
                ProfileResponse::ok(fallback)
            }
        }
    }

    /// `GetPrivateProfileSectionNames`
    pub fn get_section_names<C: ProfileChar>(
        &self,
        buffer: &mut [C],
        path: Option<&[C]>,
    ) -> ProfileResponse<u32> {
        self.get_string(None, None, None, buffer, path)
    }

    /// `GetPrivateProfileSection`
    ///
    /// Lists the section's entries as `key=value` strings.
    pub fn get_section<C: ProfileChar>(
        &self,
        section: Option<&[C]>,
        buffer: &mut [C],
        path: Option<&[C]>,
    ) -> ProfileResponse<u32> {
        let section = decode_arg(section);
        let path = decode_arg(path);
        trace!(
            "GetPrivateProfileSection{}: section: {section:?}, buffer size: {}, path: {path:?}",
            C::SUFFIX,
            buffer.len()
        );

        let Some(path) = path else {
            return ProfileResponse::error(0, LastError::FileNotFound);
        };
        let Some(section) = section else {
            return ProfileResponse::error(0, LastError::InvalidParameter);
        };
        if buffer.len() < 2 {
            buffer.fill(C::NUL);
            return ProfileResponse::error(0, LastError::InsufficientBuffer);
        }

        let entry = self.cache().get_or_load(&path);
        let document = entry.read();

        trace!("Enum all key-value from section '{section}' of file '{path}'");
        let pairs: Vec<String> = document
            .section_pairs(&section)
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let list = MultiString::from_names(pairs.iter().map(String::as_str), buffer.len());
        copy_list("key-value pairs", &list, buffer)
    }

    /// `WritePrivateProfileString`
    ///
    /// No key deletes the section, no value deletes the key. The result is
    /// the in-memory outcome even when the write is also forwarded to the
    /// native API.
    pub fn write_string<C: ProfileChar>(
        &self,
        section: Option<&[C]>,
        key: Option<&[C]>,
        value: Option<&[C]>,
        path: Option<&[C]>,
    ) -> ProfileResponse<bool> {
        if tracing::enabled!(Level::TRACE) {
            trace!(
                "WritePrivateProfileString{}: section: {:?}, key: {:?}, value: {:?}, path: {:?}",
                C::SUFFIX,
                decode_arg(section),
                decode_arg(key),
                decode_arg(value),
                decode_arg(path)
            );
        }

        let mut writer = WriteCoordinator::new(self.cache());
        if self.options().native_write
            && let Some(native) = self.native()
        {
            writer = writer.with_passthrough(native);
        }

        let outcome = writer.write(section, key, value, path);
        ProfileResponse {
            value: outcome.succeeded(),
            last_error: outcome.last_error(),
        }
    }
}

/// Copy a single string and derive the legacy return length.
fn copy_value<C: ProfileChar>(value: &[C], buffer: &mut [C]) -> ProfileResponse<u32> {
    let copy = copy_to_fixed_buffer(buffer, value);
    if copy.truncated {
        trace!("Value truncated to {} units", buffer.len() - 1);
        ProfileResponse::error(dword(buffer.len() - 1), LastError::InsufficientBuffer)
    } else {
        ProfileResponse::ok(dword(value.len()))
    }
}

/// Copy a multi-string and derive the legacy return length.
fn copy_list<C: ProfileChar>(
    what: &str,
    list: &MultiString<C>,
    buffer: &mut [C],
) -> ProfileResponse<u32> {
    trace!(
        "Enumerated {} of {} {what} in {} units, is truncated: {}",
        list.count(),
        list.total(),
        list.len(),
        list.is_truncated()
    );

    let copy = copy_to_fixed_buffer(buffer, list.as_units());
    if copy.truncated || list.is_truncated() {
        warn!(
            "Buffer of {} units too small for {what}: {} of {} included",
            buffer.len(),
            list.count(),
            list.total()
        );
        ProfileResponse::error(dword(buffer.len() - 2), LastError::InsufficientBuffer)
    } else {
        ProfileResponse::ok(dword(list.len() - 1))
    }
}

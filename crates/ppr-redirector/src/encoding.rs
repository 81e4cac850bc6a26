//! Narrow and wide text units
//!
//! The profile API comes in an `A` flavour (bytes) and a `W` flavour (UTF-16
//! code units). [`ProfileChar`] abstracts over both so the API surface,
//! marshaller and multi-string builder are written once. Narrow text maps
//! each byte to the code point of the same value (ISO-8859-1), so any byte
//! string an `A` caller passes in comes back out unchanged. The INI engine
//! works on `String` internally and uses the same mapping for files that are
//! not valid UTF-8.

use std::fmt::Debug;

/// Borrowed raw text in whichever flavour the caller used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeStr<'a> {
    /// `A` API text
    Narrow(&'a [u8]),
    /// `W` API text
    Wide(&'a [u16]),
}

/// A text unit accepted by the profile API.
pub trait ProfileChar: Copy + Eq + Default + Debug + Send + Sync + 'static {
    /// The string terminator.
    const NUL: Self;

    /// Suffix of the API flavour, `A` or `W`.
    const SUFFIX: &'static str;

    /// Convert units to engine text. Invalid sequences are replaced.
    fn decode(units: &[Self]) -> String;

    /// Convert engine text to units, without a terminator. Characters the
    /// flavour cannot represent become `?`.
    fn encode(text: &str) -> Vec<Self>;

    /// Wrap units for forwarding to the native API.
    fn native(units: &[Self]) -> NativeStr<'_>;

    /// Append the little-endian byte representation of `units` to `out`.
    fn extend_bytes(units: &[Self], out: &mut Vec<u8>);
}

impl ProfileChar for u8 {
    const NUL: Self = 0;
    const SUFFIX: &'static str = "A";

    fn decode(units: &[Self]) -> String {
        units.iter().copied().map(char::from).collect()
    }

    fn encode(text: &str) -> Vec<Self> {
        text.chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect()
    }

    fn native(units: &[Self]) -> NativeStr<'_> {
        NativeStr::Narrow(units)
    }

    fn extend_bytes(units: &[Self], out: &mut Vec<u8>) {
        out.extend_from_slice(units);
    }
}

impl ProfileChar for u16 {
    const NUL: Self = 0;
    const SUFFIX: &'static str = "W";

    fn decode(units: &[Self]) -> String {
        String::from_utf16_lossy(units)
    }

    fn encode(text: &str) -> Vec<Self> {
        text.encode_utf16().collect()
    }

    fn native(units: &[Self]) -> NativeStr<'_> {
        NativeStr::Wide(units)
    }

    fn extend_bytes(units: &[Self], out: &mut Vec<u8>) {
        for unit in units {
            out.extend_from_slice(&unit.to_le_bytes());
        }
    }
}

/// The part of `units` before the first terminator, or all of it.
pub fn until_nul<C: ProfileChar>(units: &[C]) -> &[C] {
    let len = units.iter().position(|&c| c == C::NUL).unwrap_or(units.len());
    &units[..len]
}

/// Decode an optional caller string, stopping at its terminator.
pub fn decode_arg<C: ProfileChar>(units: Option<&[C]>) -> Option<String> {
    units.map(|u| C::decode(until_nul(u)))
}

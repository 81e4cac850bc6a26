//! Text encoding and line ending detection

use crate::{IniError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Encoding of the file a document was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 without byte order mark
    #[default]
    Utf8,
    /// UTF-8 preceded by `EF BB BF`
    Utf8Bom,
    /// UTF-16 little endian preceded by `FF FE`
    Utf16Le,
    /// Single-byte text that is not valid UTF-8, kept byte for byte
    Latin1,
}

/// Line terminator used when writing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\r\n`
    #[default]
    CrLf,
    /// `\n`
    Lf,
}

impl LineEnding {
    /// Terminator text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CrLf => "\r\n",
            Self::Lf => "\n",
        }
    }

    /// Pick the terminator used by `text`, `CrLf` when it has no line breaks.
    pub(crate) fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(pos) if pos == 0 || text.as_bytes()[pos - 1] != b'\r' => Self::Lf,
            _ => Self::CrLf,
        }
    }
}

/// Decode raw file bytes into text, reporting the encoding that was used.
pub(crate) fn decode(bytes: &[u8]) -> Result<(String, TextEncoding)> {
    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        return Ok((
            String::from_utf8_lossy(rest).into_owned(),
            TextEncoding::Utf8Bom,
        ));
    }

    if let Some(rest) = bytes.strip_prefix(&UTF16LE_BOM) {
        if rest.len() % 2 != 0 {
            return Err(IniError::InvalidEncoding(format!(
                "UTF-16LE stream has odd byte count {}",
                rest.len()
            )));
        }
        let units = rest
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
        let text = char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        return Ok((text, TextEncoding::Utf16Le));
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok((text.to_owned(), TextEncoding::Utf8)),
        Err(_) => Ok((
            bytes.iter().copied().map(char::from).collect(),
            TextEncoding::Latin1,
        )),
    }
}

/// Encode text for writing in the given encoding.
pub(crate) fn encode(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Utf8 => text.as_bytes().to_vec(),
        TextEncoding::Utf8Bom => {
            let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
            out.extend_from_slice(&UTF8_BOM);
            out.extend_from_slice(text.as_bytes());
            out
        }
        TextEncoding::Utf16Le => {
            let mut out = Vec::with_capacity(UTF16LE_BOM.len() + text.len() * 2);
            out.extend_from_slice(&UTF16LE_BOM);
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out
        }
        // Characters outside the single-byte range can only come from new
        // values written through the API.
        TextEncoding::Latin1 => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect(),
    }
}

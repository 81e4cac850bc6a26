//! Line-oriented INI parser

use crate::document::IniDocument;
use crate::text::{LineEnding, TextEncoding};

/// Split a `key=value` line on the first `=`.
fn parse_pair(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Extract the name from a `[name]` header line.
fn parse_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(rest[..end].trim())
}

fn is_comment(line: &str) -> bool {
    line.starts_with(';') || line.starts_with('#')
}

/// Parse decoded text into a document.
///
/// Parsing never fails: lines that are neither headers, comments nor
/// `key=value` pairs are skipped.
pub(crate) fn parse(text: &str, encoding: TextEncoding) -> IniDocument {
    let mut doc = IniDocument {
        encoding,
        line_ending: LineEnding::detect(text),
        ..IniDocument::default()
    };

    let mut current: Option<usize> = None;
    let mut pending_comments = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();

        if line.is_empty() {
            continue;
        }

        if is_comment(line) {
            pending_comments.push(line.to_owned());
            continue;
        }

        if let Some(name) = parse_header(line) {
            let index = doc.section_index_or_insert(name);
            doc.sections[index].comments.append(&mut pending_comments);
            current = Some(index);
            continue;
        }

        if let Some((key, value)) = parse_pair(line) {
            let index = match current {
                Some(index) => index,
                None => doc.section_index_or_insert(""),
            };
            let comments = std::mem::take(&mut pending_comments);
            doc.sections[index].upsert(key, value, comments);
        } else {
            pending_comments.clear();
        }
    }

    doc.trailing_comments = pending_comments;
    doc
}

//! In-memory INI document model

use std::io::Read;
use std::path::Path;

use crate::text::{self, LineEnding, TextEncoding};
use crate::{Result, names_equal};

/// Result of assigning a value with [`IniDocument::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The key did not exist and was appended
    Inserted,
    /// The key existed with a different value
    Updated,
    /// The key already held exactly this value, nothing was changed
    Unchanged,
}

impl SetOutcome {
    /// Whether the document was modified.
    pub const fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// A single `key=value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub(crate) key: String,
    pub(crate) value: String,
    pub(crate) comments: Vec<String>,
}

impl Entry {
    /// Key as first spelled in the file.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw value text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Comment lines written directly above this key.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }
}

/// A named section with its keys in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub(crate) name: String,
    pub(crate) comments: Vec<String>,
    pub(crate) entries: Vec<Entry>,
}

impl Section {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            comments: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Section name, empty for keys that precede the first header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Comment lines written directly above the header.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Key names in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].value.as_str())
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the section has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| names_equal(&e.key, key))
    }

    /// Assign a value, appending the key when it is new.
    pub(crate) fn upsert(&mut self, key: &str, value: &str, comments: Vec<String>) -> SetOutcome {
        match self.position(key) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.comments.extend(comments);
                if entry.value == value {
                    SetOutcome::Unchanged
                } else {
                    value.clone_into(&mut entry.value);
                    SetOutcome::Updated
                }
            }
            None => {
                self.entries.push(Entry {
                    key: key.to_owned(),
                    value: value.to_owned(),
                    comments,
                });
                SetOutcome::Inserted
            }
        }
    }
}

/// An ordered INI document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniDocument {
    pub(crate) sections: Vec<Section>,
    pub(crate) trailing_comments: Vec<String>,
    pub(crate) encoding: TextEncoding,
    pub(crate) line_ending: LineEnding,
}

impl IniDocument {
    /// Create an empty document that will be written as UTF-8 with `\r\n`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from text.
    pub fn parse_str(text: &str) -> Self {
        crate::parser::parse(text, TextEncoding::Utf8)
    }

    /// Parse a document from raw file bytes, detecting the text encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (text, encoding) = text::decode(bytes)?;
        Ok(crate::parser::parse(&text, encoding))
    }

    /// Parse a document from a reader.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Read and parse a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Encoding used when the document is serialized.
    pub const fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Change the encoding used when the document is serialized.
    pub fn set_encoding(&mut self, encoding: TextEncoding) {
        self.encoding = encoding;
    }

    /// Line terminator used when the document is serialized.
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Change the line terminator used when the document is serialized.
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Sections in file order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Find a section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| names_equal(&s.name, name))
    }

    /// Section names in file order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Key names of a section in file order, `None` if the section is absent.
    pub fn key_names<'a>(
        &'a self,
        section: &str,
    ) -> Option<impl Iterator<Item = &'a str> + use<'a>> {
        self.section(section).map(|s| s.keys())
    }

    /// Look up a value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Assign a value, creating the section and key as needed.
    ///
    /// Names and value are trimmed the same way the parser trims them, so a
    /// stored value reads back unchanged after a save and reload. A value
    /// identical to the stored one leaves the document untouched and reports
    /// [`SetOutcome::Unchanged`].
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> SetOutcome {
        let index = self.section_index_or_insert(section.trim());
        self.sections[index].upsert(key.trim(), value.trim(), Vec::new())
    }

    /// Remove a key. Returns `false` if the section or key does not exist.
    ///
    /// The section itself is kept even when its last key is removed.
    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        let Some(section) = self.sections.iter_mut().find(|s| names_equal(&s.name, section))
        else {
            return false;
        };
        match section.position(key) {
            Some(index) => {
                section.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove a section and all of its keys. Returns `false` if it does not exist.
    pub fn remove_section(&mut self, section: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| !names_equal(&s.name, section));
        self.sections.len() != before
    }

    /// Index of the named section, appending it when absent.
    ///
    /// The unnamed section is always kept first so it can be written without
    /// a header.
    pub(crate) fn section_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(index) = self.sections.iter().position(|s| names_equal(&s.name, name)) {
            return index;
        }
        if name.is_empty() {
            self.sections.insert(0, Section::new(name));
            0
        } else {
            self.sections.push(Section::new(name));
            self.sections.len() - 1
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> IniDocument {
        IniDocument::parse_str("[Display]\nWidth=1920\nHeight=1080\n\n[Audio]\nVolume=0.8\n")
    }

    #[test]
    fn test_get_case_insensitive() {
        let doc = sample();
        assert_eq!(doc.get("display", "WIDTH"), Some("1920"));
        assert_eq!(doc.get("Audio", "volume"), Some("0.8"));
        assert_eq!(doc.get("Audio", "Missing"), None);
        assert_eq!(doc.get("Missing", "Volume"), None);
    }

    #[test]
    fn test_names_preserve_order() {
        let doc = sample();
        assert_eq!(doc.section_names().collect::<Vec<_>>(), ["Display", "Audio"]);
        assert_eq!(
            doc.key_names("DISPLAY").unwrap().collect::<Vec<_>>(),
            ["Width", "Height"]
        );
        assert!(doc.key_names("Nope").is_none());
    }

    #[test]
    fn test_set_outcomes() {
        let mut doc = sample();
        assert_eq!(doc.set("Display", "Width", "1920"), SetOutcome::Unchanged);
        assert_eq!(doc.set("display", "width", "2560"), SetOutcome::Updated);
        assert_eq!(doc.get("Display", "Width"), Some("2560"));
        assert_eq!(doc.set("Display", "Depth", "32"), SetOutcome::Inserted);
        assert_eq!(doc.set("Input", "Mouse", "1"), SetOutcome::Inserted);

        assert_eq!(
            doc.section_names().collect::<Vec<_>>(),
            ["Display", "Audio", "Input"]
        );
        assert_eq!(
            doc.key_names("Display").unwrap().collect::<Vec<_>>(),
            ["Width", "Height", "Depth"]
        );
    }

    #[test]
    fn test_set_keeps_stored_key_spelling() {
        let mut doc = sample();
        doc.set("DISPLAY", "WIDTH", "800");
        assert_eq!(doc.section("display").unwrap().entries()[0].key(), "Width");
        assert_eq!(doc.sections()[0].name(), "Display");
    }

    #[test]
    fn test_set_value_comparison_is_exact() {
        let mut doc = IniDocument::parse_str("[A]\nk=Value\n");
        assert_eq!(doc.set("A", "k", "value"), SetOutcome::Updated);
        assert!(SetOutcome::Updated.is_changed());
        assert!(!SetOutcome::Unchanged.is_changed());
    }

    #[test]
    fn test_set_trims_like_parser() {
        let mut doc = IniDocument::new();
        assert_eq!(doc.set(" A ", " k ", "  padded  "), SetOutcome::Inserted);
        assert_eq!(doc.get("A", "k"), Some("padded"));
        assert_eq!(doc.set("A", "k", "padded "), SetOutcome::Unchanged);

        let reread = IniDocument::parse_str(&doc.to_text());
        assert_eq!(reread, doc);
    }

    #[test]
    fn test_remove_key() {
        let mut doc = sample();
        assert!(doc.remove_key("display", "height"));
        assert!(!doc.remove_key("Display", "Height"));
        assert!(!doc.remove_key("Nope", "Height"));
        assert_eq!(doc.get("Display", "Width"), Some("1920"));

        assert!(doc.remove_key("Audio", "Volume"));
        let audio = doc.section("Audio").unwrap();
        assert!(audio.is_empty());
    }

    #[test]
    fn test_remove_section() {
        let mut doc = sample();
        assert!(doc.remove_section("DISPLAY"));
        assert!(!doc.remove_section("Display"));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("Display", "Width"), None);
    }

    #[test]
    fn test_unnamed_section_stays_first() {
        let mut doc = sample();
        doc.set("", "Version", "3");
        assert_eq!(doc.sections()[0].name(), "");
        assert_eq!(doc.get("", "version"), Some("3"));
    }

    #[test]
    fn test_new_document_is_empty() {
        let doc = IniDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.encoding(), TextEncoding::Utf8);
        assert_eq!(doc.line_ending(), LineEnding::CrLf);
    }

    #[test]
    fn test_read_from_reader() {
        let doc = IniDocument::read_from(std::io::Cursor::new(b"[R]\nk=v\n".to_vec())).unwrap();
        assert_eq!(doc.get("R", "k"), Some("v"));
    }
}

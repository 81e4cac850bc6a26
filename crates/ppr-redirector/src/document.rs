//! A cached INI document with its modification state

use ppr_ini::IniDocument;

/// One parsed INI file together with whether it came from disk and whether it
/// has unsaved changes.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    ini: IniDocument,
    existed_on_disk: bool,
    dirty: bool,
}

impl ConfigDocument {
    /// An empty document for a file that was not found (or could not be read).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A document freshly loaded from disk.
    pub fn from_disk(ini: IniDocument) -> Self {
        Self {
            ini,
            existed_on_disk: true,
            dirty: false,
        }
    }

    /// The underlying INI document.
    pub const fn ini(&self) -> &IniDocument {
        &self.ini
    }

    /// Whether a file was found when the document was loaded.
    pub const fn existed_on_disk(&self) -> bool {
        self.existed_on_disk
    }

    /// Whether the document changed since it was last saved.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Look up a value.
    pub fn query(&self, section: &str, key: &str) -> Option<&str> {
        self.ini.get(section, key)
    }

    /// Section names in document order.
    pub fn section_names(&self) -> Vec<&str> {
        self.ini.section_names().collect()
    }

    /// Key names of a section in document order, empty if it does not exist.
    pub fn key_names(&self, section: &str) -> Vec<&str> {
        self.ini
            .key_names(section)
            .map(Iterator::collect)
            .unwrap_or_default()
    }

    /// Key/value pairs of a section in document order, empty if it does not exist.
    pub fn section_pairs(&self, section: &str) -> Vec<(&str, &str)> {
        self.ini
            .section(section)
            .map(|s| s.entries().iter().map(|e| (e.key(), e.value())).collect())
            .unwrap_or_default()
    }

    /// Assign a value. Returns `false`, leaving the document clean, if the
    /// key already holds exactly `value`.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> bool {
        let changed = self.ini.set(section, key, value).is_changed();
        self.dirty |= changed;
        changed
    }

    /// Remove a key. Returns `false` if it does not exist.
    pub fn delete_key(&mut self, section: &str, key: &str) -> bool {
        let existed = self.ini.remove_key(section, key);
        self.dirty |= existed;
        existed
    }

    /// Remove a section. Returns `false` if it does not exist.
    pub fn delete_section(&mut self, section: &str) -> bool {
        let existed = self.ini.remove_section(section);
        self.dirty |= existed;
        existed
    }

    /// Record a successful save.
    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
        self.existed_on_disk = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loaded() -> ConfigDocument {
        ConfigDocument::from_disk(IniDocument::parse_str(
            "[A]\nx=1\ny=2\n[B]\nz=3\n",
        ))
    }

    #[test]
    fn test_from_disk_is_clean() {
        let doc = loaded();
        assert!(doc.existed_on_disk());
        assert!(!doc.is_dirty());
        assert!(!ConfigDocument::empty().existed_on_disk());
    }

    #[test]
    fn test_enumeration_order() {
        let doc = loaded();
        assert_eq!(doc.section_names(), ["A", "B"]);
        assert_eq!(doc.key_names("a"), ["x", "y"]);
        assert!(doc.key_names("missing").is_empty());
        assert_eq!(doc.section_pairs("A"), [("x", "1"), ("y", "2")]);
    }

    #[test]
    fn test_identical_set_stays_clean() {
        let mut doc = loaded();
        assert!(!doc.set("A", "x", "1"));
        assert!(!doc.is_dirty());
        assert!(doc.set("A", "x", "5"));
        assert!(doc.is_dirty());
        assert_eq!(doc.query("A", "X"), Some("5"));
    }

    #[test]
    fn test_deleting_absent_target_stays_clean() {
        let mut doc = loaded();
        assert!(!doc.delete_key("A", "nope"));
        assert!(!doc.delete_section("nope"));
        assert!(!doc.is_dirty());

        assert!(doc.delete_key("A", "x"));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_mark_saved() {
        let mut doc = ConfigDocument::empty();
        doc.delete_section("A");
        doc.set("A", "k", "v");
        assert!(doc.is_dirty());
        doc.mark_saved();
        assert!(!doc.is_dirty());
        assert!(doc.existed_on_disk());
    }
}

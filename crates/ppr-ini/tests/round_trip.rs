#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Load/modify/save behaviour on realistic game configuration files

use ppr_ini::{IniDocument, SetOutcome, TextEncoding};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SKYRIM_PREFS: &str = "[Display]\r\n\
fShadowLODMaxStartFade=1000.0000\r\n\
iSize H=1080\r\n\
iSize W=1920\r\n\
\r\n\
[Imagespace]\r\n\
bDoDepthOfField=1\r\n\
\r\n\
[Launcher]\r\n\
bEnableFileSelection=1\r\n\
uLastAspectRatio=3\r\n";

#[test]
fn unmodified_document_is_byte_identical() {
    let doc = IniDocument::from_bytes(SKYRIM_PREFS.as_bytes()).unwrap();
    assert_eq!(doc.to_bytes(), SKYRIM_PREFS.as_bytes());
}

#[test]
fn modification_only_touches_target_line() {
    let mut doc = IniDocument::from_bytes(SKYRIM_PREFS.as_bytes()).unwrap();
    assert_eq!(doc.set("display", "isize w", "2560"), SetOutcome::Updated);

    let expected = SKYRIM_PREFS.replace("iSize W=1920", "iSize W=2560");
    assert_eq!(doc.to_text(), expected);
}

#[test]
fn bom_is_written_back() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"[A]\r\nk=v\r\n");
    let doc = IniDocument::from_bytes(&bytes).unwrap();
    assert_eq!(doc.encoding(), TextEncoding::Utf8Bom);
    assert_eq!(doc.to_bytes(), bytes);
}

#[test]
fn save_and_load_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("Plugin.ini");

    let mut doc = IniDocument::new();
    doc.set("Main", "Enabled", "1");
    doc.save(&path).unwrap();

    let loaded = IniDocument::load(&path).unwrap();
    assert_eq!(loaded.get("MAIN", "enabled"), Some("1"));
    assert_eq!(loaded, doc);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = IniDocument::load(dir.path().join("absent.ini"));
    assert!(matches!(result, Err(ppr_ini::IniError::Io(_))));
}

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _.]{0,12}".prop_map(|s| s.trim_end().to_string())
}

fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.,;= -]{0,16}"
}

proptest! {
    #[test]
    fn set_then_get_returns_value(section in name(), key in name(), value in value()) {
        let mut doc = IniDocument::parse_str(SKYRIM_PREFS);
        doc.set(&section, &key, &value);
        prop_assert_eq!(doc.get(&section, &key), Some(value.trim()));
    }

    #[test]
    fn saved_text_reparses_to_same_values(
        pairs in prop::collection::vec((name(), name(), value()), 1..12)
    ) {
        let mut doc = IniDocument::new();
        for (section, key, value) in &pairs {
            doc.set(section, key, value);
        }
        let reparsed = IniDocument::parse_str(&doc.to_text());
        for section in doc.sections() {
            for entry in section.entries() {
                prop_assert_eq!(reparsed.get(section.name(), entry.key()), Some(entry.value()));
            }
        }
    }
}

//! INI serialization

use std::io::Write;
use std::path::Path;

use crate::Result;
use crate::document::IniDocument;
use crate::text;

impl IniDocument {
    /// Render the document as text using its line ending.
    ///
    /// Keys are written as `key=value` with no padding around `=`, sections
    /// are separated by a blank line.
    pub fn to_text(&self) -> String {
        let nl = self.line_ending.as_str();
        let mut out = String::new();

        for section in &self.sections {
            if !out.is_empty() {
                out.push_str(nl);
            }
            for comment in &section.comments {
                out.push_str(comment);
                out.push_str(nl);
            }
            if !section.name.is_empty() {
                out.push('[');
                out.push_str(&section.name);
                out.push(']');
                out.push_str(nl);
            }
            for entry in &section.entries {
                for comment in &entry.comments {
                    out.push_str(comment);
                    out.push_str(nl);
                }
                out.push_str(&entry.key);
                out.push('=');
                out.push_str(&entry.value);
                out.push_str(nl);
            }
        }

        if !self.trailing_comments.is_empty() {
            if !out.is_empty() {
                out.push_str(nl);
            }
            for comment in &self.trailing_comments {
                out.push_str(comment);
                out.push_str(nl);
            }
        }

        out
    }

    /// Serialize the document in its text encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        text::encode(&self.to_text(), self.encoding)
    }

    /// Write the serialized document to a writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize the document to a file, replacing its contents.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }
}

//! Plain text output.

use super::registry::{FormatError, Formatter};
use crate::vartok::editor::EditorConfig;
use crate::vartok::tree::Document;

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn serialize(&self, doc: &Document, _config: &EditorConfig) -> Result<String, FormatError> {
        let mut text = doc.text_content();
        text.push('\n');
        Ok(text)
    }

    fn description(&self) -> &str {
        "Plain text, paragraphs separated by blank lines"
    }
}

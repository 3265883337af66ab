//! HTML export.
//!
//!     Every paragraph becomes a `<p>` holding the exported element of each leaf. Export
//!     uses `export_dom`, so variables carry their theme inline and no class names.

use super::registry::{FormatError, Formatter};
use crate::vartok::dom::DomElement;
use crate::vartok::editor::EditorConfig;
use crate::vartok::tree::Document;

pub fn to_html_str(doc: &Document, config: &EditorConfig) -> String {
    let mut output = String::new();
    for paragraph in doc.paragraphs() {
        let mut element = DomElement::new("p");
        for key in doc.children(*paragraph).unwrap_or(&[]) {
            if let Ok(node) = doc.text_node(*key) {
                element.push_child(node.export_dom(config));
            }
        }
        output.push_str(&element.to_html());
        output.push('\n');
    }
    output
}

pub struct HtmlFormatter;

impl Formatter for HtmlFormatter {
    fn name(&self) -> &str {
        "html"
    }

    fn serialize(&self, doc: &Document, config: &EditorConfig) -> Result<String, FormatError> {
        Ok(to_html_str(doc, config))
    }

    fn description(&self) -> &str {
        "Exported HTML, one paragraph per line"
    }
}

//! Editor state formatters: the serialized tree as JSON or YAML.

use super::registry::{FormatError, Formatter};
use crate::vartok::editor::EditorConfig;
use crate::vartok::serialization::export_document;
use crate::vartok::tree::Document;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, doc: &Document, _config: &EditorConfig) -> Result<String, FormatError> {
        Ok(export_document(doc).to_json_pretty()?)
    }

    fn description(&self) -> &str {
        "Serialized editor state as pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, doc: &Document, _config: &EditorConfig) -> Result<String, FormatError> {
        Ok(export_document(doc).to_yaml()?)
    }

    fn description(&self) -> &str {
        "Serialized editor state as YAML"
    }
}

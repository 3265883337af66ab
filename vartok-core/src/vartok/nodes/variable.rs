//! Variable nodes: atomic `[name]` tokens.
//!
//!     A variable is a [TextNode] tagged [TextKind::Variable]. It keeps the full marker,
//!     brackets included, as its text, is created in token mode and always reports itself
//!     as a token, so the editor selects and deletes it as a whole and never merges it with
//!     neighbouring text.
//!
//!     Serialized shape: the base text node fields with `type: "variable"` and
//!     `version: 1`.
//!
//!     Rendering: the live element gets the variable theme (color pairing, padding,
//!     rounded corners, bold weight) plus the theme class. The export element is a bare
//!     `span` with the same text and theme styles and no class.

use serde::{Deserialize, Serialize};

use super::text::{TextMode, TextNode};
use super::TextKind;
use crate::vartok::dom::DomElement;
use crate::vartok::serialization::SerializedTextNode;

pub const VARIABLE_TYPE: &str = "variable";
pub const VARIABLE_VERSION: u32 = 1;

/// Presentation of variable nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableTheme {
    pub color: String,
    pub background_color: String,
    pub padding: String,
    pub border_radius: String,
    pub font_weight: String,
    pub class_name: String,
}

impl Default for VariableTheme {
    fn default() -> Self {
        Self {
            color: "#0070F3".to_string(),
            background_color: "#E0F2FE".to_string(),
            padding: "2px 6px".to_string(),
            border_radius: "4px".to_string(),
            font_weight: "bold".to_string(),
            class_name: "variable-node".to_string(),
        }
    }
}

/// Create a variable node holding `text` verbatim.
pub fn create_variable_node(text: impl Into<String>) -> TextNode {
    TextNode::with_kind(TextKind::Variable, text).with_mode(TextMode::Token)
}

pub fn is_variable_node(node: &TextNode) -> bool {
    node.kind() == TextKind::Variable
}

pub(crate) fn export_json(node: &TextNode) -> SerializedTextNode {
    SerializedTextNode {
        node_type: VARIABLE_TYPE.to_string(),
        version: VARIABLE_VERSION,
        ..node.export_base_json()
    }
}

pub(crate) fn import_json(serialized: &SerializedTextNode) -> TextNode {
    let mut node = create_variable_node(serialized.text.clone());
    node.apply_serialized_fields(serialized);
    node
}

/// Apply the variable theme to a live element.
pub(crate) fn decorate(dom: &mut DomElement, theme: &VariableTheme) {
    apply_theme_styles(dom, theme);
    dom.set_class_name(theme.class_name.as_str());
}

pub(crate) fn export_dom(node: &TextNode, theme: &VariableTheme) -> DomElement {
    let mut element = DomElement::new("span").with_text(node.text());
    apply_theme_styles(&mut element, theme);
    element
}

fn apply_theme_styles(dom: &mut DomElement, theme: &VariableTheme) {
    let declarations = [
        ("color", &theme.color),
        ("background-color", &theme.background_color),
        ("padding", &theme.padding),
        ("border-radius", &theme.border_radius),
        ("font-weight", &theme.font_weight),
    ];
    for (property, value) in declarations {
        if !value.is_empty() {
            dom.set_style(property, value.as_str());
        }
    }
}

//! Leaf nodes of the document tree.
//!
//!     All leaves share one text capability, [TextNode]: a run of characters plus format
//!     flags, detail flags, an edit mode and an inline style. What a leaf *is* comes from
//!     its [TextKind] tag rather than from a separate type, so the tree stores, splits and
//!     serializes every leaf the same way and only the kind-specific pieces dispatch on
//!     the tag:
//!
//!         - Text: ordinary editable text. See [text].
//!         - Variable: an atomic `[name]` token. See [variable].

pub mod text;
pub mod variable;

pub use text::{TextDetail, TextFormat, TextMode, TextNode, TextTheme};
pub use variable::{create_variable_node, is_variable_node, VariableTheme};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The registered kind of a leaf node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    /// Plain editable text (`"text"`).
    Text,
    /// Atomic variable token (`"variable"`).
    Variable,
}

impl TextKind {
    /// The serialized `type` tag.
    pub fn type_tag(self) -> &'static str {
        match self {
            TextKind::Text => text::TEXT_TYPE,
            TextKind::Variable => variable::VARIABLE_TYPE,
        }
    }

    /// Resolve a serialized `type` tag, if it names a leaf kind.
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            text::TEXT_TYPE => Some(TextKind::Text),
            variable::VARIABLE_TYPE => Some(TextKind::Variable),
            _ => None,
        }
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_tag())
    }
}

//! Editor state import and export.
//!
//!     The serialized editor state mirrors the tree:
//!
//!         { "root": { "children": [ paragraph, ... ], "direction": null, "format": "",
//!                     "indent": 0, "type": "root", "version": 1 } }
//!
//!     Paragraphs share the element shape with `type: "paragraph"`. Leaves carry the text
//!     node fields (`detail`, `format`, `mode`, `style`, `text`, `type`, `version`) and
//!     are rebuilt by dispatching on `type`. A leaf type that the importing editor has not
//!     registered is rejected rather than silently degraded to plain text.

use serde::{Deserialize, Serialize};

use crate::vartok::nodes::{TextDetail, TextFormat, TextKind, TextMode, TextNode};
use crate::vartok::tree::{Document, DocumentError, ElementKind, NodeKey};

pub const ELEMENT_VERSION: u32 = 1;

/// Errors raised while reading or writing serialized state.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("invalid editor state JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid editor state YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),
    #[error("node type '{0}' is not registered with the editor")]
    UnregisteredNode(String),
    #[error("'{parent}' nodes cannot contain '{child}' nodes")]
    InvalidChild { parent: String, child: String },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Serialized leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedTextNode {
    #[serde(default)]
    pub detail: TextDetail,
    #[serde(default)]
    pub format: TextFormat,
    #[serde(default)]
    pub mode: TextMode,
    #[serde(default)]
    pub style: String,
    pub text: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

/// Serialized root or paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedElementNode {
    pub children: Vec<SerializedNode>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub indent: u32,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl SerializedElementNode {
    fn new(kind: ElementKind, children: Vec<SerializedNode>) -> Self {
        Self {
            children,
            direction: None,
            format: String::new(),
            indent: 0,
            node_type: kind.type_tag().to_string(),
            version: ELEMENT_VERSION,
        }
    }
}

/// Any serialized node. Elements are recognized by their `children` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedNode {
    Element(SerializedElementNode),
    Text(SerializedTextNode),
}

impl SerializedNode {
    pub fn node_type(&self) -> &str {
        match self {
            SerializedNode::Element(element) => &element.node_type,
            SerializedNode::Text(text) => &text.node_type,
        }
    }
}

/// A whole serialized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEditorState {
    pub root: SerializedElementNode,
}

impl SerializedEditorState {
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, SerializationError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn default_version() -> u32 {
    1
}

/// Serialize a document.
pub fn export_document(document: &Document) -> SerializedEditorState {
    let paragraphs = document
        .paragraphs()
        .iter()
        .map(|paragraph| {
            let leaves = document
                .children(*paragraph)
                .unwrap_or(&[])
                .iter()
                .filter_map(|key| document.text_node(*key).ok())
                .map(|node| SerializedNode::Text(node.export_json()))
                .collect();
            SerializedNode::Element(SerializedElementNode::new(ElementKind::Paragraph, leaves))
        })
        .collect();
    SerializedEditorState {
        root: SerializedElementNode::new(ElementKind::Root, paragraphs),
    }
}

/// Rebuild a document. Every imported leaf is dirty.
///
/// `is_registered` decides whether a leaf kind may be imported.
pub fn import_document<F>(
    state: &SerializedEditorState,
    is_registered: F,
) -> Result<Document, SerializationError>
where
    F: Fn(TextKind) -> bool,
{
    if state.root.node_type != ElementKind::Root.type_tag() {
        return Err(SerializationError::InvalidChild {
            parent: "editor state".to_string(),
            child: state.root.node_type.clone(),
        });
    }
    let mut document = Document::new();
    for child in &state.root.children {
        let paragraph = match child {
            SerializedNode::Element(element)
                if element.node_type == ElementKind::Paragraph.type_tag() =>
            {
                element
            }
            other => {
                return Err(invalid_child_or_unknown(ElementKind::Root, other));
            }
        };
        let key = document.append_paragraph();
        import_leaves(&mut document, key, paragraph, &is_registered)?;
    }
    Ok(document)
}

fn import_leaves<F>(
    document: &mut Document,
    paragraph: NodeKey,
    element: &SerializedElementNode,
    is_registered: &F,
) -> Result<(), SerializationError>
where
    F: Fn(TextKind) -> bool,
{
    for child in &element.children {
        let SerializedNode::Text(serialized) = child else {
            return Err(invalid_child_or_unknown(ElementKind::Paragraph, child));
        };
        let node = TextNode::import_json(serialized)?;
        if !is_registered(node.kind()) {
            return Err(SerializationError::UnregisteredNode(serialized.node_type.clone()));
        }
        document.append_text(paragraph, node)?;
    }
    Ok(())
}

fn invalid_child_or_unknown(parent: ElementKind, child: &SerializedNode) -> SerializationError {
    let tag = child.node_type();
    let known = TextKind::from_type_tag(tag).is_some()
        || tag == ElementKind::Root.type_tag()
        || tag == ElementKind::Paragraph.type_tag();
    if known {
        SerializationError::InvalidChild {
            parent: parent.type_tag().to_string(),
            child: tag.to_string(),
        }
    } else {
        SerializationError::UnknownNodeType(tag.to_string())
    }
}

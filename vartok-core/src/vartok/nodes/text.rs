//! The shared text capability.
//!
//!     [TextNode] holds the payload every leaf carries. Plain text and variables differ
//!     only in their [TextKind] tag; the tag decides atomicity, the serialized `type` and
//!     the extra DOM decoration applied on top of the base text rendering.
//!
//! Format Flags
//!
//!     Formats are bit flags, matching the serialized `format` number:
//!
//!         bold 1, italic 2, strikethrough 4, underline 8,
//!         code 16, subscript 32, superscript 64, highlight 128
//!
//!     Detail flags: directionless 1, unmergeable 2.
//!
//! Modes
//!
//!     normal: editable, splittable, mergeable with equal neighbours.
//!     token: selected and deleted as a whole; never merged.
//!     segmented: deleted segment by segment; never merged.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

use super::variable;
use super::TextKind;
use crate::vartok::dom::DomElement;
use crate::vartok::editor::EditorConfig;
use crate::vartok::serialization::{SerializationError, SerializedTextNode};

pub const TEXT_TYPE: &str = "text";
pub const TEXT_VERSION: u32 = 1;

/// Format bit flags of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextFormat(u32);

impl TextFormat {
    pub const BOLD: TextFormat = TextFormat(1);
    pub const ITALIC: TextFormat = TextFormat(1 << 1);
    pub const STRIKETHROUGH: TextFormat = TextFormat(1 << 2);
    pub const UNDERLINE: TextFormat = TextFormat(1 << 3);
    pub const CODE: TextFormat = TextFormat(1 << 4);
    pub const SUBSCRIPT: TextFormat = TextFormat(1 << 5);
    pub const SUPERSCRIPT: TextFormat = TextFormat(1 << 6);
    pub const HIGHLIGHT: TextFormat = TextFormat(1 << 7);

    pub const fn empty() -> Self {
        TextFormat(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        TextFormat(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: TextFormat) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: TextFormat) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: TextFormat) {
        self.0 &= !other.0;
    }
}

impl BitOr for TextFormat {
    type Output = TextFormat;

    fn bitor(self, rhs: TextFormat) -> TextFormat {
        TextFormat(self.0 | rhs.0)
    }
}

/// Detail bit flags of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextDetail(u32);

impl TextDetail {
    pub const DIRECTIONLESS: TextDetail = TextDetail(1);
    pub const UNMERGEABLE: TextDetail = TextDetail(1 << 1);

    pub const fn empty() -> Self {
        TextDetail(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        TextDetail(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: TextDetail) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Edit mode of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Normal,
    Token,
    Segmented,
}

/// Class names applied to live text elements, one per format flag.
///
/// An empty string means "no class" for that flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextTheme {
    pub bold: String,
    pub italic: String,
    pub strikethrough: String,
    pub underline: String,
    pub code: String,
    pub subscript: String,
    pub superscript: String,
    pub highlight: String,
}

impl TextTheme {
    /// Space separated classes for every flag set in `format`.
    pub fn classes_for(&self, format: TextFormat) -> String {
        let flagged = [
            (TextFormat::BOLD, &self.bold),
            (TextFormat::ITALIC, &self.italic),
            (TextFormat::STRIKETHROUGH, &self.strikethrough),
            (TextFormat::UNDERLINE, &self.underline),
            (TextFormat::CODE, &self.code),
            (TextFormat::SUBSCRIPT, &self.subscript),
            (TextFormat::SUPERSCRIPT, &self.superscript),
            (TextFormat::HIGHLIGHT, &self.highlight),
        ];
        flagged
            .iter()
            .filter(|(flag, class)| format.contains(*flag) && !class.is_empty())
            .map(|(_, class)| class.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TextTheme {
    fn default() -> Self {
        Self {
            bold: "text-bold".to_string(),
            italic: "text-italic".to_string(),
            strikethrough: "text-strikethrough".to_string(),
            underline: "text-underline".to_string(),
            code: "text-code".to_string(),
            subscript: "text-subscript".to_string(),
            superscript: "text-superscript".to_string(),
            highlight: "text-highlight".to_string(),
        }
    }
}

/// Semantic wrappers used when exporting formatted text, innermost first.
const EXPORT_WRAPPERS: [(TextFormat, &str); 4] = [
    (TextFormat::UNDERLINE, "u"),
    (TextFormat::STRIKETHROUGH, "s"),
    (TextFormat::ITALIC, "i"),
    (TextFormat::BOLD, "b"),
];

fn tag_for(format: TextFormat) -> &'static str {
    if format.contains(TextFormat::CODE) {
        "code"
    } else {
        "span"
    }
}

/// A leaf holding a contiguous run of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    kind: TextKind,
    text: String,
    format: TextFormat,
    detail: TextDetail,
    mode: TextMode,
    style: String,
}

impl TextNode {
    /// Create a plain text node in normal mode with no formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_kind(TextKind::Text, text)
    }

    pub(crate) fn with_kind(kind: TextKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            format: TextFormat::empty(),
            detail: TextDetail::empty(),
            mode: TextMode::Normal,
            style: String::new(),
        }
    }

    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_detail(mut self, detail: TextDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_mode(mut self, mode: TextMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn kind(&self) -> TextKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> TextFormat {
        self.format
    }

    pub fn detail(&self) -> TextDetail {
        self.detail
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_format(&mut self, format: TextFormat) {
        self.format = format;
    }

    pub fn set_detail(&mut self, detail: TextDetail) {
        self.detail = detail;
    }

    pub fn set_mode(&mut self, mode: TextMode) {
        self.mode = mode;
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    /// Plain text in normal mode: safe to split at any character offset.
    pub fn is_simple_text(&self) -> bool {
        self.kind == TextKind::Text && self.mode == TextMode::Normal
    }

    /// Whether the node is selected and deleted as a single unit.
    pub fn is_token(&self) -> bool {
        match self.kind {
            TextKind::Variable => true,
            TextKind::Text => self.mode == TextMode::Token,
        }
    }

    pub fn is_unmergeable(&self) -> bool {
        self.detail.contains(TextDetail::UNMERGEABLE)
    }

    /// Two adjacent nodes merge when both are simple, mergeable and styled alike.
    pub fn can_merge_with(&self, other: &TextNode) -> bool {
        self.is_simple_text()
            && other.is_simple_text()
            && !self.is_unmergeable()
            && !other.is_unmergeable()
            && self.format == other.format
            && self.style == other.style
    }

    /// Split off everything from `offset` into a new node carrying the same attributes.
    ///
    /// `offset` must lie on a char boundary; the tree validates it before calling.
    pub(crate) fn split_off(&mut self, offset: usize) -> TextNode {
        let tail = self.text.split_off(offset);
        TextNode {
            kind: self.kind,
            text: tail,
            format: self.format,
            detail: self.detail,
            mode: self.mode,
            style: self.style.clone(),
        }
    }

    /// Serialized form, tagged with this node's kind.
    pub fn export_json(&self) -> SerializedTextNode {
        match self.kind {
            TextKind::Text => self.export_base_json(),
            TextKind::Variable => variable::export_json(self),
        }
    }

    pub(crate) fn export_base_json(&self) -> SerializedTextNode {
        SerializedTextNode {
            detail: self.detail,
            format: self.format,
            mode: self.mode,
            style: self.style.clone(),
            text: self.text.clone(),
            node_type: TEXT_TYPE.to_string(),
            version: TEXT_VERSION,
        }
    }

    /// Rebuild a node from its serialized form, dispatching on the `type` tag.
    pub fn import_json(serialized: &SerializedTextNode) -> Result<TextNode, SerializationError> {
        match TextKind::from_type_tag(&serialized.node_type) {
            Some(TextKind::Text) => {
                let mut node = TextNode::new(serialized.text.clone());
                node.apply_serialized_fields(serialized);
                Ok(node)
            }
            Some(TextKind::Variable) => Ok(variable::import_json(serialized)),
            None => Err(SerializationError::UnknownNodeType(serialized.node_type.clone())),
        }
    }

    pub(crate) fn apply_serialized_fields(&mut self, serialized: &SerializedTextNode) {
        self.format = serialized.format;
        self.detail = serialized.detail;
        self.mode = serialized.mode;
        self.style = serialized.style.clone();
    }

    /// Live element for this node.
    pub fn create_dom(&self, config: &EditorConfig) -> DomElement {
        let mut dom = DomElement::new(tag_for(self.format)).with_text(self.text.as_str());
        dom.set_class_name(config.theme.text.classes_for(self.format));
        dom.apply_css_text(&self.style);
        if self.kind == TextKind::Variable {
            variable::decorate(&mut dom, &config.theme.variable);
        }
        dom
    }

    /// Patch `dom`, rendered from `prev`, so it reflects `self`.
    ///
    /// Returns `true` when the element cannot be patched and must be recreated.
    pub fn update_dom(
        &self,
        prev: &TextNode,
        dom: &mut DomElement,
        config: &EditorConfig,
    ) -> bool {
        if tag_for(prev.format) != tag_for(self.format) {
            return true;
        }
        if prev.text != self.text {
            dom.set_text(self.text.as_str());
        }
        if prev.format != self.format {
            dom.set_class_name(config.theme.text.classes_for(self.format));
        }
        if prev.style != self.style {
            dom.clear_styles();
            dom.apply_css_text(&self.style);
        }
        if self.kind == TextKind::Variable {
            variable::decorate(dom, &config.theme.variable);
        }
        false
    }

    /// Element used outside the live tree (HTML export).
    pub fn export_dom(&self, config: &EditorConfig) -> DomElement {
        if self.kind == TextKind::Variable {
            return variable::export_dom(self, &config.theme.variable);
        }
        let mut element = DomElement::new(tag_for(self.format)).with_text(self.text.as_str());
        element.apply_css_text(&self.style);
        for (flag, tag) in EXPORT_WRAPPERS {
            if self.format.contains(flag) {
                element = DomElement::new(tag).with_child(element);
            }
        }
        element
    }
}

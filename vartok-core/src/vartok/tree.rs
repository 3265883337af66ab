//! The keyed document tree.
//!
//!     A [Document] is an arena of nodes addressed by [NodeKey]. The shape is fixed and
//!     shallow:
//!
//!         root
//!         └─ paragraph*
//!            └─ text leaf* (plain text or variable)
//!
//!     Every mutation that creates a leaf or changes its text marks that leaf dirty. The
//!     editor drains the dirty set after each update and hands every dirty leaf to the
//!     registered transforms, so a transform that splits or replaces a leaf is re-invoked
//!     on the fragments it produced.
//!
//! Offsets
//!
//!     Split offsets are UTF-8 byte offsets into the leaf's text and must fall on a char
//!     boundary strictly inside the text.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::vartok::nodes::TextNode;

/// Identity of a node within one [Document].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u32);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Container node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Root,
    Paragraph,
}

impl ElementKind {
    pub fn type_tag(self) -> &'static str {
        match self {
            ElementKind::Root => "root",
            ElementKind::Paragraph => "paragraph",
        }
    }
}

/// Errors raised by tree primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeKey),
    #[error("node {0} is not a text node")]
    NotText(NodeKey),
    #[error("node {0} is not a paragraph")]
    NotParagraph(NodeKey),
    #[error("node {0} is not attached to a parent")]
    Detached(NodeKey),
    #[error("cannot split node {key} at offset {offset} (text length {len})")]
    InvalidSplitOffset { key: NodeKey, offset: usize, len: usize },
    #[error("node {0} is a token and cannot be split")]
    AtomicSplit(NodeKey),
    #[error("the root node cannot be removed")]
    RootRemoval,
}

/// The primitives a text transform needs from its host tree.
pub trait TextHost {
    /// Borrow the leaf stored under `key`.
    fn text_node(&self, key: NodeKey) -> Result<&TextNode, DocumentError>;

    /// Split a leaf in two at `offset`; returns `(left, right)`.
    fn split_text(
        &mut self,
        key: NodeKey,
        offset: usize,
    ) -> Result<(NodeKey, NodeKey), DocumentError>;

    /// Put `node` where `key` was; returns the key of the inserted node.
    fn replace_text(&mut self, key: NodeKey, node: TextNode) -> Result<NodeKey, DocumentError>;
}

#[derive(Debug, Clone)]
enum Payload {
    Element {
        kind: ElementKind,
        children: Vec<NodeKey>,
    },
    Text(TextNode),
}

#[derive(Debug, Clone)]
struct Slot {
    parent: Option<NodeKey>,
    payload: Payload,
}

/// A rich-text document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: HashMap<NodeKey, Slot>,
    root: NodeKey,
    next_key: u32,
    dirty: Vec<NodeKey>,
    dirty_set: HashSet<NodeKey>,
}

impl Document {
    /// An empty document holding only its root.
    pub fn new() -> Self {
        let root = NodeKey(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Slot {
                parent: None,
                payload: Payload::Element {
                    kind: ElementKind::Root,
                    children: Vec::new(),
                },
            },
        );
        Self {
            nodes,
            root,
            next_key: 1,
            dirty: Vec::new(),
            dirty_set: HashSet::new(),
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn is_text(&self, key: NodeKey) -> bool {
        matches!(
            self.nodes.get(&key),
            Some(Slot {
                payload: Payload::Text(_),
                ..
            })
        )
    }

    fn alloc(&mut self, parent: NodeKey, payload: Payload) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.nodes.insert(
            key,
            Slot {
                parent: Some(parent),
                payload,
            },
        );
        key
    }

    fn slot(&self, key: NodeKey) -> Result<&Slot, DocumentError> {
        self.nodes.get(&key).ok_or(DocumentError::UnknownNode(key))
    }

    fn children_mut(&mut self, key: NodeKey) -> Result<&mut Vec<NodeKey>, DocumentError> {
        match self.nodes.get_mut(&key) {
            Some(Slot {
                payload: Payload::Element { children, .. },
                ..
            }) => Ok(children),
            Some(_) => Err(DocumentError::NotParagraph(key)),
            None => Err(DocumentError::UnknownNode(key)),
        }
    }

    fn text_node_mut(&mut self, key: NodeKey) -> Result<&mut TextNode, DocumentError> {
        match self.nodes.get_mut(&key) {
            Some(Slot {
                payload: Payload::Text(node),
                ..
            }) => Ok(node),
            Some(_) => Err(DocumentError::NotText(key)),
            None => Err(DocumentError::UnknownNode(key)),
        }
    }

    /// Append an empty paragraph to the root.
    pub fn append_paragraph(&mut self) -> NodeKey {
        let root = self.root;
        let key = self.alloc(
            root,
            Payload::Element {
                kind: ElementKind::Paragraph,
                children: Vec::new(),
            },
        );
        if let Some(Slot {
            payload: Payload::Element { children, .. },
            ..
        }) = self.nodes.get_mut(&root)
        {
            children.push(key);
        }
        key
    }

    /// Append a leaf to a paragraph. The new leaf is dirty.
    pub fn append_text(
        &mut self,
        paragraph: NodeKey,
        node: TextNode,
    ) -> Result<NodeKey, DocumentError> {
        if self.element_kind(paragraph)? != ElementKind::Paragraph {
            return Err(DocumentError::NotParagraph(paragraph));
        }
        let key = self.alloc(paragraph, Payload::Text(node));
        self.children_mut(paragraph)?.push(key);
        self.mark_dirty(key);
        Ok(key)
    }

    pub fn element_kind(&self, key: NodeKey) -> Result<ElementKind, DocumentError> {
        match &self.slot(key)?.payload {
            Payload::Element { kind, .. } => Ok(*kind),
            Payload::Text(_) => Err(DocumentError::NotParagraph(key)),
        }
    }

    pub fn children(&self, key: NodeKey) -> Result<&[NodeKey], DocumentError> {
        match &self.slot(key)?.payload {
            Payload::Element { children, .. } => Ok(children),
            Payload::Text(_) => Err(DocumentError::NotParagraph(key)),
        }
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(&key).and_then(|slot| slot.parent)
    }

    /// Paragraph keys in document order.
    pub fn paragraphs(&self) -> &[NodeKey] {
        self.children(self.root).unwrap_or(&[])
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().len()
    }

    pub fn text_node(&self, key: NodeKey) -> Result<&TextNode, DocumentError> {
        match &self.slot(key)?.payload {
            Payload::Text(node) => Ok(node),
            Payload::Element { .. } => Err(DocumentError::NotText(key)),
        }
    }

    /// Every leaf key in document order.
    pub fn text_nodes(&self) -> Vec<NodeKey> {
        self.paragraphs()
            .iter()
            .flat_map(|paragraph| self.children(*paragraph).unwrap_or(&[]).iter().copied())
            .collect()
    }

    /// Concatenated text of one paragraph's leaves.
    pub fn paragraph_text(&self, paragraph: NodeKey) -> Result<String, DocumentError> {
        let mut text = String::new();
        for child in self.children(paragraph)? {
            text.push_str(self.text_node(*child)?.text());
        }
        Ok(text)
    }

    /// Whole-document text, paragraphs separated by a blank line.
    pub fn text_content(&self) -> String {
        self.paragraphs()
            .iter()
            .map(|paragraph| self.paragraph_text(*paragraph).unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Replace a leaf's text. The leaf becomes dirty.
    pub fn set_text(
        &mut self,
        key: NodeKey,
        text: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.update_text_node(key, |node| node.set_text(text))
    }

    /// Mutate a leaf in place. The leaf becomes dirty.
    pub fn update_text_node<F>(&mut self, key: NodeKey, f: F) -> Result<(), DocumentError>
    where
        F: FnOnce(&mut TextNode),
    {
        f(self.text_node_mut(key)?);
        self.mark_dirty(key);
        Ok(())
    }

    fn position(&self, key: NodeKey) -> Result<(NodeKey, usize), DocumentError> {
        let parent = self.slot(key)?.parent.ok_or(DocumentError::Detached(key))?;
        let index = self
            .children(parent)?
            .iter()
            .position(|child| *child == key)
            .ok_or(DocumentError::Detached(key))?;
        Ok((parent, index))
    }

    /// Split a leaf at `offset`.
    ///
    /// The left part keeps `key`; the right part gets a new key and is inserted right after
    /// it. Both parts carry the original attributes and both become dirty. Token leaves,
    /// variables included, are never split.
    pub fn split_text(
        &mut self,
        key: NodeKey,
        offset: usize,
    ) -> Result<(NodeKey, NodeKey), DocumentError> {
        let node = self.text_node(key)?;
        if node.is_token() {
            return Err(DocumentError::AtomicSplit(key));
        }
        let text = node.text();
        let len = text.len();
        if offset == 0 || offset >= len || !text.is_char_boundary(offset) {
            return Err(DocumentError::InvalidSplitOffset { key, offset, len });
        }
        let (parent, index) = self.position(key)?;
        let right = self.text_node_mut(key)?.split_off(offset);
        let right_key = self.alloc(parent, Payload::Text(right));
        self.children_mut(parent)?.insert(index + 1, right_key);
        self.mark_dirty(key);
        self.mark_dirty(right_key);
        Ok((key, right_key))
    }

    /// Replace a leaf with `node` at the same position. The old key is removed.
    pub fn replace_text(
        &mut self,
        key: NodeKey,
        node: TextNode,
    ) -> Result<NodeKey, DocumentError> {
        self.text_node(key)?;
        let (parent, index) = self.position(key)?;
        let new_key = self.alloc(parent, Payload::Text(node));
        self.children_mut(parent)?[index] = new_key;
        self.nodes.remove(&key);
        self.mark_dirty(new_key);
        Ok(new_key)
    }

    /// Remove a leaf or a paragraph with all its leaves.
    pub fn remove(&mut self, key: NodeKey) -> Result<(), DocumentError> {
        if key == self.root {
            return Err(DocumentError::RootRemoval);
        }
        let (parent, index) = self.position(key)?;
        self.children_mut(parent)?.remove(index);
        if let Some(Slot {
            payload: Payload::Element { children, .. },
            ..
        }) = self.nodes.remove(&key)
        {
            for child in children {
                self.nodes.remove(&child);
            }
        }
        Ok(())
    }

    pub fn mark_dirty(&mut self, key: NodeKey) {
        if self.dirty_set.insert(key) {
            self.dirty.push(key);
        }
    }

    pub fn is_dirty(&self, key: NodeKey) -> bool {
        self.dirty_set.contains(&key)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Drain dirty leaves still present in the tree, in the order they were dirtied.
    pub fn take_dirty(&mut self) -> Vec<NodeKey> {
        self.dirty_set.clear();
        let dirty = std::mem::take(&mut self.dirty);
        dirty.into_iter().filter(|key| self.is_text(*key)).collect()
    }

    /// Merge adjacent mergeable leaves and drop empty simple leaves.
    ///
    /// The surviving left leaf of every merge is marked dirty. Returns the number of
    /// leaves removed.
    pub fn normalize(&mut self) -> usize {
        let mut removed = 0;
        for paragraph in self.paragraphs().to_vec() {
            let children = match self.children(paragraph) {
                Ok(children) => children.to_vec(),
                Err(_) => continue,
            };
            let mut kept: Vec<NodeKey> = Vec::with_capacity(children.len());
            for key in children {
                let Ok(node) = self.text_node(key) else {
                    kept.push(key);
                    continue;
                };
                if node.is_simple_text() && node.text().is_empty() {
                    self.nodes.remove(&key);
                    removed += 1;
                    continue;
                }
                let merge_into = kept.last().copied().filter(|prev| {
                    self.text_node(*prev)
                        .map(|prev_node| prev_node.can_merge_with(node))
                        .unwrap_or(false)
                });
                match merge_into {
                    Some(prev) => {
                        let tail = node.text().to_string();
                        if let Ok(prev_node) = self.text_node_mut(prev) {
                            let merged = format!("{}{}", prev_node.text(), tail);
                            prev_node.set_text(merged);
                        }
                        self.nodes.remove(&key);
                        self.mark_dirty(prev);
                        removed += 1;
                    }
                    None => kept.push(key),
                }
            }
            if let Ok(children) = self.children_mut(paragraph) {
                *children = kept;
            }
        }
        removed
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl TextHost for Document {
    fn text_node(&self, key: NodeKey) -> Result<&TextNode, DocumentError> {
        Document::text_node(self, key)
    }

    fn split_text(
        &mut self,
        key: NodeKey,
        offset: usize,
    ) -> Result<(NodeKey, NodeKey), DocumentError> {
        Document::split_text(self, key, offset)
    }

    fn replace_text(&mut self, key: NodeKey, node: TextNode) -> Result<NodeKey, DocumentError> {
        Document::replace_text(self, key, node)
    }
}

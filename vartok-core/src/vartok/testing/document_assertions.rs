//! Fluent assertions over a [Document].

use crate::vartok::nodes::{TextFormat, TextKind, TextNode};
use crate::vartok::tree::{Document, NodeKey};

pub fn assert_document(doc: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion {
        doc,
        context: "doc".to_string(),
    }
}

fn summarize_leaves(leaves: &[&TextNode]) -> String {
    leaves
        .iter()
        .map(|node| format!("{}({:?})", node.kind(), node.text()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct DocumentAssertion<'a> {
    doc: &'a Document,
    context: String,
}

impl<'a> DocumentAssertion<'a> {
    pub fn paragraph_count(self, expected: usize) -> Self {
        let actual = self.doc.paragraph_count();
        assert_eq!(
            actual, expected,
            "{}: Expected {} paragraphs, found {} paragraphs",
            self.context, expected, actual
        );
        self
    }

    pub fn text_content(self, expected: &str) -> Self {
        let actual = self.doc.text_content();
        assert_eq!(
            actual, expected,
            "{}: Expected text content {:?}, but got {:?}",
            self.context, expected, actual
        );
        self
    }

    /// Number of variable leaves across all paragraphs.
    pub fn variable_count(self, expected: usize) -> Self {
        let doc = self.doc;
        let actual = doc
            .text_nodes()
            .into_iter()
            .filter_map(|key| doc.text_node(key).ok())
            .filter(|node| node.kind() == TextKind::Variable)
            .count();
        assert_eq!(
            actual, expected,
            "{}: Expected {} variables, found {} variables",
            self.context, expected, actual
        );
        self
    }

    pub fn no_dirty(self) -> Self {
        assert!(
            !self.doc.has_dirty(),
            "{}: Expected no dirty leaves after the update",
            self.context
        );
        self
    }

    pub fn paragraph<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ParagraphAssertion<'a>),
    {
        let doc = self.doc;
        let paragraphs = doc.paragraphs();
        assert!(
            index < paragraphs.len(),
            "{}: Paragraph index {} out of bounds (document has {} paragraphs)",
            self.context,
            index,
            paragraphs.len()
        );
        let leaves = doc
            .children(paragraphs[index])
            .unwrap_or(&[])
            .iter()
            .filter_map(|key| doc.text_node(*key).ok().map(|node| (*key, node)))
            .collect();
        assertion(ParagraphAssertion {
            leaves,
            context: format!("{}:paragraphs[{}]", self.context, index),
        });
        self
    }
}

pub struct ParagraphAssertion<'a> {
    leaves: Vec<(NodeKey, &'a TextNode)>,
    context: String,
}

impl<'a> ParagraphAssertion<'a> {
    fn summary(&self) -> String {
        let nodes: Vec<&TextNode> = self.leaves.iter().map(|(_, node)| *node).collect();
        summarize_leaves(&nodes)
    }

    pub fn leaf_count(self, expected: usize) -> Self {
        let actual = self.leaves.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} leaves, found {} leaves: [{}]",
            self.context,
            expected,
            actual,
            self.summary()
        );
        self
    }

    /// The concatenated text of the paragraph's leaves.
    pub fn content(self, expected: &str) -> Self {
        let actual: String = self.leaves.iter().map(|(_, node)| node.text()).collect();
        assert_eq!(
            actual, expected,
            "{}: Expected paragraph text {:?}, but got {:?}",
            self.context, expected, actual
        );
        self
    }

    pub fn leaf<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(LeafAssertion<'a>),
    {
        assert!(
            index < self.leaves.len(),
            "{}: Leaf index {} out of bounds (paragraph has {} leaves: [{}])",
            self.context,
            index,
            self.leaves.len(),
            self.summary()
        );
        let (key, node) = self.leaves[index];
        assertion(LeafAssertion {
            key,
            node,
            context: format!("{}:leaves[{}]", self.context, index),
        });
        self
    }

    /// Shorthand for a plain text leaf with exactly `expected` as its text.
    pub fn text(self, index: usize, expected: &str) -> Self {
        self.leaf(index, |leaf| {
            leaf.kind(TextKind::Text).text(expected);
        })
    }

    /// Shorthand for a variable leaf with exactly `expected` as its text.
    pub fn variable(self, index: usize, expected: &str) -> Self {
        self.leaf(index, |leaf| {
            leaf.kind(TextKind::Variable).text(expected);
        })
    }
}

pub struct LeafAssertion<'a> {
    key: NodeKey,
    node: &'a TextNode,
    context: String,
}

impl LeafAssertion<'_> {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn kind(self, expected: TextKind) -> Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: Expected a {} leaf, found {}({:?})",
            self.context,
            expected,
            self.node.kind(),
            self.node.text()
        );
        self
    }

    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.node.text(),
            expected,
            "{}: Expected leaf text {:?}, but got {:?}",
            self.context,
            expected,
            self.node.text()
        );
        self
    }

    pub fn is_token(self) -> Self {
        assert!(
            self.node.is_token(),
            "{}: Expected {:?} to be a token leaf",
            self.context,
            self.node.text()
        );
        self
    }

    pub fn format(self, expected: TextFormat) -> Self {
        assert_eq!(
            self.node.format(),
            expected,
            "{}: Expected format {:?}, but got {:?}",
            self.context,
            expected,
            self.node.format()
        );
        self
    }
}

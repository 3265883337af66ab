//! Treeviz formatter for documents
//!
//! Treeviz is a one line per node rendering of the tree, handy for eyeballing where
//! markers were cut. Each line is:
//!
//!     <prefix><connector> <icon> <label>
//!
//! Paragraph labels are their text, truncated to 30 characters. Leaf labels are quoted
//! so leading and trailing spaces stay visible.
//!
//! Example:
//!
//!     ⧉ Document
//!     └─ ¶ hello [name] world
//!       ├─ ◦ "hello "
//!       ├─ ⊕ "[name]"
//!       └─ ◦ " world"
//!
//! Icons
//!     Document: ⧉
//!     Paragraph: ¶
//!     Text: ◦
//!     Variable: ⊕

use super::registry::{FormatError, Formatter};
use crate::vartok::editor::EditorConfig;
use crate::vartok::nodes::TextKind;
use crate::vartok::tree::Document;

struct Snapshot {
    icon: &'static str,
    label: String,
    children: Vec<Snapshot>,
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn leaf_icon(kind: TextKind) -> &'static str {
    match kind {
        TextKind::Text => "◦",
        TextKind::Variable => "⊕",
    }
}

fn snapshot_from_document(doc: &Document) -> Snapshot {
    let children = doc
        .paragraphs()
        .iter()
        .map(|paragraph| {
            let leaves = doc
                .children(*paragraph)
                .unwrap_or(&[])
                .iter()
                .filter_map(|key| doc.text_node(*key).ok())
                .map(|node| Snapshot {
                    icon: leaf_icon(node.kind()),
                    label: format!("{:?}", truncate(node.text(), 30)),
                    children: Vec::new(),
                })
                .collect();
            Snapshot {
                icon: "¶",
                label: truncate(&doc.paragraph_text(*paragraph).unwrap_or_default(), 30),
                children: leaves,
            }
        })
        .collect();
    Snapshot {
        icon: "⧉",
        label: "Document".to_string(),
        children,
    }
}

fn format_snapshot(snapshot: &Snapshot, prefix: &str, is_last: bool) -> String {
    let connector = if is_last { "└─" } else { "├─" };
    let mut output = format!(
        "{}{} {} {}\n",
        prefix, connector, snapshot.icon, snapshot.label
    );

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(child, &child_prefix, i == child_count - 1));
    }

    output
}

pub fn to_treeviz_str(doc: &Document) -> String {
    let snapshot = snapshot_from_document(doc);
    let mut output = format!("{} {}\n", snapshot.icon, snapshot.label);
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(child, "", i == child_count - 1));
    }
    output
}

/// Formatter implementation for treeviz format
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, doc: &Document, _config: &EditorConfig) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }
}

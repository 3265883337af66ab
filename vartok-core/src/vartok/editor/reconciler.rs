//! Keeps the live DOM of every leaf in step with the document.
//!
//!     Each leaf is rendered once with `create_dom` and afterwards patched with
//!     `update_dom` against the node it was last rendered from. Leaves that left the tree
//!     are dropped.

use std::collections::{HashMap, HashSet};

use super::EditorConfig;
use crate::vartok::dom::DomElement;
use crate::vartok::nodes::TextNode;
use crate::vartok::tree::{Document, NodeKey};

#[derive(Debug)]
struct Rendered {
    node: TextNode,
    dom: DomElement,
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Reconciler {
    rendered: HashMap<NodeKey, Rendered>,
}

impl Reconciler {
    pub(crate) fn reconcile(
        &mut self,
        document: &Document,
        config: &EditorConfig,
    ) -> ReconcileStats {
        let live = document.text_nodes();
        let live_set: HashSet<NodeKey> = live.iter().copied().collect();
        let mut stats = ReconcileStats::default();

        let before = self.rendered.len();
        self.rendered.retain(|key, _| live_set.contains(key));
        stats.removed = before - self.rendered.len();

        for key in live {
            let Ok(node) = document.text_node(key) else {
                continue;
            };
            match self.rendered.get_mut(&key) {
                Some(entry) if entry.node == *node => {}
                Some(entry) => {
                    if node.update_dom(&entry.node, &mut entry.dom, config) {
                        entry.dom = node.create_dom(config);
                        stats.created += 1;
                    } else {
                        stats.updated += 1;
                    }
                    entry.node = node.clone();
                }
                None => {
                    let dom = node.create_dom(config);
                    self.rendered.insert(
                        key,
                        Rendered {
                            node: node.clone(),
                            dom,
                        },
                    );
                    stats.created += 1;
                }
            }
        }

        stats
    }

    pub(crate) fn dom(&self, key: NodeKey) -> Option<&DomElement> {
        self.rendered.get(&key).map(|entry| &entry.dom)
    }

    pub(crate) fn clear(&mut self) {
        self.rendered.clear();
    }
}

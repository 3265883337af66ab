//! The editor: document owner, node registry and transform scheduler.
//!
//!     The editor is the host runtime the tokenization rule plugs into. It owns one
//!     [Document], knows which leaf kinds are registered, and runs an update cycle:
//!
//!         1. The caller mutates the document inside [Editor::update].
//!         2. Adjacent mergeable leaves are normalized.
//!         3. Every dirty leaf is handed to each registered transform, in registration
//!            order. Leaves dirtied by a transform go into the next pass.
//!         4. Steps 2 and 3 repeat until no leaf is dirty (a fixed point).
//!         5. The live DOM is reconciled.
//!
//!     Updates run synchronously and to completion. If anything fails, the document is
//!     rolled back to its state before the update, so readers never see a half-applied
//!     transform.
//!
//! Runaway Transforms
//!
//!     A transform that keeps re-dirtying the same leaf would never reach a fixed point.
//!     Once a leaf has been handed to the transforms more than
//!     `max_transform_iterations` times within one update, the update fails with
//!     [TransformError::IterationLimit].

pub mod config;
mod reconciler;
pub mod transforms;

pub use config::{EditorConfig, EditorTheme, DEFAULT_MAX_TRANSFORM_ITERATIONS};
pub use transforms::{TextTransform, TransformHandle};

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::vartok::dom::DomElement;
use crate::vartok::nodes::TextKind;
use crate::vartok::serialization::{self, SerializationError, SerializedEditorState};
use crate::vartok::tree::{Document, DocumentError, NodeKey};
use reconciler::Reconciler;
use transforms::TransformRegistry;

/// Failure of an update cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("node {key} was transformed more than {limit} times in one update")]
    IterationLimit { key: NodeKey, limit: usize },
}

/// Failure of an editor operation that may also involve serialized state.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Builder for [Editor].
#[derive(Debug, Clone, Default)]
pub struct EditorBuilder {
    config: EditorConfig,
    nodes: BTreeSet<TextKind>,
}

impl EditorBuilder {
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a leaf kind. Plain text is always registered.
    pub fn node(mut self, kind: TextKind) -> Self {
        self.nodes.insert(kind);
        self
    }

    pub fn nodes(mut self, kinds: impl IntoIterator<Item = TextKind>) -> Self {
        self.nodes.extend(kinds);
        self
    }

    pub fn build(mut self) -> Editor {
        self.nodes.insert(TextKind::Text);
        debug!(nodes = ?self.nodes, "Building editor");
        Editor {
            document: Document::new(),
            config: self.config,
            nodes: self.nodes,
            transforms: Rc::new(RefCell::new(TransformRegistry::default())),
            reconciler: Reconciler::default(),
        }
    }
}

/// Owns a document and runs transforms over it.
pub struct Editor {
    document: Document,
    config: EditorConfig,
    nodes: BTreeSet<TextKind>,
    transforms: Rc<RefCell<TransformRegistry>>,
    reconciler: Reconciler,
}

impl Editor {
    /// An editor with default configuration and only plain text registered.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EditorBuilder {
        EditorBuilder::default()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether every kind in `kinds` is registered.
    pub fn has_nodes(&self, kinds: &[TextKind]) -> bool {
        kinds.iter().all(|kind| self.nodes.contains(kind))
    }

    /// Run `transform` on every leaf created or changed from now on.
    pub fn register_text_transform<F>(&self, transform: F) -> TransformHandle
    where
        F: Fn(&mut Document, NodeKey) -> Result<(), DocumentError> + 'static,
    {
        let id = self.transforms.borrow_mut().insert(Rc::new(transform));
        debug!(transform = id, "Registered text transform");
        TransformHandle::new(id, &self.transforms)
    }

    pub fn transform_count(&self) -> usize {
        self.transforms.borrow().len()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
        f(&self.document)
    }

    /// Mutate the document, then run transforms to a fixed point.
    ///
    /// On error the document is left exactly as it was before the call.
    pub fn update<T, F>(&mut self, f: F) -> Result<T, TransformError>
    where
        F: FnOnce(&mut Document) -> Result<T, DocumentError>,
    {
        let snapshot = self.document.clone();
        let result = f(&mut self.document)
            .map_err(TransformError::from)
            .and_then(|value| self.apply_transforms().map(|_| value));
        match result {
            Ok(value) => {
                self.reconcile();
                Ok(value)
            }
            Err(err) => {
                debug!(error = %err, "Update failed, rolling back");
                self.document = snapshot;
                Err(err)
            }
        }
    }

    fn apply_transforms(&mut self) -> Result<(), TransformError> {
        let limit = self.config.max_transform_iterations;
        let mut visits: HashMap<NodeKey, usize> = HashMap::new();
        let mut pass = 0usize;
        loop {
            self.document.normalize();
            let dirty = self.document.take_dirty();
            if dirty.is_empty() {
                return Ok(());
            }
            let transforms = self.transforms.borrow().snapshot();
            if transforms.is_empty() {
                return Ok(());
            }
            pass += 1;
            trace!(pass, dirty = dirty.len(), "Applying text transforms");
            for key in dirty {
                let count = visits.entry(key).or_insert(0);
                *count += 1;
                if *count > limit {
                    return Err(TransformError::IterationLimit { key, limit });
                }
                for transform in &transforms {
                    // An earlier transform may have replaced or removed the leaf.
                    if !self.document.is_text(key) {
                        break;
                    }
                    transform(&mut self.document, key)?;
                }
            }
        }
    }

    /// Serialize the current document.
    pub fn export_state(&self) -> SerializedEditorState {
        serialization::export_document(&self.document)
    }

    /// Replace the document with a serialized state, then run transforms over it.
    ///
    /// Fails without touching the current document when the state names an unknown or
    /// unregistered node type, or when the transforms fail.
    pub fn import_state(&mut self, state: &SerializedEditorState) -> Result<(), EditorError> {
        let document = serialization::import_document(state, |kind| self.nodes.contains(&kind))?;
        let previous = std::mem::replace(&mut self.document, document);
        if let Err(err) = self.apply_transforms() {
            self.document = previous;
            return Err(err.into());
        }
        self.reconciler.clear();
        self.reconcile();
        Ok(())
    }

    fn reconcile(&mut self) {
        let stats = self.reconciler.reconcile(&self.document, &self.config);
        trace!(
            created = stats.created,
            updated = stats.updated,
            removed = stats.removed,
            "Reconciled live DOM"
        );
    }

    /// The live element of a leaf, as of the last completed update.
    pub fn dom(&self, key: NodeKey) -> Option<&DomElement> {
        self.reconciler.dom(key)
    }

    /// The live DOM of the whole document: a `div` of `p` elements.
    pub fn render(&self) -> DomElement {
        let mut root = DomElement::new("div");
        for paragraph in self.document.paragraphs() {
            let mut element = DomElement::new("p");
            for child in self.document.children(*paragraph).unwrap_or(&[]) {
                if let Some(dom) = self.reconciler.dom(*child) {
                    element.push_child(dom.clone());
                }
            }
            root.push_child(element);
        }
        root
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

//! Automatic conversion of `[name]` markers into variable nodes.
//!
//!     The rule runs as a text transform: every time a leaf is created or its text
//!     changes, the editor hands it over. A leaf holding a marker is cut into at most three
//!     parts and the marker part is replaced by a variable node:
//!
//!         "hello [name] world"
//!             split at 6  →  "hello " | "[name] world"
//!             split at 6  →  "hello " | "[name]" | " world"
//!             replace     →  "hello " | ⊕[name] | " world"
//!
//!     One invocation converts at most one marker. The fragments it leaves behind are
//!     dirty, so the editor hands them back and any further markers are converted on those
//!     later invocations. The variable produced is never touched again: variables are
//!     skipped before matching, which is what makes the rule terminate even though it is
//!     re-run on its own output.
//!
//! Marker Syntax
//!
//!     `[` followed by one or more characters other than `]`, then `]`. The leftmost match
//!     wins and can never span two bracket groups. `[]` and unterminated brackets never
//!     match. Marker contents are not validated.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

use crate::vartok::editor::{Editor, TransformHandle};
use crate::vartok::nodes::{create_variable_node, is_variable_node, TextKind, TextNode};
use crate::vartok::tree::{DocumentError, NodeKey, TextHost};

static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

/// The leftmost marker in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableMatch<'a> {
    /// The whole marker, brackets included.
    pub full_text: &'a str,
    /// Byte offset of the opening bracket.
    pub start: usize,
}

/// Find the leftmost marker in `text`.
pub fn find_variable(text: &str) -> Option<VariableMatch<'_>> {
    let found = VARIABLE_PATTERN.find(text)?;
    Some(VariableMatch {
        full_text: found.as_str(),
        start: found.start(),
    })
}

/// What the rule will do to one leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizationPlan {
    /// Byte offset of the marker in the leaf's text.
    pub start: usize,
    /// The marker text that becomes the variable.
    pub marker: String,
}

/// Decide whether `node` needs converting, without touching the tree.
///
/// Returns `None` for variables, for leaves that are not simple text and for text
/// without a marker.
pub fn plan_tokenization(node: &TextNode) -> Option<TokenizationPlan> {
    if is_variable_node(node) {
        return None;
    }
    if !node.is_simple_text() {
        return None;
    }
    let found = find_variable(node.text())?;
    Some(TokenizationPlan {
        start: found.start,
        marker: found.full_text.to_string(),
    })
}

/// Carry out a plan on the leaf stored under `key`. Returns the variable's key.
pub fn apply_tokenization<H>(
    host: &mut H,
    key: NodeKey,
    plan: &TokenizationPlan,
) -> Result<NodeKey, DocumentError>
where
    H: TextHost + ?Sized,
{
    let mut target = key;
    if plan.start > 0 {
        let (_, right) = host.split_text(target, plan.start)?;
        target = right;
    }
    if host.text_node(target)?.text().len() > plan.marker.len() {
        let (left, _) = host.split_text(target, plan.marker.len())?;
        target = left;
    }
    debug_assert_eq!(host.text_node(target)?.text(), plan.marker);

    let variable = host.replace_text(target, create_variable_node(plan.marker.as_str()))?;
    debug!(
        node = %key,
        variable = %variable,
        marker = %plan.marker,
        "Converted marker to variable"
    );
    Ok(variable)
}

/// Run the rule once on one leaf.
///
/// Returns the key of the new variable, or `None` when the leaf was left alone.
pub fn tokenize_text_node<H>(host: &mut H, key: NodeKey) -> Result<Option<NodeKey>, DocumentError>
where
    H: TextHost + ?Sized,
{
    let Some(plan) = plan_tokenization(host.text_node(key)?) else {
        return Ok(None);
    };
    apply_tokenization(host, key, &plan).map(Some)
}

/// Activates the rule on an editor.
pub struct AutoTokenizePlugin;

impl AutoTokenizePlugin {
    /// Register the rule as a text transform.
    ///
    /// Returns `None`, after logging one error, when the editor has no variable kind
    /// registered; nothing is converted for this activation then. The rule stays active
    /// until the returned handle is dropped.
    pub fn register(editor: &Editor) -> Option<TransformHandle> {
        if !editor.has_nodes(&[TextKind::Variable]) {
            error!("AutoTokenizePlugin: variable node kind is not registered with the editor");
            return None;
        }
        Some(editor.register_text_transform(|doc, key| {
            tokenize_text_node(doc, key)?;
            Ok(())
        }))
    }
}

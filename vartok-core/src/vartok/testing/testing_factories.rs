//! Editor factories for tests.

use crate::vartok::editor::{Editor, EditorConfig, TransformError, TransformHandle};
use crate::vartok::nodes::{TextKind, TextNode};
use crate::vartok::plugins::AutoTokenizePlugin;

/// An editor with the variable kind registered and the tokenization rule active.
///
/// The handle must be kept alive for as long as the rule should run.
pub fn tokenizing_editor() -> (Editor, TransformHandle) {
    tokenizing_editor_with(EditorConfig::default())
}

pub fn tokenizing_editor_with(config: EditorConfig) -> (Editor, TransformHandle) {
    let editor = Editor::builder()
        .config(config)
        .node(TextKind::Variable)
        .build();
    let handle = AutoTokenizePlugin::register(&editor)
        .expect("variable kind is registered, so the rule must activate");
    (editor, handle)
}

/// Append one paragraph per entry, each holding a single text leaf, in one update.
pub fn type_paragraphs(editor: &mut Editor, paragraphs: &[&str]) -> Result<(), TransformError> {
    editor.update(|doc| {
        for text in paragraphs {
            let paragraph = doc.append_paragraph();
            doc.append_text(paragraph, TextNode::new(*text))?;
        }
        Ok(())
    })
}

/// Tokenize `text` as a single paragraph and return the editor holding the result.
pub fn tokenize(text: &str) -> Editor {
    let (mut editor, handle) = tokenizing_editor();
    type_paragraphs(&mut editor, &[text]).expect("tokenization should reach a fixed point");
    drop(handle);
    editor
}

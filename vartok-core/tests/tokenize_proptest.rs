//! Property-based tests for the tokenization rule
//!
//! Inputs are drawn from a small alphabet rich in brackets so that markers, empty
//! brackets and unbalanced brackets show up often.

use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;
use vartok_core::vartok::editor::Editor;
use vartok_core::vartok::nodes::TextKind;
use vartok_core::vartok::testing::factories::{tokenizing_editor, type_paragraphs};

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]+\]").unwrap());
static WHOLE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[[^\]]+\]$").unwrap());

/// Generate text that mixes words, spaces and brackets
fn bracket_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z \\[\\]]{0,40}",
        "([a-z ]{0,5}\\[[a-z_]{1,6}\\]){1,5}[a-z ]{0,5}",
        "[a-zé👋 \\[\\]]{0,20}",
    ]
}

/// Generate text without any complete marker
fn markerless_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z \\]]{0,30}",
        "[a-z ]{0,10}\\[[a-z ]{0,10}",
        "[a-z ]{0,10}\\[\\][a-z ]{0,10}",
    ]
}

fn leaves(editor: &Editor) -> Vec<(TextKind, String)> {
    editor.read(|doc| {
        doc.text_nodes()
            .into_iter()
            .map(|key| {
                let node = doc.text_node(key).unwrap();
                (node.kind(), node.text().to_string())
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn test_text_is_preserved(input in bracket_text_strategy()) {
        let (mut editor, _handle) = tokenizing_editor();
        type_paragraphs(&mut editor, &[input.as_str()]).unwrap();

        prop_assert_eq!(editor.document().text_content(), input);
    }

    #[test]
    fn test_fixed_point_has_no_markers_left(input in bracket_text_strategy()) {
        let (mut editor, _handle) = tokenizing_editor();
        type_paragraphs(&mut editor, &[input.as_str()]).unwrap();

        for (kind, text) in leaves(&editor) {
            match kind {
                TextKind::Variable => {
                    prop_assert!(WHOLE_MARKER.is_match(&text), "variable {:?}", text);
                }
                TextKind::Text => {
                    prop_assert!(!MARKER.is_match(&text), "text {:?}", text);
                }
            }
        }
    }

    #[test]
    fn test_variable_count_matches_markers(input in bracket_text_strategy()) {
        let (mut editor, _handle) = tokenizing_editor();
        type_paragraphs(&mut editor, &[input.as_str()]).unwrap();

        let variables = leaves(&editor)
            .into_iter()
            .filter(|(kind, _)| *kind == TextKind::Variable)
            .count();
        prop_assert_eq!(variables, MARKER.find_iter(&input).count());
    }

    #[test]
    fn test_resubmitting_every_leaf_changes_nothing(input in bracket_text_strategy()) {
        let (mut editor, _handle) = tokenizing_editor();
        type_paragraphs(&mut editor, &[input.as_str()]).unwrap();
        let before = editor.export_state();

        editor
            .update(|doc| {
                for key in doc.text_nodes() {
                    doc.mark_dirty(key);
                }
                Ok(())
            })
            .unwrap();

        prop_assert_eq!(editor.export_state(), before);
    }

    #[test]
    fn test_no_false_positives(input in markerless_text_strategy()) {
        let (mut editor, _handle) = tokenizing_editor();
        type_paragraphs(&mut editor, &[input.as_str()]).unwrap();

        for (kind, _) in leaves(&editor) {
            prop_assert_eq!(kind, TextKind::Text);
        }
        prop_assert!(leaves(&editor).len() <= 1);
    }
}

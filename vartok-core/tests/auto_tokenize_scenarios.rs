//! Tokenization scenarios run through a full editor update
//!
//! Each case types one paragraph into an editor with the rule active and checks the
//! leaves left once the transforms reached a fixed point.

use rstest::rstest;
use vartok_core::vartok::editor::{Editor, EditorConfig, TransformError};
use vartok_core::vartok::nodes::{create_variable_node, TextFormat, TextKind, TextMode, TextNode};
use vartok_core::vartok::plugins::AutoTokenizePlugin;
use vartok_core::vartok::testing::assert_document;
use vartok_core::vartok::testing::factories::{tokenize, tokenizing_editor, type_paragraphs};

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

fn t(text: &str) -> (TextKind, String) {
    (TextKind::Text, text.to_string())
}

fn v(text: &str) -> (TextKind, String) {
    (TextKind::Variable, text.to_string())
}

#[rstest]
#[case::marker_in_middle("hello [name] world", vec![t("hello "), v("[name]"), t(" world")])]
#[case::marker_only("[id]", vec![v("[id]")])]
#[case::adjacent_markers("[a][b]", vec![v("[a]"), v("[b]")])]
#[case::unterminated("[unterminated", vec![t("[unterminated")])]
#[case::empty_brackets("[] stays", vec![t("[] stays")])]
#[case::marker_at_end("Dear [customer]", vec![t("Dear "), v("[customer]")])]
#[case::many_markers(
    "[greeting], [name]! Your order [order_id] ships [date].",
    vec![
        v("[greeting]"),
        t(", "),
        v("[name]"),
        t("! Your order "),
        v("[order_id]"),
        t(" ships "),
        v("[date]"),
        t("."),
    ]
)]
#[case::nested_opening("[[a]]", vec![v("[[a]"), t("]")])]
#[case::stray_closing("a ] b [c]", vec![t("a ] b "), v("[c]")])]
#[case::no_markers("plain text", vec![t("plain text")])]
#[case::unicode("¡hola [nombre]! 👋", vec![t("¡hola "), v("[nombre]"), t("! 👋")])]
fn test_tokenize_paragraph(#[case] input: &str, #[case] expected: Vec<(TextKind, String)>) {
    let editor = tokenize(input);

    assert_eq!(leaves(&editor), expected);
    assert_document(editor.document())
        .no_dirty()
        .text_content(input);
}

#[test]
fn test_scenario_marker_in_middle_with_fluent_assertions() {
    let editor = tokenize("hello [name] world");

    assert_document(editor.document())
        .paragraph_count(1)
        .variable_count(1)
        .paragraph(0, |p| {
            p.leaf_count(3)
                .text(0, "hello ")
                .variable(1, "[name]")
                .text(2, " world")
                .leaf(1, |leaf| {
                    leaf.is_token();
                });
        });
}

#[test]
fn test_existing_variable_is_not_resplit() {
    let (mut editor, _handle) = tokenizing_editor();
    let key = editor
        .update(|doc| {
            let paragraph = doc.append_paragraph();
            doc.append_text(paragraph, create_variable_node("[x]"))
        })
        .unwrap();

    // Re-submit the same leaf.
    editor
        .update(|doc| {
            doc.mark_dirty(key);
            Ok(())
        })
        .unwrap();

    assert_eq!(editor.document().text_nodes(), vec![key]);
    assert_eq!(leaves(&editor), vec![v("[x]")]);
}

#[test]
fn test_variable_stays_atomic_when_its_text_changes() {
    let (mut editor, _handle) = tokenizing_editor();
    let key = editor
        .update(|doc| {
            let paragraph = doc.append_paragraph();
            doc.append_text(paragraph, TextNode::new("[x]"))
        })
        .unwrap();
    let variable = editor.document().text_nodes()[0];
    assert_ne!(variable, key);

    editor
        .update(|doc| doc.set_text(variable, "[a] and [b]"))
        .unwrap();

    assert_eq!(leaves(&editor), vec![v("[a] and [b]")]);
}

#[test]
fn test_editing_text_later_triggers_tokenization() {
    let (mut editor, _handle) = tokenizing_editor();
    let key = editor
        .update(|doc| {
            let paragraph = doc.append_paragraph();
            doc.append_text(paragraph, TextNode::new("hello "))
        })
        .unwrap();
    assert_eq!(leaves(&editor), vec![t("hello ")]);

    editor
        .update(|doc| doc.set_text(key, "hello [name"))
        .unwrap();
    assert_eq!(leaves(&editor), vec![t("hello [name")]);

    editor
        .update(|doc| doc.set_text(key, "hello [name]"))
        .unwrap();
    assert_eq!(leaves(&editor), vec![t("hello "), v("[name]")]);
}

#[test]
fn test_marker_typed_across_two_leaves_is_merged_then_tokenized() {
    let (mut editor, _handle) = tokenizing_editor();
    editor
        .update(|doc| {
            let paragraph = doc.append_paragraph();
            doc.append_text(paragraph, TextNode::new("say [na"))?;
            doc.append_text(paragraph, TextNode::new("me] now"))?;
            Ok(())
        })
        .unwrap();

    assert_eq!(leaves(&editor), vec![t("say "), v("[name]"), t(" now")]);
}

#[test]
fn test_differently_formatted_leaves_are_not_merged() {
    let (mut editor, _handle) = tokenizing_editor();
    editor
        .update(|doc| {
            let paragraph = doc.append_paragraph();
            doc.append_text(paragraph, TextNode::new("[na"))?;
            doc.append_text(
                paragraph,
                TextNode::new("me]").with_format(TextFormat::BOLD),
            )?;
            Ok(())
        })
        .unwrap();

    assert_eq!(leaves(&editor), vec![t("[na"), t("me]")]);
}

#[test]
fn test_fragments_inherit_format() {
    let (mut editor, _handle) = tokenizing_editor();
    editor
        .update(|doc| {
            let paragraph = doc.append_paragraph();
            doc.append_text(
                paragraph,
                TextNode::new("a [b] c").with_format(TextFormat::ITALIC),
            )
        })
        .unwrap();

    assert_document(editor.document()).paragraph(0, |p| {
        p.leaf_count(3)
            .leaf(0, |leaf| {
                leaf.kind(TextKind::Text).format(TextFormat::ITALIC);
            })
            .leaf(2, |leaf| {
                leaf.kind(TextKind::Text).format(TextFormat::ITALIC);
            });
    });
}

#[rstest]
#[case::token(TextMode::Token)]
#[case::segmented(TextMode::Segmented)]
fn test_non_normal_modes_are_skipped(#[case] mode: TextMode) {
    let (mut editor, _handle) = tokenizing_editor();
    editor
        .update(|doc| {
            let paragraph = doc.append_paragraph();
            doc.append_text(paragraph, TextNode::new("a [b] c").with_mode(mode))
        })
        .unwrap();

    assert_eq!(leaves(&editor), vec![t("a [b] c")]);
}

#[test]
fn test_paragraphs_are_tokenized_independently() {
    let (mut editor, _handle) = tokenizing_editor();
    type_paragraphs(&mut editor, &["first [one]", "no markers", "[two] second"]).unwrap();

    assert_document(editor.document())
        .paragraph_count(3)
        .variable_count(2)
        .paragraph(0, |p| {
            p.leaf_count(2).text(0, "first ").variable(1, "[one]");
        })
        .paragraph(1, |p| {
            p.leaf_count(1).text(0, "no markers");
        })
        .paragraph(2, |p| {
            p.leaf_count(2).variable(0, "[two]").text(1, " second");
        });
}

#[test]
fn test_editor_without_variable_kind_never_tokenizes() {
    let mut editor = Editor::builder().config(EditorConfig::default()).build();
    assert!(AutoTokenizePlugin::register(&editor).is_none());

    type_paragraphs(&mut editor, &["hello [name]"]).unwrap();
    assert_eq!(leaves(&editor), vec![t("hello [name]")]);
}

#[test]
fn test_dropping_handle_deactivates_rule() {
    let (mut editor, handle) = tokenizing_editor();
    drop(handle);

    type_paragraphs(&mut editor, &["hello [name]"]).unwrap();
    assert_eq!(leaves(&editor), vec![t("hello [name]")]);
}

#[test]
fn test_many_markers_stay_under_iteration_limit() {
    let input = (0..250).map(|i| format!("[v{i}] ")).collect::<String>();
    let editor = tokenize(&input);

    assert_document(editor.document())
        .variable_count(250)
        .text_content(&input);
}

#[test]
fn test_competing_transform_hits_iteration_limit() {
    let config = EditorConfig {
        max_transform_iterations: 10,
        ..EditorConfig::default()
    };
    let mut editor = Editor::builder()
        .config(config)
        .node(TextKind::Variable)
        .build();
    let _rule = AutoTokenizePlugin::register(&editor).unwrap();
    // Keeps appending to every plain leaf it sees.
    let _noisy = editor.register_text_transform(|doc, key| {
        let node = doc.text_node(key)?;
        if node.kind() == TextKind::Text {
            let text = format!("{}.", node.text());
            doc.set_text(key, text)?;
        }
        Ok(())
    });

    let err = type_paragraphs(&mut editor, &["x"]).unwrap_err();

    assert!(matches!(err, TransformError::IterationLimit { limit: 10, .. }));
    assert_eq!(editor.document().paragraph_count(), 0);
}

//! Subcommand handlers. Each returns the text to print.

use std::io::Read;

use tracing::{debug, info};
use vartok_config::{ConfigError, Loader, VartokConfig};
use vartok_core::vartok::editor::{Editor, EditorError, TransformError, TransformHandle};
use vartok_core::vartok::formats::{FormatError, FormatRegistry};
use vartok_core::vartok::nodes::{TextKind, TextNode};
use vartok_core::vartok::plugins::AutoTokenizePlugin;
use vartok_core::vartok::serialization::{SerializationError, SerializedEditorState};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("unknown format '{name}' (available: {available})")]
    UnknownFormat { name: String, available: String },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error("the tokenization rule could not be activated")]
    RuleInactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub path: String,
    pub format: Option<String>,
    pub config: Option<String>,
}

fn load_config(options: &RunOptions) -> Result<VartokConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = &options.config {
        loader = loader.with_file(path);
    }
    if let Some(format) = &options.format {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    Ok(loader.build()?)
}

fn read_input(path: &str) -> Result<String, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_string(),
        source,
    };
    if path == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(io_error)?;
        Ok(input)
    } else {
        std::fs::read_to_string(path).map_err(io_error)
    }
}

/// Blank-line separated blocks, each with its lines joined by `\n`.
pub fn split_paragraphs(input: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in input.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

fn tokenizing_editor(config: &VartokConfig) -> Result<(Editor, TransformHandle), CliError> {
    let editor = Editor::builder()
        .config(config.editor.clone())
        .node(TextKind::Variable)
        .build();
    let handle = AutoTokenizePlugin::register(&editor).ok_or(CliError::RuleInactive)?;
    Ok((editor, handle))
}

fn render(editor: &Editor, config: &VartokConfig) -> Result<String, CliError> {
    let registry = FormatRegistry::default();
    let name = config.output.format.as_str();
    if !registry.has(name) {
        return Err(CliError::UnknownFormat {
            name: name.to_string(),
            available: registry.list_formats().join(", "),
        });
    }
    Ok(registry.serialize(editor.document(), name, editor.config())?)
}

pub fn tokenize(options: &RunOptions) -> Result<String, CliError> {
    let config = load_config(options)?;
    let input = read_input(&options.path)?;
    let paragraphs = split_paragraphs(&input);
    debug!(paragraphs = paragraphs.len(), "Read input");

    let (mut editor, _handle) = tokenizing_editor(&config)?;
    editor.update(|doc| {
        for text in &paragraphs {
            let paragraph = doc.append_paragraph();
            doc.append_text(paragraph, TextNode::new(text.as_str()))?;
        }
        Ok(())
    })?;
    info!(
        leaves = editor.document().text_nodes().len(),
        "Tokenized document"
    );

    render(&editor, &config)
}

pub fn normalize(options: &RunOptions) -> Result<String, CliError> {
    let config = load_config(options)?;
    let input = read_input(&options.path)?;
    let state = SerializedEditorState::from_json(&input)?;

    let (mut editor, _handle) = tokenizing_editor(&config)?;
    editor.import_state(&state)?;

    render(&editor, &config)
}

pub fn formats() -> String {
    let registry = FormatRegistry::default();
    let mut output = String::from("Available output formats:\n\n");
    for name in registry.list_formats() {
        let description = registry
            .get(&name)
            .map(|formatter| formatter.description())
            .unwrap_or_default();
        output.push_str(&format!("  {:<8} {}\n", name, description));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paragraphs() {
        let input = "first line\nsecond line\n\n\n  \nnext [x]\n";
        assert_eq!(
            split_paragraphs(input),
            vec!["first line\nsecond line".to_string(), "next [x]".to_string()]
        );
        assert!(split_paragraphs("\n\n").is_empty());
    }

    #[test]
    fn test_formats_lists_defaults() {
        let output = formats();
        for name in ["html", "json", "text", "treeviz", "yaml"] {
            assert!(output.contains(name), "missing {name}");
        }
    }
}

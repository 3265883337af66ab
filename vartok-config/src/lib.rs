//! Configuration for the vartok tools.
//!
//! The defaults live in `defaults/vartok.default.toml` and are compiled in, so a run
//! without any configuration file behaves exactly as that file documents. [`Loader`]
//! puts a user file and overrides on top and deserializes into [`VartokConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use vartok_core::vartok::editor::EditorConfig;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/vartok.default.toml");

/// Top-level configuration consumed by vartok applications.
#[derive(Debug, Clone, Deserialize)]
pub struct VartokConfig {
    pub editor: EditorConfig,
    pub output: OutputConfig,
}

/// Controls how results are printed.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Name of a registered output format.
    pub format: String,
}

/// Layers a user file and command-line overrides over the embedded defaults.
///
/// Sources are applied in call order, so an override set after [`Loader::with_file`]
/// wins over the file.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file. The file must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, e.g. `output.format`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<VartokConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file");
        file
    }

    #[test]
    fn loads_default_config() {
        let config = Loader::new().build().expect("defaults to deserialize");
        assert_eq!(config.editor, EditorConfig::default());
        assert_eq!(config.output.format, "treeviz");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.format", "json")
            .expect("override to apply")
            .set_override("editor.theme.variable.color", "#FF0000")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "json");
        assert_eq!(config.editor.theme.variable.color, "#FF0000");
        assert_eq!(config.editor.theme.variable.padding, "2px 6px");
    }

    #[test]
    fn layers_user_file() {
        let file = toml_file("[editor]\nmax_transform_iterations = 7\n");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");

        assert_eq!(config.editor.max_transform_iterations, 7);
        assert_eq!(config.output.format, "treeviz");
    }

    #[test]
    fn override_wins_over_user_file() {
        let file = toml_file("[output]\nformat = \"html\"\n");

        let config = Loader::new()
            .with_file(file.path())
            .set_override("output.format", "yaml")
            .expect("override to apply")
            .build()
            .expect("config to build");

        assert_eq!(config.output.format, "yaml");
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/nonexistent/vartok.toml").build();
        assert!(result.is_err());
    }
}

//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::vartok::nodes::{TextTheme, VariableTheme};

/// Default cap on how many times one leaf may be transformed during a single update.
pub const DEFAULT_MAX_TRANSFORM_ITERATIONS: usize = 100;

/// Presentation settings for live and exported elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorTheme {
    pub text: TextTheme,
    pub variable: VariableTheme,
}

/// Settings an [Editor](super::Editor) is built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// A leaf transformed more often than this within one update aborts the update.
    pub max_transform_iterations: usize,
    pub theme: EditorTheme,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_transform_iterations: DEFAULT_MAX_TRANSFORM_ITERATIONS,
            theme: EditorTheme::default(),
        }
    }
}

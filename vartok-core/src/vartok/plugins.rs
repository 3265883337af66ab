//! Editor plugins.
//!
//!     A plugin activates against an [Editor](crate::vartok::editor::Editor) and returns
//!     the handle that keeps its transforms registered.

pub mod auto_tokenize;

pub use auto_tokenize::AutoTokenizePlugin;

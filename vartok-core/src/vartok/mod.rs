//! Main module for vartok library functionality

pub mod dom;
pub mod editor;
pub mod formats;
pub mod nodes;
pub mod plugins;
pub mod serialization;
pub mod testing;
pub mod tree;

pub use editor::{Editor, EditorConfig, TransformError, TransformHandle};
pub use nodes::{TextKind, TextNode};
pub use tree::{Document, DocumentError, NodeKey};

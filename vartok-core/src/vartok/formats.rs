//! Output formats for documents
//!
//! This module contains the serializers the CLI and tests print documents with:
//! - treeviz: one line per node with Unicode icons
//! - json / yaml: the serialized editor state
//! - html: exported DOM, one `<p>` per paragraph
//! - text: plain text content

pub mod html;
pub mod registry;
pub mod state;
pub mod text;
pub mod treeviz;

pub use html::{to_html_str, HtmlFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use state::{JsonFormatter, YamlFormatter};
pub use text::TextFormatter;
pub use treeviz::{to_treeviz_str, TreevizFormatter};

//! Testing utilities for document assertions
//!
//! Checking a tokenized tree by hand means walking paragraphs, fetching every leaf and
//! matching on its kind. The fluent `assert_document` API states the whole shape at once:
//!
//! ```rust-example
//! use vartok_core::vartok::testing::assert_document;
//!
//! assert_document(editor.document())
//!     .paragraph_count(1)
//!     .paragraph(0, |p| {
//!         p.leaf_count(3)
//!             .text(0, "hello ")
//!             .variable(1, "[name]")
//!             .text(2, " world")
//!     });
//! ```
//!
//! Failures panic with the path of the node that did not match (`doc:paragraphs[0]:leaves[1]`)
//! and a one line summary of the leaves found.
//!
//! `factories` builds editors with the tokenization rule already active.

mod document_assertions;
mod testing_factories;

pub use document_assertions::{
    assert_document, DocumentAssertion, LeafAssertion, ParagraphAssertion,
};

// Public submodule path: crate::vartok::testing::factories
pub mod factories {
    pub use super::testing_factories::*;
}

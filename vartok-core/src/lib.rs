//! # vartok
//!
//! Turns `[name]` placeholders typed into a rich-text document into atomic variable nodes.
//!
//! File Layout
//!
//!     src/vartok
//!       ├── nodes        Text and variable leaf nodes (the shared text capability)
//!       ├── dom          Minimal element model for live rendering and HTML export
//!       ├── tree         The keyed document tree and its split/replace primitives
//!       ├── editor       Node registry, transform scheduling and DOM reconciliation
//!       ├── plugins      Transforms that plug into the editor (auto tokenization)
//!       ├── serialization  Editor state import/export
//!       ├── formats      Output formats (treeviz, json, yaml, html, text)
//!       └── testing      Fluent assertions over documents
//!
//! The tokenization rule itself lives in [auto_tokenize](vartok::plugins::auto_tokenize).
//! Everything else is the host runtime it plugs into.

pub mod vartok;

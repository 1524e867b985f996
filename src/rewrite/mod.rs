//! Declaration scanning and source rewriting.
//!
//! This module works on whole-file text buffers and never parses C. It
//! locates known markers, cuts spans out, and rewrites individual lines
//! that match named shape predicates.

pub mod binding_patch;
pub mod excise;
pub mod export;
pub mod header;
pub mod locate;
pub mod patterns;
pub mod source;

pub use binding_patch::{patch_bindings, Patched};
pub use excise::{extract_declarations, FactoryFunction, NameCheck};
pub use export::{Annotated, Annotator, ExportMacro, MissingAnchor};
pub use header::{synthesize, ExtractedHeader};
pub use locate::{locate, Located, Marker};
pub use patterns::DeclarationRule;
pub use source::{LineEnding, SourceBuffer, Span};

//! tsheader - exportable C headers for tree-sitter grammars
//!
//! Generated tree-sitter grammars ship a `parser.c` with no header. This
//! crate carves a standalone header out of that translation unit, marks
//! every API declaration for dynamic export, and fixes up the C# bindings
//! emitted by an external binding generator.

pub mod core;
pub mod ops;
pub mod rewrite;
pub mod util;

pub use core::errors::{GenerateError, PathError, PatternError};
pub use core::module::{LanguageModule, RootLibrary};
pub use ops::{GenerateOptions, GenerateReport};
pub use util::config::Config;

//! Core data structures for tsheader.
//!
//! This module contains the types the pipeline stages share:
//! - Error families and their exit codes
//! - Discovered tree-sitter and grammar repositories

pub mod errors;
pub mod module;

pub use errors::{GenerateError, PathError, PatternError};
pub use module::{expected_factory_name, LanguageModule, RootLibrary};

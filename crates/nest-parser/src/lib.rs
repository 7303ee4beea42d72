//! # nest-parser
//!
//! ast-grep-based CSS parsing and rule extraction for cssnest.
//!
//! The tree-sitter CSS grammar (through `ast-grep-language`) does the
//! tokenizing. This crate walks the resulting tree and flattens it into
//! ordered [`ParsedRule`](nest_core::ParsedRule) records:
//! - one rule per simple selector of a comma-separated selector list
//! - `@media` context attached to every rule inside the block
//! - `@keyframes` and other block at-rules captured opaque
//! - comments kept as pseudo-rules or in-block comment declarations
//!
//! Selector helpers (bracket-aware comma splitting, compound tokenizing,
//! specificity) live in [`selectors`].

pub mod error;
pub mod extractor;
pub mod parser;
pub mod selectors;

pub use error::ParserError;
pub use extractor::{ExtractOptions, extract_rules};
pub use parser::{AstTree, parse_source, parse_stylesheet};

//! CSS rule extractor.
//!
//! Walks the top-level stylesheet nodes in document order collecting:
//! - Rule sets, one [`ParsedRule`] per comma-separated selector
//! - Rules inside `@media` blocks, tagged with the media prelude
//! - `@keyframes` / `@-webkit-keyframes` captured as one opaque rule
//! - `@font-face`, `@supports`, `@page` and other block at-rules keyed by prelude
//! - `@import` / `@charset` / `@namespace` statements
//! - Comments, as pseudo-rules (top level) or comment declarations (in blocks)
//!
//! Keyframe steps outside `@keyframes` are dropped. `@media` blocks nested
//! in a style rule become rules for the parent selectors under that query.

mod helpers;
mod processors;

use nest_core::ParsedRule;

use crate::error::ParserError;
use crate::parser::parse_stylesheet;

/// Extraction switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Keep comments as pseudo-rules and comment declarations.
    pub preserve_comments: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            preserve_comments: true,
        }
    }
}

/// Parse a stylesheet and flatten it into ordered rules.
///
/// # Errors
/// Returns `ParserError` when the text is not valid CSS or a selector list
/// is malformed. No partial result is produced.
pub fn extract_rules(
    source: &str,
    options: &ExtractOptions,
) -> Result<Vec<ParsedRule>, ParserError> {
    let source = helpers::blank_orphan_keyframe_steps(source);
    let tree = parse_stylesheet(&source)?;
    let mut collector = processors::RuleCollector::new(*options);
    collector.collect_nodes(&tree.root(), None)?;
    let rules = collector.finish();
    tracing::debug!(rules = rules.len(), "extracted stylesheet rules");
    Ok(rules)
}

#[cfg(test)]
mod tests;

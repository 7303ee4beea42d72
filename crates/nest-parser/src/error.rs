//! Parser error types for nest-parser.

/// Errors that can occur while turning stylesheet text into rules.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Parse failed at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Invalid selector list: {0}")]
    InvalidSelector(String),

    /// An at-rule other than `@media` nested inside a style rule.
    #[error("Unsupported at-rule nested in a style rule at line {line}: {at_rule}")]
    UnsupportedNesting { line: usize, at_rule: String },
}

//! Conversion error types for nest-engine.

use nest_parser::ParserError;

/// Errors that abort a single conversion.
///
/// Unmatched BEM selectors, missing variable candidates and empty input are
/// normal outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParserError),
}

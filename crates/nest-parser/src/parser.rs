//! ast-grep wrapper for the CSS grammar.

use ast_grep_core::Node;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::SupportLang;

use crate::error::ParserError;

/// The concrete AST tree type returned by `parse_source`.
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// Parse stylesheet text into an ast-grep tree.
///
/// Tree-sitter never fails outright; malformed input shows up as `ERROR`
/// or missing nodes. Use [`parse_stylesheet`] to reject those.
#[must_use]
pub fn parse_source(source: &str) -> AstTree {
    use ast_grep_language::LanguageExt;
    SupportLang::Css.ast_grep(source)
}

/// Parse stylesheet text, failing on the first syntax error.
///
/// # Errors
/// Returns `ParserError::Syntax` with the 1-based line of the first
/// `ERROR` or missing node.
pub fn parse_stylesheet(source: &str) -> Result<AstTree, ParserError> {
    let tree = parse_source(source);
    if let Some(error) = first_syntax_error(&tree.root()) {
        return Err(error);
    }
    Ok(tree)
}

fn first_syntax_error<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<ParserError> {
    if node.is_missing() {
        return Some(ParserError::Syntax {
            line: node.start_pos().line() + 1,
            message: format!("expected `{}`", node.kind()),
        });
    }
    if node.is_error() {
        let snippet: String = node.text().chars().take(40).collect();
        return Some(ParserError::Syntax {
            line: node.start_pos().line() + 1,
            message: format!("unexpected `{}`", snippet.trim()),
        });
    }
    node.children()
        .find_map(|child| first_syntax_error(&child))
}

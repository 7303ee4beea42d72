use std::borrow::Cow;
use std::ops::Range;

use ast_grep_core::Node;
use nest_core::{Declaration, Property};

use crate::selectors::is_keyframe_step;

/// Text of the first child of the given kind.
pub(super) fn child_text<D: ast_grep_core::Doc>(node: &Node<D>, kind: &str) -> Option<String> {
    node.children()
        .find(|c| c.kind().as_ref() == kind)
        .map(|c| c.text().to_string())
}

/// Text of an at-rule before its block (`@media (max-width: 768px)`).
///
/// Falls back to the whole node text without a trailing `;` when there is
/// no block.
pub(super) fn prelude_text<D: ast_grep_core::Doc>(node: &Node<D>) -> String {
    let text = node.text();
    let node_start = node.range().start;
    let prelude = node
        .children()
        .find(|c| c.kind().as_ref() == "block" || c.kind().as_ref() == "keyframe_block_list")
        .and_then(|block| text.get(..block.range().start.saturating_sub(node_start)))
        .unwrap_or_else(|| text.trim_end().trim_end_matches(';'));
    collapse_whitespace(prelude)
}

/// Content between the outer braces of a block node.
pub(super) fn block_content<D: ast_grep_core::Doc>(block: &Node<D>) -> String {
    let text = block.text();
    let trimmed = text.trim();
    let inner = trimmed.strip_prefix('{').unwrap_or(trimmed);
    let inner = inner.strip_suffix('}').unwrap_or(inner);
    inner.trim().to_string()
}

/// Build a property declaration from a `declaration` node.
pub(super) fn parse_declaration<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<Declaration> {
    let property = child_text(node, "property_name")?;
    let text = node.text();
    let (_, raw_value) = text.split_once(':')?;
    let raw_value = raw_value.trim().trim_end_matches(';').trim();
    let (value, important) = split_important(raw_value);
    Some(Declaration::Property(Property::new(
        property.trim(),
        collapse_whitespace(&value),
        important,
    )))
}

/// Separate a trailing `!important` from a value.
pub(super) fn split_important(value: &str) -> (String, bool) {
    if let Some(idx) = value.rfind('!')
        && value[idx + 1..].trim().eq_ignore_ascii_case("important")
    {
        return (value[..idx].trim_end().to_string(), true);
    }
    (value.to_string(), false)
}

/// Comment body without delimiters.
pub(super) fn comment_body(text: &str) -> String {
    let trimmed = text.trim();
    let inner = trimmed.strip_prefix("/*").unwrap_or(trimmed);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);
    inner.trim().to_string()
}

/// Collapse runs of whitespace outside quoted strings to one space.
pub(super) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;

    for c in text.trim().chars() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

/// Append a declaration, dropping an earlier one with the same property
/// and `!important` flag.
pub(super) fn push_last_wins(declarations: &mut Vec<Declaration>, declaration: Declaration) {
    if let Declaration::Property(new) = &declaration {
        declarations.retain(|existing| {
            existing
                .as_property()
                .is_none_or(|old| old.property != new.property || old.important != new.important)
        });
    }
    declarations.push(declaration);
}

/// Resolve a nested selector against its parent.
pub(super) fn compose_selector(parent: &str, child: &str) -> String {
    if child.contains('&') {
        child.replace('&', parent)
    } else {
        format!("{parent} {child}")
    }
}

/// Blank out top-level blocks whose selectors are all keyframe steps
/// (`0% {..}`, `from, to {..}`).
///
/// Outside `@keyframes` the grammar reads a percentage step as an `ERROR`
/// node, so such blocks are removed before parsing. Newlines are kept so
/// reported line numbers still match the input.
pub(super) fn blank_orphan_keyframe_steps(source: &str) -> Cow<'_, str> {
    let orphans = orphan_step_ranges(source);
    if orphans.is_empty() {
        return Cow::Borrowed(source);
    }

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for range in orphans {
        tracing::debug!(
            selector = %source[range.start..].split('{').next().unwrap_or_default().trim(),
            "dropping orphan keyframe step"
        );
        out.push_str(&source[last..range.start]);
        out.extend(
            source[range.clone()]
                .chars()
                .map(|c| if c == '\n' { '\n' } else { ' ' }),
        );
        last = range.end;
    }
    out.push_str(&source[last..]);
    Cow::Owned(out)
}

/// Byte ranges of top-level keyframe-step blocks, prelude through `}`.
fn orphan_step_ranges(source: &str) -> Vec<Range<usize>> {
    let bytes = source.as_bytes();
    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut prelude_start = 0usize;
    let mut open: Option<usize> = None;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..].find("*/").map_or(bytes.len(), |e| i + 2 + e + 2);
                if depth == 0 {
                    prelude_start = end;
                }
                i = end;
                continue;
            }
            b'"' | b'\'' => quote = Some(b),
            b'{' => {
                if depth == 0 {
                    let prelude = source[prelude_start..i].trim();
                    let is_orphan = !prelude.is_empty()
                        && !prelude.starts_with('@')
                        && prelude.split(',').all(is_keyframe_step);
                    if is_orphan {
                        let lead = source[prelude_start..i].len()
                            - source[prelude_start..i].trim_start().len();
                        open = Some(prelude_start + lead);
                    }
                }
                depth += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(start) = open.take() {
                        ranges.push(start..i + 1);
                    }
                    prelude_start = i + 1;
                }
            }
            b';' if depth == 0 => prelude_start = i + 1,
            _ => {}
        }
        i += 1;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_important_variants() {
        assert_eq!(split_important("red !important"), ("red".to_string(), true));
        assert_eq!(split_important("red!IMPORTANT"), ("red".to_string(), true));
        assert_eq!(split_important("red ! important"), ("red".to_string(), true));
        assert_eq!(split_important("red"), ("red".to_string(), false));
    }

    #[test]
    fn collapse_whitespace_keeps_strings() {
        assert_eq!(
            collapse_whitespace("  'Open   Sans',\n   sans-serif "),
            "'Open   Sans', sans-serif"
        );
    }

    #[test]
    fn comment_body_strips_delimiters() {
        assert_eq!(comment_body("/*  Header styles */"), "Header styles");
    }

    #[test]
    fn push_last_wins_keeps_later_position() {
        let mut decls = Vec::new();
        push_last_wins(&mut decls, Declaration::property("color", "red"));
        push_last_wins(&mut decls, Declaration::property("margin", "0"));
        push_last_wins(&mut decls, Declaration::property("color", "blue"));
        assert_eq!(
            decls,
            vec![
                Declaration::property("margin", "0"),
                Declaration::property("color", "blue"),
            ]
        );
    }

    #[test]
    fn push_last_wins_separates_important() {
        let mut decls = Vec::new();
        push_last_wins(&mut decls, Declaration::important("color", "red"));
        push_last_wins(&mut decls, Declaration::property("color", "blue"));
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn orphan_steps_are_blanked_in_place() {
        let source = "0% { color: red; }\n.a { color: red; }\nfrom, to {\n  opacity: 1;\n}";
        let blanked = blank_orphan_keyframe_steps(source);
        assert_eq!(blanked.len(), source.len());
        assert_eq!(blanked.lines().count(), source.lines().count());
        assert_eq!(blanked.trim(), ".a { color: red; }");
    }

    #[test]
    fn keyframes_and_plain_rules_are_untouched() {
        let source = "@keyframes fade { 0% { opacity: 0; } 100% { opacity: 1; } }\n\
                      .a[data-x=\"{\"] { content: \"50% {\"; }";
        assert!(matches!(blank_orphan_keyframe_steps(source), Cow::Borrowed(_)));
    }

    #[test]
    fn compose_selector_handles_ampersand() {
        assert_eq!(compose_selector(".card", "&:hover"), ".card:hover");
        assert_eq!(compose_selector(".card", ".title"), ".card .title");
    }
}

//! Block-Element-Modifier selector classification.
//!
//! Grammar: `.block(__element)*(--modifier)?` optionally followed by a
//! structural suffix (`:hover`, `::before`, `[disabled]`) that is kept aside
//! and re-attached as a nested `&` fragment by the tree builder.

use nest_core::BemInfo;

/// Classify one simple selector against the BEM grammar.
///
/// Returns `None` for anything that is not a single leading-dot class
/// (ids, tags, multi-class compounds, descendant chains, selector lists).
#[must_use]
pub fn classify(selector: &str) -> Option<BemInfo> {
    let body = selector.trim().strip_prefix('.')?;
    let (class, suffix) = split_suffix(body)?;

    let (path, modifier) = match class.split_once("--") {
        Some((path, modifier)) => (path, Some(modifier)),
        None => (class, None),
    };
    if let Some(modifier) = modifier
        && !is_token(modifier)
    {
        return None;
    }

    let mut parts = path.split("__");
    let block = parts.next().filter(|b| is_token(b))?;
    let mut elements = Vec::new();
    for element in parts {
        if !is_token(element) {
            return None;
        }
        elements.push(element.to_string());
    }

    Some(BemInfo::new(
        block,
        elements,
        modifier.map(str::to_string),
        suffix.map(str::to_string),
    ))
}

/// Split the class name from a trailing pseudo/attribute suffix.
///
/// Returns `None` when the class is followed by anything other than a
/// single structural suffix.
fn split_suffix(body: &str) -> Option<(&str, Option<&str>)> {
    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(body.len());
    let (class, rest) = body.split_at(end);
    if rest.is_empty() {
        return Some((class, None));
    }
    if !(rest.starts_with(':') || rest.starts_with('[')) || !is_structural_suffix(rest) {
        return None;
    }
    Some((class, Some(rest)))
}

/// A suffix may hold pseudo-classes and attribute selectors but no further
/// classes, ids, combinators or list separators at the top level.
fn is_structural_suffix(suffix: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for c in suffix.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ if depth == 0
                && (c.is_whitespace() || matches!(c, '>' | '+' | '~' | ',' | '.' | '#')) =>
            {
                return false;
            }
            _ => {}
        }
    }
    depth == 0 && quote.is_none()
}

/// Alphanumeric run with single interior hyphens (`primary`, `nav-item`).
fn is_token(token: &str) -> bool {
    !token.is_empty()
        && !token.starts_with('-')
        && !token.ends_with('-')
        && !token.contains("--")
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

//! Selector string utilities.
//!
//! Hand-written scanners that track `()` / `[]` depth and quoted strings, so
//! commas, spaces and combinators inside `:not(...)` or `[title="a b"]` are
//! never mistaken for top-level structure.

use nest_core::Specificity;

use crate::error::ParserError;

/// Legacy pseudo-elements that may be written with a single colon.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Tracks nesting depth and quoting while scanning a selector.
#[derive(Debug, Default)]
struct Scanner {
    parens: usize,
    brackets: usize,
    quote: Option<char>,
}

impl Scanner {
    /// Feed one character; returns `true` when it sits at the top level.
    fn step(&mut self, c: char) -> bool {
        if let Some(q) = self.quote {
            if c == q {
                self.quote = None;
            }
            return false;
        }
        match c {
            '"' | '\'' => {
                self.quote = Some(c);
                false
            }
            '(' => {
                self.parens += 1;
                false
            }
            ')' => {
                self.parens = self.parens.saturating_sub(1);
                false
            }
            '[' => {
                self.brackets += 1;
                false
            }
            ']' => {
                self.brackets = self.brackets.saturating_sub(1);
                false
            }
            _ => self.parens == 0 && self.brackets == 0,
        }
    }

    const fn balanced(&self) -> bool {
        self.parens == 0 && self.brackets == 0 && self.quote.is_none()
    }
}

/// Split a selector list on top-level commas.
///
/// Empty members are skipped. Each member is trimmed but otherwise kept as
/// written.
///
/// # Errors
/// Returns `ParserError::InvalidSelector` when brackets, parentheses or
/// quotes are unbalanced.
pub fn split_selector_list(list: &str) -> Result<Vec<String>, ParserError> {
    let mut scanner = Scanner::default();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut closers = 0usize;

    for c in list.chars() {
        if matches!(c, ')' | ']') && scanner.quote.is_none() {
            let open = if c == ')' {
                scanner.parens
            } else {
                scanner.brackets
            };
            if open == 0 {
                closers += 1;
            }
        }
        if scanner.step(c) && c == ',' {
            push_trimmed(&mut parts, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }

    if !scanner.balanced() || closers > 0 {
        return Err(ParserError::InvalidSelector(list.trim().to_string()));
    }
    push_trimmed(&mut parts, &current);
    Ok(parts)
}

fn push_trimmed(parts: &mut Vec<String>, part: &str) {
    let trimmed = part.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
}

/// Split a complex selector into compound selectors.
///
/// Explicit combinators are attached to the compound that follows them:
/// `.nav>li  a` becomes `[".nav", "> li", "a"]`.
#[must_use]
pub fn compound_tokens(selector: &str) -> Vec<String> {
    let mut scanner = Scanner::default();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut combinator: Option<char> = None;

    let flush = |tokens: &mut Vec<String>, current: &mut String, combinator: &mut Option<char>| {
        if current.is_empty() {
            return;
        }
        let token = match combinator.take() {
            Some(c) => format!("{c} {current}"),
            None => current.clone(),
        };
        tokens.push(token);
        current.clear();
    };

    for c in selector.chars() {
        let top_level = scanner.step(c);
        if top_level && c.is_whitespace() {
            flush(&mut tokens, &mut current, &mut combinator);
        } else if top_level && matches!(c, '>' | '+' | '~') {
            flush(&mut tokens, &mut current, &mut combinator);
            combinator = Some(c);
        } else {
            current.push(c);
        }
    }
    flush(&mut tokens, &mut current, &mut combinator);
    tokens
}

/// Collapse whitespace and space combinators uniformly (`a>b` → `a > b`).
#[must_use]
pub fn normalize_selector(selector: &str) -> String {
    compound_tokens(selector).join(" ")
}

/// Whether a selector is a bare keyframe step (`from`, `to`, `50%`).
#[must_use]
pub fn is_keyframe_step(selector: &str) -> bool {
    let s = selector.trim();
    if s == "from" || s == "to" {
        return true;
    }
    s.strip_suffix('%')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Compute `(ids, classes, elements)` for one complex selector.
///
/// Arguments of functional pseudo-classes are not counted.
#[must_use]
pub fn specificity(selector: &str) -> Specificity {
    let chars: Vec<char> = selector.chars().collect();
    let mut spec = Specificity::default();
    let mut i = 0;
    let mut at_compound_start = true;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '#' => {
                spec.ids += 1;
                i = skip_ident(&chars, i + 1);
                at_compound_start = false;
            }
            '.' => {
                spec.classes += 1;
                i = skip_ident(&chars, i + 1);
                at_compound_start = false;
            }
            '[' => {
                spec.classes += 1;
                i = skip_group(&chars, i, '[', ']');
                at_compound_start = false;
            }
            ':' => {
                let double = chars.get(i + 1) == Some(&':');
                let start = if double { i + 2 } else { i + 1 };
                let end = skip_ident(&chars, start);
                let name: String = chars[start..end].iter().collect::<String>().to_lowercase();
                if double || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
                    spec.elements += 1;
                } else if name != "where" {
                    spec.classes += 1;
                }
                i = if chars.get(end) == Some(&'(') {
                    skip_group(&chars, end, '(', ')')
                } else {
                    end
                };
                at_compound_start = false;
            }
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                at_compound_start = true;
                i += 1;
            }
            '*' => {
                at_compound_start = false;
                i += 1;
            }
            c if at_compound_start && (c.is_alphabetic() || c == '_' || c == '-') => {
                spec.elements += 1;
                i = skip_ident(&chars, i);
                at_compound_start = false;
            }
            _ => i += 1,
        }
    }
    spec
}

fn skip_ident(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i].is_alphanumeric() || matches!(chars[i], '-' | '_' | '\\')) {
        i += 1;
    }
    i
}

fn skip_group(chars: &[char], start: usize, open: char, close: char) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < chars.len() {
        if chars[i] == open {
            depth += 1;
        } else if chars[i] == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + 1;
            }
        }
        i += 1;
    }
    i
}

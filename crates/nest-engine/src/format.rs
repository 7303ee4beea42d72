//! SCSS text emission.

use std::borrow::Cow;
use std::sync::LazyLock;

use nest_config::FormatConfig;
use nest_core::rule::{AT_RULE_BLOCK_KEY, KEYFRAMES_BLOCK_KEY};
use nest_core::{Declaration, ExtractedVariable, VariableCategory};
use regex::Regex;

use crate::tree::{NestedRule, NodeKind};

/// `from, 50% { opacity: 0.5; }` steps inside a captured keyframes body.
static KEYFRAME_STEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"((?:\d+(?:\.\d+)?%|from|to)(?:\s*,\s*(?:\d+(?:\.\d+)?%|from|to))*)\s*\{([^}]*)\}",
    )
    .expect("keyframe step regex is valid")
});

/// A built tree and the media prelude that wraps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBucket {
    pub query: Option<String>,
    pub tree: NestedRule,
}

pub struct ScssFormatter<'a> {
    config: &'a FormatConfig,
    unit: String,
}

impl<'a> ScssFormatter<'a> {
    #[must_use]
    pub fn new(config: &'a FormatConfig) -> Self {
        Self {
            config,
            unit: config.indent_unit(),
        }
    }

    /// Render the variable header followed by every bucket.
    ///
    /// The result ends with exactly one newline, or is empty when there is
    /// nothing to emit.
    #[must_use]
    pub fn render(&self, buckets: &[RenderedBucket], variables: &[ExtractedVariable]) -> String {
        let mut lines: Vec<String> = Vec::new();
        self.emit_variables(variables, &mut lines);

        for bucket in buckets {
            match &bucket.query {
                None => {
                    for comment in &bucket.tree.declarations {
                        lines.push(self.declaration_line(comment, 0));
                    }
                    if !bucket.tree.declarations.is_empty() {
                        lines.push(String::new());
                    }
                    for node in &bucket.tree.children {
                        self.emit_node(node, 0, &mut lines);
                        lines.push(String::new());
                    }
                }
                Some(query) => {
                    lines.push(format!("{query} {{"));
                    for comment in &bucket.tree.declarations {
                        lines.push(self.declaration_line(comment, 1));
                    }
                    for (i, node) in bucket.tree.children.iter().enumerate() {
                        if i > 0 || !bucket.tree.declarations.is_empty() {
                            lines.push(String::new());
                        }
                        self.emit_node(node, 1, &mut lines);
                    }
                    lines.push("}".to_string());
                    lines.push(String::new());
                }
            }
        }

        let text = lines.join("\n");
        let text = text.trim_end();
        if text.is_empty() {
            String::new()
        } else {
            format!("{text}\n")
        }
    }

    fn emit_variables(&self, variables: &[ExtractedVariable], lines: &mut Vec<String>) {
        if variables.is_empty() {
            return;
        }
        lines.push("// Variables".to_string());
        for category in VariableCategory::ALL {
            let mut group: Vec<&ExtractedVariable> =
                variables.iter().filter(|v| v.category == category).collect();
            if group.is_empty() {
                continue;
            }
            group.sort_by(|a, b| a.name.cmp(&b.name));
            lines.push(format!("// {} variables", category.label()));
            lines.extend(group.iter().map(ToString::to_string));
            lines.push(String::new());
        }
    }

    fn indent(&self, depth: usize) -> String {
        self.unit.repeat(depth)
    }

    fn declaration_line(&self, declaration: &Declaration, depth: usize) -> String {
        format!("{}{declaration}", self.indent(depth))
    }

    fn emit_node(&self, node: &NestedRule, depth: usize, lines: &mut Vec<String>) {
        let indent = self.indent(depth);
        match node.kind {
            NodeKind::Statement => lines.push(format!("{indent}{};", node.fragment)),
            NodeKind::Keyframes => {
                lines.push(format!("{indent}{} {{", node.fragment));
                let body = raw_block(node, KEYFRAMES_BLOCK_KEY);
                if !self.emit_keyframe_steps(body.unwrap_or_default(), depth + 1, lines) {
                    self.emit_raw(body.unwrap_or_default(), depth + 1, lines);
                }
                lines.push(format!("{indent}}}"));
            }
            NodeKind::AtRule => {
                lines.push(format!("{indent}{} {{", node.fragment));
                match raw_block(node, AT_RULE_BLOCK_KEY) {
                    Some(body) => self.emit_raw(body, depth + 1, lines),
                    None => {
                        for declaration in &node.declarations {
                            lines.push(self.declaration_line(declaration, depth + 1));
                        }
                    }
                }
                lines.push(format!("{indent}}}"));
            }
            NodeKind::Rule => {
                lines.push(format!("{indent}{} {{", node.fragment));
                for declaration in self.ordered_declarations(&node.declarations).iter() {
                    lines.push(self.declaration_line(declaration, depth + 1));
                }
                if !node.declarations.is_empty() && !node.children.is_empty() {
                    lines.push(String::new());
                }
                for child in self.ordered_children(&node.children).iter() {
                    self.emit_node(child, depth + 1, lines);
                }
                lines.push(format!("{indent}}}"));
            }
        }
    }

    fn ordered_declarations<'d>(&self, declarations: &'d [Declaration]) -> Cow<'d, [Declaration]> {
        if !self.config.sort_properties {
            return Cow::Borrowed(declarations);
        }
        let mut sorted = declarations.to_vec();
        sorted.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        Cow::Owned(sorted)
    }

    fn ordered_children<'n>(&self, children: &'n [NestedRule]) -> Vec<&'n NestedRule> {
        let mut ordered: Vec<&NestedRule> = children.iter().collect();
        if self.config.sort_properties {
            ordered.sort_by_cached_key(|c| child_sort_key(&c.fragment));
        }
        ordered
    }

    /// Re-emit keyframe steps with last-wins properties. Returns `false`
    /// when the body holds no recognizable step.
    fn emit_keyframe_steps(&self, body: &str, depth: usize, lines: &mut Vec<String>) -> bool {
        let mut matched = false;
        for caps in KEYFRAME_STEP_RE.captures_iter(body) {
            matched = true;
            let steps: Vec<&str> = caps[1].split(',').map(str::trim).collect();
            lines.push(format!("{}{} {{", self.indent(depth), steps.join(", ")));
            for (property, value) in step_properties(&caps[2]) {
                lines.push(format!("{}{property}: {value};", self.indent(depth + 1)));
            }
            lines.push(format!("{}}}", self.indent(depth)));
        }
        matched
    }

    /// Re-indent verbatim block text by brace depth.
    fn emit_raw(&self, body: &str, depth: usize, lines: &mut Vec<String>) {
        let mut level = depth;
        let mut current = String::new();
        let mut parens = 0usize;
        let mut quote: Option<char> = None;

        let flush = |current: &mut String, level: usize, lines: &mut Vec<String>, end: &str| {
            let text = current.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() || !end.is_empty() {
                let line = if text.is_empty() {
                    end.to_string()
                } else if end.is_empty() {
                    text
                } else {
                    format!("{text}{end}")
                };
                lines.push(format!("{}{line}", self.indent(level)));
            }
            current.clear();
        };

        for c in body.chars() {
            if let Some(q) = quote {
                current.push(c);
                if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    parens += 1;
                    current.push(c);
                }
                ')' => {
                    parens = parens.saturating_sub(1);
                    current.push(c);
                }
                '{' if parens == 0 => {
                    flush(&mut current, level, lines, " {");
                    level += 1;
                }
                '}' if parens == 0 => {
                    flush(&mut current, level, lines, "");
                    level = level.saturating_sub(1).max(depth);
                    lines.push(format!("{}}}", self.indent(level)));
                }
                ';' if parens == 0 => flush(&mut current, level, lines, ";"),
                _ => current.push(c),
            }
        }
        flush(&mut current, level, lines, "");
    }
}

fn raw_block<'n>(node: &'n NestedRule, key: &str) -> Option<&'n str> {
    node.declarations
        .iter()
        .filter_map(Declaration::as_property)
        .find(|p| p.property == key)
        .map(|p| p.value.as_str())
}

/// Element children (`&__`) sort before modifiers (`&--`).
fn child_sort_key(fragment: &str) -> String {
    fragment.replace("&__", "&\u{1}").replace("&--", "&\u{2}")
}

/// `property: value` pairs of one keyframe step, last occurrence wins.
fn step_properties(body: &str) -> Vec<(String, String)> {
    let mut properties: Vec<(String, String)> = Vec::new();
    for declaration in body.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim();
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        if property.is_empty() || value.is_empty() {
            continue;
        }
        properties.retain(|(p, _)| p != property);
        properties.push((property.to_string(), value));
    }
    properties
}

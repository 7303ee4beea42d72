use ast_grep_core::Node;
use nest_core::rule::{AT_RULE_BLOCK_KEY, KEYFRAMES_BLOCK_KEY};
use nest_core::{Declaration, ParsedRule, RuleKind, Specificity};

use super::ExtractOptions;
use super::helpers::{
    block_content, child_text, collapse_whitespace, comment_body, compose_selector,
    parse_declaration, prelude_text, push_last_wins,
};
use crate::error::ParserError;
use crate::selectors::{is_keyframe_step, normalize_selector, specificity, split_selector_list};

/// Block children that keep an at-rule block in declaration form.
const DECLARATION_BLOCK_KINDS: &[&str] = &["declaration", "comment", "{", "}", ";"];

/// Block children of a style rule that are not declarations.
fn is_nested_item<D: ast_grep_core::Doc>(node: &Node<D>) -> bool {
    let kind = node.kind();
    match kind.as_ref() {
        "rule_set" | "media_statement" => true,
        "declaration" | "comment" | "{" | "}" | ";" => false,
        _ => node.is_named() && node.text().trim_start().starts_with('@'),
    }
}

pub(super) struct RuleCollector {
    options: ExtractOptions,
    rules: Vec<ParsedRule>,
}

impl RuleCollector {
    pub(super) const fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            rules: Vec::new(),
        }
    }

    pub(super) fn finish(self) -> Vec<ParsedRule> {
        self.rules
    }

    pub(super) fn collect_nodes<D: ast_grep_core::Doc>(
        &mut self,
        node: &Node<D>,
        media: Option<&str>,
    ) -> Result<(), ParserError> {
        let kind = node.kind();
        match kind.as_ref() {
            "stylesheet" => {
                for child in node.children() {
                    self.collect_nodes(&child, media)?;
                }
            }
            "rule_set" => self.process_rule_set(node, media, &[])?,
            "media_statement" => self.process_media(node)?,
            "keyframes_statement" => self.process_keyframes(node, media),
            "import_statement" | "charset_statement" | "namespace_statement" => {
                self.process_statement(node, media);
            }
            "comment" => {
                if self.options.preserve_comments {
                    self.rules.push(ParsedRule::comment(
                        comment_body(&node.text()),
                        media.map(str::to_string),
                    ));
                }
            }
            "at_rule" | "supports_statement" | "scope_statement" => {
                self.process_at_rule(node, media);
            }
            _ => {
                if node.text().trim_start().starts_with('@') {
                    self.process_at_rule(node, media);
                }
            }
        }
        Ok(())
    }

    // ── Rule set processing ────────────────────────────────────────────

    fn process_rule_set<D: ast_grep_core::Doc>(
        &mut self,
        node: &Node<D>,
        media: Option<&str>,
        parents: &[String],
    ) -> Result<(), ParserError> {
        let selector_text = child_text(node, "selectors").unwrap_or_default();
        let mut selectors = Vec::new();
        for selector in split_selector_list(&selector_text)? {
            let selector = normalize_selector(&selector);
            if parents.is_empty() {
                selectors.push(selector);
            } else {
                selectors.extend(
                    parents
                        .iter()
                        .map(|parent| normalize_selector(&compose_selector(parent, &selector))),
                );
            }
        }

        let block = node.children().find(|c| c.kind().as_ref() == "block");
        let declarations = block
            .as_ref()
            .map(|b| self.collect_declarations(b))
            .unwrap_or_default();
        let nested: Vec<_> = block
            .as_ref()
            .map(|b| b.children().filter(is_nested_item).collect())
            .unwrap_or_default();

        if !(declarations.is_empty() && !nested.is_empty()) {
            for selector in &selectors {
                if is_keyframe_step(selector) {
                    tracing::debug!(%selector, "dropping orphan keyframe step");
                    continue;
                }
                self.rules.push(ParsedRule::style(
                    selector.clone(),
                    declarations.clone(),
                    specificity(selector),
                    media.map(str::to_string),
                ));
            }
        }

        self.process_nested(&nested, media, &selectors)
    }

    /// Rule sets and `@media` blocks inside a style rule, in source order.
    fn process_nested<D: ast_grep_core::Doc>(
        &mut self,
        children: &[Node<D>],
        media: Option<&str>,
        parents: &[String],
    ) -> Result<(), ParserError> {
        for child in children {
            match child.kind().as_ref() {
                "rule_set" => self.process_rule_set(child, media, parents)?,
                "media_statement" => self.process_nested_media(child, parents)?,
                _ => {
                    return Err(ParserError::UnsupportedNesting {
                        line: child.start_pos().line() + 1,
                        at_rule: prelude_text(child),
                    });
                }
            }
        }
        Ok(())
    }

    /// `.a { @media print { color: black; } }` yields `.a` under
    /// `@media print`. The inner query replaces any outer one.
    fn process_nested_media<D: ast_grep_core::Doc>(
        &mut self,
        node: &Node<D>,
        parents: &[String],
    ) -> Result<(), ParserError> {
        let query = prelude_text(node);
        let Some(block) = node.children().find(|c| c.kind().as_ref() == "block") else {
            return Ok(());
        };

        let declarations = self.collect_declarations(&block);
        if declarations.iter().any(|d| !d.is_comment()) {
            for parent in parents.iter().filter(|p| !is_keyframe_step(p)) {
                self.rules.push(ParsedRule::style(
                    parent.clone(),
                    declarations.clone(),
                    specificity(parent),
                    Some(query.clone()),
                ));
            }
        }

        let nested: Vec<_> = block.children().filter(is_nested_item).collect();
        self.process_nested(&nested, Some(&query), parents)
    }

    fn collect_declarations<D: ast_grep_core::Doc>(&self, block: &Node<D>) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        for child in block.children() {
            match child.kind().as_ref() {
                "declaration" => {
                    if let Some(decl) = parse_declaration(&child) {
                        push_last_wins(&mut declarations, decl);
                    }
                }
                "comment" if self.options.preserve_comments => {
                    declarations.push(Declaration::comment(comment_body(&child.text())));
                }
                _ => {}
            }
        }
        declarations
    }

    // ── @media processing ──────────────────────────────────────────────

    fn process_media<D: ast_grep_core::Doc>(&mut self, node: &Node<D>) -> Result<(), ParserError> {
        let query = prelude_text(node);
        if let Some(block) = node.children().find(|c| c.kind().as_ref() == "block") {
            for child in block.children() {
                self.collect_nodes(&child, Some(&query))?;
            }
        }
        Ok(())
    }

    // ── @keyframes processing ──────────────────────────────────────────

    fn process_keyframes<D: ast_grep_core::Doc>(&mut self, node: &Node<D>, media: Option<&str>) {
        let selector = prelude_text(node);
        let content = node
            .children()
            .find(|c| c.kind().as_ref() == "keyframe_block_list")
            .map(|list| block_content(&list))
            .unwrap_or_default();

        self.rules.push(ParsedRule::with_kind(
            RuleKind::Keyframes,
            selector,
            vec![Declaration::property(KEYFRAMES_BLOCK_KEY, content)],
            Specificity::default(),
            media.map(str::to_string),
        ));
    }

    // ── Generic at-rule processing ─────────────────────────────────────

    fn process_at_rule<D: ast_grep_core::Doc>(&mut self, node: &Node<D>, media: Option<&str>) {
        let Some(block) = node.children().find(|c| c.kind().as_ref() == "block") else {
            self.process_statement(node, media);
            return;
        };

        let prelude = prelude_text(node);
        let declaration_form = block
            .children()
            .all(|c| DECLARATION_BLOCK_KINDS.contains(&c.kind().as_ref()));
        let declarations = if declaration_form {
            self.collect_declarations(&block)
        } else {
            vec![Declaration::property(AT_RULE_BLOCK_KEY, block_content(&block))]
        };

        self.rules.push(ParsedRule::with_kind(
            RuleKind::AtRule,
            prelude,
            declarations,
            Specificity::default(),
            media.map(str::to_string),
        ));
    }

    fn process_statement<D: ast_grep_core::Doc>(&mut self, node: &Node<D>, media: Option<&str>) {
        let text = node.text();
        let statement = collapse_whitespace(text.trim().trim_end_matches(';'));
        self.rules.push(ParsedRule::with_kind(
            RuleKind::Statement,
            statement,
            Vec::new(),
            Specificity::default(),
            media.map(str::to_string),
        ));
    }
}

//! Selector nesting tree.
//!
//! Every rule is turned into a path of selector fragments from the root
//! (`[".card", "&__title", "&:hover"]`) and inserted get-or-create along
//! that path, so one parent never holds two rule nodes with the same
//! fragment. Three strategies produce paths, tried in order:
//!
//! 1. BEM: `.block` → `&__element`… → `&--modifier` → `&<pseudo>`
//! 2. Smart: the first compound nests under the longest base compound it
//!    extends, where bases are collected from the whole bucket up front
//!    so the result does not depend on rule order
//! 3. Basic: the literal compound chain
//!
//! At-rules bypass nesting and comments are hoisted to the root.

use std::collections::BTreeSet;

use nest_config::NestingConfig;
use nest_core::{
    BemInfo, Declaration, Diagnostic, DiagnosticSink, NoopSink, ParsedRule, RuleKind,
};
use nest_parser::selectors::{compound_tokens, split_selector_list};

/// Characters that may follow a base compound when a selector extends it.
const EXTENSION_BOUNDARIES: &[char] = &['.', ':', '[', '#'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Rule,
    AtRule,
    Keyframes,
    Statement,
}

impl From<RuleKind> for NodeKind {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Keyframes => Self::Keyframes,
            RuleKind::AtRule => Self::AtRule,
            RuleKind::Statement => Self::Statement,
            RuleKind::Style | RuleKind::Comment => Self::Rule,
        }
    }
}

/// One node of the nesting tree. The root has an empty fragment and holds
/// only hoisted comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedRule {
    pub fragment: String,
    pub declarations: Vec<Declaration>,
    pub children: Vec<NestedRule>,
    pub bem: Option<BemInfo>,
    pub kind: NodeKind,
}

impl NestedRule {
    #[must_use]
    pub fn root() -> Self {
        Self::rule(String::new())
    }

    fn rule(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            declarations: Vec::new(),
            children: Vec::new(),
            bem: None,
            kind: NodeKind::Rule,
        }
    }

    fn passthrough(rule: &ParsedRule) -> Self {
        Self {
            fragment: rule.selector.clone(),
            declarations: rule.declarations.clone(),
            children: Vec::new(),
            bem: None,
            kind: rule.kind.into(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.children.is_empty()
    }

    /// Rule child with exactly this fragment.
    #[must_use]
    pub fn child(&self, fragment: &str) -> Option<&Self> {
        self.children
            .iter()
            .find(|c| c.kind == NodeKind::Rule && c.fragment == fragment)
    }

    fn child_or_insert(&mut self, fragment: &str) -> &mut Self {
        let idx = if let Some(i) = self
            .children
            .iter()
            .position(|c| c.kind == NodeKind::Rule && c.fragment == fragment)
        {
            i
        } else {
            self.children.push(Self::rule(fragment));
            self.children.len() - 1
        };
        &mut self.children[idx]
    }

    /// Walk `path` from this node, creating missing rule nodes.
    pub fn insert_path(&mut self, path: &[String]) -> &mut Self {
        let mut node = self;
        for fragment in path {
            node = node.child_or_insert(fragment);
        }
        node
    }

    /// Resolve every node back to fully-qualified selectors.
    ///
    /// Yields one `(selector, declarations)` pair per node that carries
    /// declarations, in pre-order. Comma fragments fan out against every
    /// parent selector.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, Vec<Declaration>)> {
        let mut out = Vec::new();
        for child in &self.children {
            child.flatten_into(&[], &mut out);
        }
        out
    }

    fn flatten_into(&self, parents: &[String], out: &mut Vec<(String, Vec<Declaration>)>) {
        let members = split_selector_list(&self.fragment)
            .unwrap_or_else(|_| vec![self.fragment.clone()]);
        let selectors: Vec<String> = if parents.is_empty() {
            members
        } else {
            parents
                .iter()
                .flat_map(|parent| members.iter().map(move |m| resolve(parent, m)))
                .collect()
        };

        if !self.declarations.is_empty() {
            out.push((selectors.join(", "), self.declarations.clone()));
        }
        for child in &self.children {
            child.flatten_into(&selectors, out);
        }
    }
}

fn resolve(parent: &str, fragment: &str) -> String {
    if fragment.contains('&') {
        fragment.replace('&', parent)
    } else {
        format!("{parent} {fragment}")
    }
}

/// Builds one nesting tree per media bucket.
pub struct TreeBuilder<'a> {
    config: &'a NestingConfig,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> TreeBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a NestingConfig) -> Self {
        Self {
            config,
            sink: &NoopSink,
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Insert rules in source order.
    #[must_use]
    pub fn build(&self, rules: &[ParsedRule]) -> NestedRule {
        let bases = self.smart_bases(rules);
        let mut root = NestedRule::root();
        for rule in rules {
            match rule.kind {
                RuleKind::Comment => root.declarations.extend(rule.declarations.iter().cloned()),
                RuleKind::Keyframes | RuleKind::AtRule | RuleKind::Statement => {
                    root.children.push(NestedRule::passthrough(rule));
                }
                RuleKind::Style => {
                    let path = self.path_for(rule, &bases);
                    let path = self.fold(path, &rule.selector);
                    let node = root.insert_path(&path);
                    node.declarations.extend(rule.declarations.iter().cloned());
                    if node.bem.is_none() {
                        node.bem.clone_from(&rule.bem);
                    }
                }
            }
        }
        root
    }

    fn path_for(&self, rule: &ParsedRule, bases: &BTreeSet<String>) -> Vec<String> {
        if is_selector_list(&rule.selector) {
            return vec![rule.selector.clone()];
        }
        if let Some(info) = self.bem_info(rule) {
            return bem_path(info);
        }
        if self.config.enable_smart_nesting {
            smart_path(&rule.selector, bases)
        } else {
            basic_path(&rule.selector)
        }
    }

    fn bem_info<'r>(&self, rule: &'r ParsedRule) -> Option<&'r BemInfo> {
        rule.bem.as_ref().filter(|_| self.config.enable_bem)
    }

    /// Base compounds smart nesting may hang rules under: every first
    /// compound with and without its pseudo tail, plus BEM blocks.
    fn smart_bases(&self, rules: &[ParsedRule]) -> BTreeSet<String> {
        let mut bases = BTreeSet::new();
        if !self.config.enable_smart_nesting {
            return bases;
        }
        for rule in rules.iter().filter(|r| r.kind == RuleKind::Style) {
            if is_selector_list(&rule.selector) {
                continue;
            }
            if let Some(info) = self.bem_info(rule) {
                bases.insert(info.block_selector());
                continue;
            }
            if let Some(first) = compound_tokens(&rule.selector).into_iter().next() {
                let stripped = strip_pseudo(&first);
                if !stripped.is_empty() {
                    bases.insert(stripped.to_string());
                }
                bases.insert(first);
            }
        }
        bases
    }

    /// Collapse fragments beyond `max_nesting_depth` into the last allowed
    /// one. `&` fragments concatenate, plain fragments join with a space.
    fn fold(&self, mut path: Vec<String>, selector: &str) -> Vec<String> {
        let max_depth = self.config.max_nesting_depth;
        if path.len() <= max_depth + 1 {
            return path;
        }

        let tail = path.split_off(max_depth);
        let mut folded = String::new();
        for fragment in tail {
            if folded.is_empty() {
                folded = fragment;
            } else if let Some(rest) = fragment.strip_prefix('&') {
                folded.push_str(rest);
            } else {
                folded.push(' ');
                folded.push_str(&fragment);
            }
        }
        path.push(folded);

        self.sink.emit(Diagnostic::DepthFolded {
            selector: selector.to_string(),
            max_depth,
        });
        path
    }
}

fn is_selector_list(selector: &str) -> bool {
    split_selector_list(selector).is_ok_and(|members| members.len() > 1)
}

fn bem_path(info: &BemInfo) -> Vec<String> {
    let mut path = vec![info.block_selector()];
    path.extend(info.elements.iter().map(|e| format!("&__{e}")));
    if let Some(modifier) = &info.modifier {
        path.push(format!("&--{modifier}"));
    }
    if let Some(suffix) = &info.suffix {
        path.push(format!("&{suffix}"));
    }
    path
}

fn basic_path(selector: &str) -> Vec<String> {
    let tokens = compound_tokens(selector);
    if tokens.is_empty() {
        vec![selector.to_string()]
    } else {
        tokens
    }
}

fn smart_path(selector: &str, bases: &BTreeSet<String>) -> Vec<String> {
    let mut tokens = compound_tokens(selector).into_iter();
    let Some(first) = tokens.next() else {
        return vec![selector.to_string()];
    };
    let mut path = base_chain(&first, bases);
    path.extend(tokens);
    path
}

/// `.btn.active:hover` with bases `.btn` and `.btn.active` becomes
/// `[".btn", "&.active", "&:hover"]`.
fn base_chain(compound: &str, bases: &BTreeSet<String>) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = compound;
    while let Some(base) = longest_extended_base(current, bases) {
        chain.push(format!("&{}", &current[base.len()..]));
        current = base;
    }
    chain.push(current.to_string());
    chain.reverse();
    chain
}

/// Longest base that `compound` strictly extends at a class, pseudo,
/// attribute or id boundary.
fn longest_extended_base<'b>(compound: &str, bases: &'b BTreeSet<String>) -> Option<&'b str> {
    bases
        .iter()
        .filter(|base| !base.is_empty() && base.len() < compound.len())
        .filter(|base| {
            compound
                .strip_prefix(base.as_str())
                .is_some_and(|rest| rest.starts_with(EXTENSION_BOUNDARIES))
        })
        .max_by_key(|base| base.len())
        .map(String::as_str)
}

/// Compound without its trailing pseudo-classes (`a:hover` → `a`).
fn strip_pseudo(compound: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in compound.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return &compound[..i],
            _ => {}
        }
    }
    compound
}

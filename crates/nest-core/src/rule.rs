//! Flat rule records produced by the rule extractor.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bem::BemInfo;
use crate::declaration::Declaration;

/// Selector used for comment pseudo-rules.
pub const COMMENT_SELECTOR: &str = "/* COMMENT */";

/// Property key holding the verbatim step content of a `@keyframes` rule.
pub const KEYFRAMES_BLOCK_KEY: &str = "@keyframes-block";

/// Property key holding the verbatim content of an opaque at-rule block.
pub const AT_RULE_BLOCK_KEY: &str = "@at-rule-block";

/// What a [`ParsedRule`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// An ordinary style rule with one simple selector.
    Style,
    /// A comment pseudo-rule.
    Comment,
    /// A captured `@keyframes` block.
    Keyframes,
    /// Any other at-rule with a block (`@font-face`, `@supports`, ...).
    AtRule,
    /// A block-less at-rule statement (`@import`, `@charset`, `@namespace`).
    Statement,
}

impl RuleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Comment => "comment",
            Self::Keyframes => "keyframes",
            Self::AtRule => "at_rule",
            Self::Statement => "statement",
        }
    }

    /// Whether rules of this kind bypass nesting and pass through verbatim.
    #[must_use]
    pub const fn is_passthrough(self) -> bool {
        matches!(self, Self::Keyframes | Self::AtRule | Self::Statement)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selector specificity as `(ids, classes, elements)`.
///
/// Attribute selectors and pseudo-classes count as classes; pseudo-elements
/// count as elements.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub elements: u32,
}

impl Specificity {
    #[must_use]
    pub const fn new(ids: u32, classes: u32, elements: u32) -> Self {
        Self {
            ids,
            classes,
            elements,
        }
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.ids, self.classes, self.elements)
    }
}

/// One simple selector and its declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub specificity: Specificity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bem: Option<BemInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_query: Option<String>,
    pub hash: String,
    pub kind: RuleKind,
}

impl ParsedRule {
    /// Build a style rule, computing its declaration hash.
    #[must_use]
    pub fn style(
        selector: impl Into<String>,
        declarations: Vec<Declaration>,
        specificity: Specificity,
        media_query: Option<String>,
    ) -> Self {
        Self::with_kind(
            RuleKind::Style,
            selector,
            declarations,
            specificity,
            media_query,
        )
    }

    /// Build a comment pseudo-rule.
    #[must_use]
    pub fn comment(text: impl Into<String>, media_query: Option<String>) -> Self {
        Self::with_kind(
            RuleKind::Comment,
            COMMENT_SELECTOR,
            vec![Declaration::comment(text)],
            Specificity::default(),
            media_query,
        )
    }

    #[must_use]
    pub fn with_kind(
        kind: RuleKind,
        selector: impl Into<String>,
        declarations: Vec<Declaration>,
        specificity: Specificity,
        media_query: Option<String>,
    ) -> Self {
        let hash = declaration_hash(&declarations);
        Self {
            selector: selector.into(),
            declarations,
            specificity,
            bem: None,
            media_query,
            hash,
            kind,
        }
    }

    /// Recompute the hash after declarations were rewritten.
    pub fn refresh_hash(&mut self) {
        self.hash = declaration_hash(&self.declarations);
    }

    /// Sorted `property:value[!important]` signatures, comments excluded.
    #[must_use]
    pub fn declaration_signatures(&self) -> Vec<String> {
        sorted_signatures(&self.declarations)
    }

    #[must_use]
    pub fn has_comments(&self) -> bool {
        self.declarations.iter().any(Declaration::is_comment)
    }
}

fn sorted_signatures(declarations: &[Declaration]) -> Vec<String> {
    let mut signatures: Vec<String> = declarations
        .iter()
        .filter_map(Declaration::as_property)
        .map(crate::declaration::Property::signature)
        .collect();
    signatures.sort();
    signatures
}

/// Hash a declaration set independently of declaration order.
#[must_use]
pub fn declaration_hash(declarations: &[Declaration]) -> String {
    let joined = sorted_signatures(declarations).join(";");
    blake3::hash(joined.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hash_ignores_declaration_order() {
        let a = vec![
            Declaration::property("padding", "10px 20px"),
            Declaration::property("border", "none"),
        ];
        let b = vec![
            Declaration::property("border", "none"),
            Declaration::property("padding", "10px 20px"),
        ];
        assert_eq!(declaration_hash(&a), declaration_hash(&b));
    }

    #[test]
    fn hash_respects_important_flag() {
        let plain = vec![Declaration::property("color", "red")];
        let important = vec![Declaration::important("color", "red")];
        assert_ne!(declaration_hash(&plain), declaration_hash(&important));
    }

    #[test]
    fn refresh_hash_tracks_rewrites() {
        let mut rule = ParsedRule::style(
            ".a",
            vec![Declaration::property("color", "#007bff")],
            Specificity::new(0, 1, 0),
            None,
        );
        let before = rule.hash.clone();
        if let Some(prop) = rule.declarations[0].as_property_mut() {
            prop.value = "$primary-blue".to_string();
        }
        rule.refresh_hash();
        assert_ne!(before, rule.hash);
    }

    #[test]
    fn comment_rule_uses_placeholder_selector() {
        let rule = ParsedRule::comment("Header", None);
        assert_eq!(rule.selector, COMMENT_SELECTOR);
        assert_eq!(rule.kind, RuleKind::Comment);
        assert!(rule.has_comments());
    }

    #[test]
    fn specificity_orders_ids_first() {
        assert!(Specificity::new(1, 0, 0) > Specificity::new(0, 5, 5));
        assert_eq!(Specificity::new(0, 2, 1).to_string(), "(0,2,1)");
    }
}

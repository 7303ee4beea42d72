//! Block-Element-Modifier classification of a selector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which BEM parts a selector carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BemKind {
    Block,
    Element,
    Modifier,
    ElementModifier,
}

impl BemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Element => "element",
            Self::Modifier => "modifier",
            Self::ElementModifier => "element_modifier",
        }
    }
}

impl fmt::Display for BemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BEM identity of a single-class selector.
///
/// `.card__header__title--active:hover` yields block `card`, elements
/// `["header", "title"]`, modifier `active` and suffix `:hover`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BemInfo {
    pub block: String,
    pub elements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    pub kind: BemKind,
    /// `elements.len()`, plus one when a modifier is present.
    pub level: usize,
    /// Pseudo-class, pseudo-element or attribute tail stripped before matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl BemInfo {
    /// Assemble the info, deriving `kind` and `level` from the parts.
    #[must_use]
    pub fn new(
        block: impl Into<String>,
        elements: Vec<String>,
        modifier: Option<String>,
        suffix: Option<String>,
    ) -> Self {
        let kind = match (elements.is_empty(), modifier.is_some()) {
            (true, false) => BemKind::Block,
            (false, false) => BemKind::Element,
            (true, true) => BemKind::Modifier,
            (false, true) => BemKind::ElementModifier,
        };
        let level = elements.len() + usize::from(modifier.is_some());
        Self {
            block: block.into(),
            elements,
            modifier,
            kind,
            level,
            suffix,
        }
    }

    /// The `.block` selector this info hangs under.
    #[must_use]
    pub fn block_selector(&self) -> String {
        format!(".{}", self.block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_level_follow_parts() {
        let block = BemInfo::new("card", vec![], None, None);
        assert_eq!(block.kind, BemKind::Block);
        assert_eq!(block.level, 0);

        let element = BemInfo::new("card", vec!["header".into(), "title".into()], None, None);
        assert_eq!(element.kind, BemKind::Element);
        assert_eq!(element.level, 2);

        let modifier = BemInfo::new("card", vec![], Some("dark".into()), None);
        assert_eq!(modifier.kind, BemKind::Modifier);
        assert_eq!(modifier.level, 1);

        let both = BemInfo::new("card", vec!["header".into()], Some("active".into()), None);
        assert_eq!(both.kind, BemKind::ElementModifier);
        assert_eq!(both.level, 2);
    }

    #[test]
    fn block_selector_prefixes_dot() {
        let info = BemInfo::new("nav", vec![], None, Some(":hover".into()));
        assert_eq!(info.block_selector(), ".nav");
    }
}

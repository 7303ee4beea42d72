//! Nesting strategy configuration.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

const fn default_max_nesting_depth() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NestingConfig {
    /// Nest `.block__element--modifier` selectors under their block.
    #[serde(default = "default_true")]
    pub enable_bem: bool,

    /// Group selectors by base pattern (pseudo-classes, compound and
    /// descendant extensions). When off, selectors split on whitespace only.
    #[serde(default = "default_true")]
    pub enable_smart_nesting: bool,

    /// Deepest nesting level below a top-level rule. Deeper paths are folded
    /// back into compound selectors.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

impl Default for NestingConfig {
    fn default() -> Self {
        Self {
            enable_bem: true,
            enable_smart_nesting: true,
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = NestingConfig::default();
        assert!(config.enable_bem);
        assert!(config.enable_smart_nesting);
        assert_eq!(config.max_nesting_depth, 5);
    }
}

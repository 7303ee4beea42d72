//! Rule-level optimization switches.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OptimizeConfig {
    /// Merge rules with identical declarations within one media scope.
    #[serde(default = "default_true")]
    pub enable_duplicate_detection: bool,

    /// Gather all rules of one media query into a single `@media` block.
    #[serde(default = "default_true")]
    pub enable_media_query_grouping: bool,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            enable_duplicate_detection: true,
            enable_media_query_grouping: true,
        }
    }
}

//! Variable extraction configuration.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

fn default_prefix() -> String {
    "$".to_string()
}

const fn default_min_occurrences() -> usize {
    2
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VariableConfig {
    /// Promote repeated values to variables.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Prefix of every generated variable name.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Occurrences a value needs before it becomes a variable.
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    #[serde(default = "default_true")]
    pub extract_colors: bool,

    #[serde(default = "default_true")]
    pub extract_sizes: bool,

    #[serde(default = "default_true")]
    pub extract_fonts: bool,

    #[serde(default = "default_true")]
    pub extract_others: bool,
}

impl Default for VariableConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: default_prefix(),
            min_occurrences: default_min_occurrences(),
            extract_colors: true,
            extract_sizes: true,
            extract_fonts: true,
            extract_others: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = VariableConfig::default();
        assert!(config.enabled);
        assert_eq!(config.prefix, "$");
        assert_eq!(config.min_occurrences, 2);
        assert!(config.extract_colors && config.extract_sizes);
        assert!(config.extract_fonts && config.extract_others);
    }
}

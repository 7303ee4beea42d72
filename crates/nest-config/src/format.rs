//! Output formatting configuration.

use serde::{Deserialize, Serialize};

/// Indentation unit used by the SCSS formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentType {
    #[default]
    Spaces,
    Tabs,
}

const fn default_indent_size() -> usize {
    2
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatConfig {
    /// Spaces per indentation level (ignored for tabs).
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    #[serde(default)]
    pub indent_type: IndentType,

    /// Keep `/* */` comments in the output.
    #[serde(default = "default_true")]
    pub preserve_comments: bool,

    /// Sort declarations by property and nested rules by selector.
    #[serde(default)]
    pub sort_properties: bool,
}

impl FormatConfig {
    /// One level of indentation.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        match self.indent_type {
            IndentType::Spaces => " ".repeat(self.indent_size),
            IndentType::Tabs => "\t".to_string(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            indent_type: IndentType::Spaces,
            preserve_comments: true,
            sort_properties: false,
        }
    }
}

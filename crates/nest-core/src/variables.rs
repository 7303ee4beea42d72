//! Variable extraction results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a declaration value falls into for variable extraction.
///
/// Declaration order is the emission order of the variables header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableCategory {
    Color,
    Size,
    Font,
    Other,
}

impl VariableCategory {
    pub const ALL: [Self; 4] = [Self::Color, Self::Size, Self::Font, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Size => "size",
            Self::Font => "font",
            Self::Other => "other",
        }
    }

    /// Sub-header label, e.g. `Color` for `// Color variables`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Size => "Size",
            Self::Font => "Font",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value promoted to a named variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedVariable {
    /// Full name including the configured prefix, e.g. `$primary-blue`.
    pub name: String,
    pub value: String,
    pub category: VariableCategory,
    /// Total occurrences across every contributing property.
    pub occurrences: usize,
    /// Contributing properties, in first-seen order.
    pub properties: Vec<String>,
    /// Selectors the value appeared under, in first-seen order.
    pub contexts: Vec<String>,
}

impl fmt::Display for ExtractedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.name, self.value)
    }
}

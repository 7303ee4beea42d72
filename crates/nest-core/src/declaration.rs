//! Declarations held by rules and tree nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub property: String,
    pub value: String,
    #[serde(default)]
    pub important: bool,
    /// Literal value replaced by a variable reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
}

impl Property {
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<String>, important: bool) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important,
            original_value: None,
        }
    }

    /// Canonical `property:value[!important]` form used for hashing and equality.
    #[must_use]
    pub fn signature(&self) -> String {
        if self.important {
            format!("{}:{}!important", self.property, self.value)
        } else {
            format!("{}:{}", self.property, self.value)
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        f.write_str(";")
    }
}

/// An entry of a declaration block: a property or a preserved comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Declaration {
    Property(Property),
    /// Comment body without the `/*` `*/` delimiters.
    Comment { text: String },
}

impl Declaration {
    #[must_use]
    pub fn property(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Property(Property::new(property, value, false))
    }

    #[must_use]
    pub fn important(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Property(Property::new(property, value, true))
    }

    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment { text: text.into() }
    }

    #[must_use]
    pub const fn as_property(&self) -> Option<&Property> {
        match self {
            Self::Property(p) => Some(p),
            Self::Comment { .. } => None,
        }
    }

    #[must_use]
    pub const fn as_property_mut(&mut self) -> Option<&mut Property> {
        match self {
            Self::Property(p) => Some(p),
            Self::Comment { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::Comment { .. })
    }

    /// Sort key used when properties are emitted in sorted order.
    #[must_use]
    pub fn sort_key(&self) -> &str {
        match self {
            Self::Property(p) => &p.property,
            Self::Comment { .. } => "",
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(p) => p.fmt(f),
            Self::Comment { text } => write!(f, "/* {text} */"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn property_display_includes_important() {
        let decl = Declaration::important("color", "red");
        assert_eq!(decl.to_string(), "color: red !important;");
    }

    #[test]
    fn comment_display_wraps_delimiters() {
        assert_eq!(Declaration::comment("note").to_string(), "/* note */");
    }

    #[test]
    fn signature_distinguishes_important() {
        let plain = Property::new("color", "red", false);
        let important = Property::new("color", "red", true);
        assert_ne!(plain.signature(), important.signature());
        assert_eq!(important.signature(), "color:red!important");
    }

    #[test]
    fn serde_tags_declarations() {
        let json = serde_json::to_value(Declaration::property("margin", "0")).unwrap();
        assert_eq!(json["type"], "property");
        assert_eq!(json["property"], "margin");
    }
}

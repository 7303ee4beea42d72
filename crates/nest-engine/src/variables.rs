//! Repeated-value detection and SCSS variable minting.
//!
//! Occurrences are counted per exact `(property, value)` pair. Pairs that
//! share a value within one category fold into a single variable whose
//! name comes from the most frequent contributing pair.

use std::collections::HashMap;
use std::sync::LazyLock;

use nest_config::VariableConfig;
use nest_core::{Diagnostic, DiagnosticSink, ExtractedVariable, ParsedRule, RuleKind, VariableCategory};
use regex::Regex;

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .expect("hex color regex is valid")
});

static COLOR_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:rgba?|hsla?)\(").expect("color function regex is valid")
});

static SIZE_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:\d+(?:\.\d+)?|\.\d+)(?:px|em|rem|%|vh|vw|vmin|vmax|pt|pc|in|cm|mm|ex|ch)$")
        .expect("size value regex is valid")
});

const COLOR_PROPERTIES: &[&str] = &[
    "color",
    "background",
    "background-color",
    "border-color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "outline-color",
    "text-decoration-color",
    "column-rule-color",
    "caret-color",
    "accent-color",
    "fill",
    "stroke",
];

const SIZE_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "min-width",
    "max-width",
    "min-height",
    "max-height",
    "font-size",
    "gap",
    "row-gap",
    "column-gap",
    "top",
    "right",
    "bottom",
    "left",
    "inset",
    "border-width",
    "outline-width",
];

const FONT_PROPERTIES: &[&str] = &[
    "font",
    "font-family",
    "font-weight",
    "font-style",
    "font-variant",
    "font-stretch",
    "font-size",
    "line-height",
];

const NAMED_COLORS: &[&str] = &[
    "black",
    "white",
    "red",
    "green",
    "blue",
    "yellow",
    "orange",
    "purple",
    "pink",
    "gray",
    "grey",
    "silver",
    "maroon",
    "navy",
    "teal",
    "olive",
    "lime",
    "aqua",
    "fuchsia",
    "transparent",
];

/// Well-known hex values with semantic names.
const SEMANTIC_COLORS: &[(&str, &str)] = &[
    ("#007bff", "primary-blue"),
    ("#6c757d", "secondary-gray"),
    ("#28a745", "success-green"),
    ("#dc3545", "danger-red"),
    ("#ffc107", "warning-yellow"),
    ("#17a2b8", "info-cyan"),
    ("#f8f9fa", "light-gray"),
    ("#343a40", "dark-gray"),
    ("#e9ecef", "light-border"),
    ("#f5f5f5", "off-white"),
    ("#ffffff", "white"),
    ("#fff", "white"),
    ("#000000", "black"),
    ("#000", "black"),
    ("#333333", "text-dark"),
    ("#333", "text-dark"),
    ("#666666", "text-muted"),
    ("#666", "text-muted"),
    ("#999999", "text-light"),
    ("#999", "text-light"),
    ("#cccccc", "border-gray"),
    ("#ccc", "border-gray"),
    ("#eeeeee", "background-gray"),
    ("#eee", "background-gray"),
];

/// Categorize one declaration. Color and size checks run before font.
#[must_use]
pub fn categorize(property: &str, value: &str) -> VariableCategory {
    let property = property.to_ascii_lowercase();
    if COLOR_PROPERTIES.contains(&property.as_str()) || is_color_value(value) {
        VariableCategory::Color
    } else if is_size_property(&property) || SIZE_VALUE_RE.is_match(value.trim()) {
        VariableCategory::Size
    } else if FONT_PROPERTIES.contains(&property.as_str()) {
        VariableCategory::Font
    } else {
        VariableCategory::Other
    }
}

fn is_color_value(value: &str) -> bool {
    let value = value.trim();
    HEX_COLOR_RE.is_match(value)
        || COLOR_FUNCTION_RE.is_match(value)
        || NAMED_COLORS.contains(&value.to_ascii_lowercase().as_str())
}

fn is_size_property(property: &str) -> bool {
    SIZE_PROPERTIES.contains(&property)
        || property.starts_with("padding")
        || property.starts_with("margin")
        || property.ends_with("radius")
}

/// Lowercase hyphenated token for a value (`'Open Sans', serif` → `open-sans-serif`).
fn sanitize(value: &str) -> String {
    let mut token = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            token.push(c.to_ascii_lowercase());
        } else if !token.is_empty() && !token.ends_with('-') {
            token.push('-');
        }
    }
    while token.ends_with('-') {
        token.pop();
    }
    token
}

/// Suggested name without prefix or collision suffix.
#[must_use]
pub fn suggest_name(property: &str, value: &str, category: VariableCategory) -> String {
    let property = property.to_ascii_lowercase();
    let token = sanitize(value);
    match category {
        VariableCategory::Color => color_name(value, token),
        VariableCategory::Size => {
            let prefix = if property == "font-size" {
                "text-"
            } else if property.starts_with("padding") {
                "p-"
            } else if property.starts_with("margin") {
                "m-"
            } else if property.ends_with("radius") {
                "rounded-"
            } else if property.ends_with("width") || property.ends_with("height") {
                "size-"
            } else {
                "spacing-"
            };
            let literal = match value.trim() {
                "inherit" => "inherit".to_string(),
                "auto" => "auto".to_string(),
                "0" => "none".to_string(),
                "100%" => "full".to_string(),
                _ => token,
            };
            format!("{prefix}{literal}")
        }
        VariableCategory::Font => {
            let is_font = matches!(
                property.as_str(),
                "font-family" | "font-weight" | "font-style" | "font-variant" | "font-stretch"
            );
            if is_font {
                format!("font-{token}")
            } else {
                format!("text-{token}")
            }
        }
        VariableCategory::Other if token.is_empty() => property,
        VariableCategory::Other => format!("{property}-{token}"),
    }
}

fn color_name(value: &str, token: String) -> String {
    let value = value.trim().to_ascii_lowercase();
    if HEX_COLOR_RE.is_match(&value) {
        return SEMANTIC_COLORS
            .iter()
            .find(|(hex, _)| *hex == value)
            .map_or_else(|| format!("color-{token}"), |(_, name)| (*name).to_string());
    }
    if token.is_empty() || token.starts_with(|c: char| c.is_ascii_digit()) {
        format!("color-{token}")
    } else {
        token
    }
}

/// One `(property, value)` pair and where it was seen.
#[derive(Debug)]
struct PairStats {
    property: String,
    value: String,
    category: VariableCategory,
    count: usize,
    contexts: Vec<String>,
}

/// Pairs sharing one `(category, value)`, in first-appearance order.
#[derive(Debug)]
struct ValueGroup {
    category: VariableCategory,
    value: String,
    pairs: Vec<usize>,
}

/// Per-conversion variable extractor. Holds no state between calls.
#[derive(Debug)]
pub struct VariableExtractor<'a> {
    config: &'a VariableConfig,
}

impl<'a> VariableExtractor<'a> {
    #[must_use]
    pub const fn new(config: &'a VariableConfig) -> Self {
        Self { config }
    }

    const fn category_enabled(&self, category: VariableCategory) -> bool {
        match category {
            VariableCategory::Color => self.config.extract_colors,
            VariableCategory::Size => self.config.extract_sizes,
            VariableCategory::Font => self.config.extract_fonts,
            VariableCategory::Other => self.config.extract_others,
        }
    }

    /// Mint variables for repeated values and rewrite declarations in place.
    ///
    /// Returns the variables in first-appearance order.
    pub fn extract(
        &self,
        rules: &mut [ParsedRule],
        sink: &dyn DiagnosticSink,
    ) -> Vec<ExtractedVariable> {
        if !self.config.enabled {
            return Vec::new();
        }

        let pairs = self.count_pairs(rules);
        let groups = group_pairs(&pairs);

        let mut used_names: Vec<String> = Vec::new();
        let mut rewrites: HashMap<(&str, &str), String> = HashMap::new();
        let mut variables = Vec::new();

        for group in &groups {
            let occurrences: usize = group.pairs.iter().map(|&i| pairs[i].count).sum();
            if occurrences < self.config.min_occurrences {
                continue;
            }

            let mut best = &pairs[group.pairs[0]];
            for &i in &group.pairs[1..] {
                if pairs[i].count > best.count {
                    best = &pairs[i];
                }
            }
            let base = format!(
                "{}{}",
                self.config.prefix,
                suggest_name(&best.property, &best.value, group.category)
            );
            let name = unique_name(&base, &used_names);
            used_names.push(name.clone());

            let mut properties: Vec<String> = Vec::new();
            let mut contexts: Vec<String> = Vec::new();
            for &i in &group.pairs {
                let pair = &pairs[i];
                if !properties.contains(&pair.property) {
                    properties.push(pair.property.clone());
                }
                for context in &pair.contexts {
                    if !contexts.contains(context) {
                        contexts.push(context.clone());
                    }
                }
                rewrites.insert((pair.property.as_str(), pair.value.as_str()), name.clone());
            }

            sink.emit(Diagnostic::VariableExtracted {
                name: name.clone(),
                value: group.value.clone(),
                category: group.category,
                occurrences,
            });
            variables.push(ExtractedVariable {
                name,
                value: group.value.clone(),
                category: group.category,
                occurrences,
                properties,
                contexts,
            });
        }

        if !rewrites.is_empty() {
            apply_rewrites(rules, &rewrites);
        }
        tracing::debug!(variables = variables.len(), "variable extraction finished");
        variables
    }

    fn count_pairs(&self, rules: &[ParsedRule]) -> Vec<PairStats> {
        let mut pairs: Vec<PairStats> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for rule in rules.iter().filter(|r| r.kind == RuleKind::Style) {
            for prop in rule.declarations.iter().filter_map(|d| d.as_property()) {
                if !is_candidate(&prop.property, &prop.value) {
                    continue;
                }
                let category = categorize(&prop.property, &prop.value);
                if !self.category_enabled(category) {
                    continue;
                }
                let key = (prop.property.clone(), prop.value.clone());
                let slot = *index.entry(key).or_insert_with(|| {
                    pairs.push(PairStats {
                        property: prop.property.clone(),
                        value: prop.value.clone(),
                        category,
                        count: 0,
                        contexts: Vec::new(),
                    });
                    pairs.len() - 1
                });
                pairs[slot].count += 1;
                pairs[slot].contexts.push(rule.selector.clone());
            }
        }
        pairs
    }
}

fn is_candidate(property: &str, value: &str) -> bool {
    !property.starts_with("--") && !value.is_empty() && !value.contains('$') && !value.contains("var(")
}

fn group_pairs(pairs: &[PairStats]) -> Vec<ValueGroup> {
    let mut groups: Vec<ValueGroup> = Vec::new();
    for (i, pair) in pairs.iter().enumerate() {
        match groups
            .iter_mut()
            .find(|g| g.category == pair.category && g.value == pair.value)
        {
            Some(group) => group.pairs.push(i),
            None => groups.push(ValueGroup {
                category: pair.category,
                value: pair.value.clone(),
                pairs: vec![i],
            }),
        }
    }
    groups
}

fn unique_name(base: &str, used: &[String]) -> String {
    if !used.iter().any(|n| n == base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn apply_rewrites(rules: &mut [ParsedRule], rewrites: &HashMap<(&str, &str), String>) {
    for rule in rules.iter_mut().filter(|r| r.kind == RuleKind::Style) {
        let mut changed = false;
        for prop in rule.declarations.iter_mut().filter_map(|d| d.as_property_mut()) {
            let name = rewrites
                .get(&(prop.property.as_str(), prop.value.as_str()))
                .cloned();
            if let Some(name) = name {
                prop.original_value = Some(std::mem::replace(&mut prop.value, name));
                changed = true;
            }
        }
        if changed {
            rule.refresh_hash();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nest_core::{CollectingSink, Declaration, NoopSink, Specificity};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rule(selector: &str, decls: &[(&str, &str)]) -> ParsedRule {
        ParsedRule::style(
            selector,
            decls
                .iter()
                .map(|(p, v)| Declaration::property(*p, *v))
                .collect(),
            Specificity::default(),
            None,
        )
    }

    fn value_of(rule: &ParsedRule, property: &str) -> String {
        rule.declarations
            .iter()
            .filter_map(Declaration::as_property)
            .find(|p| p.property == property)
            .map(|p| p.value.clone())
            .unwrap()
    }

    #[rstest]
    #[case("color", "inherit", VariableCategory::Color)]
    #[case("border", "#333", VariableCategory::Color)]
    #[case("box-shadow", "rgba(0, 0, 0, 0.1)", VariableCategory::Color)]
    #[case("padding-top", "auto", VariableCategory::Size)]
    #[case("transform", "10px", VariableCategory::Size)]
    #[case("font-size", "1.2rem", VariableCategory::Size)]
    #[case("line-height", "24px", VariableCategory::Size)]
    #[case("line-height", "1.5", VariableCategory::Font)]
    #[case("font-family", "Arial, sans-serif", VariableCategory::Font)]
    #[case("cursor", "pointer", VariableCategory::Other)]
    fn categorization(
        #[case] property: &str,
        #[case] value: &str,
        #[case] expected: VariableCategory,
    ) {
        assert_eq!(categorize(property, value), expected);
    }

    #[rstest]
    #[case("background-color", "#007bff", VariableCategory::Color, "primary-blue")]
    #[case("color", "#FFF", VariableCategory::Color, "white")]
    #[case("color", "#abcdef", VariableCategory::Color, "color-abcdef")]
    #[case("color", "rgb(0, 0, 0)", VariableCategory::Color, "rgb-0-0-0")]
    #[case("padding", "10px 20px", VariableCategory::Size, "p-10px-20px")]
    #[case("margin-top", "0", VariableCategory::Size, "m-none")]
    #[case("width", "100%", VariableCategory::Size, "size-full")]
    #[case("border-radius", "4px", VariableCategory::Size, "rounded-4px")]
    #[case("font-size", "16px", VariableCategory::Size, "text-16px")]
    #[case("top", "auto", VariableCategory::Size, "spacing-auto")]
    #[case("font-family", "'Open Sans', sans-serif", VariableCategory::Font, "font-open-sans-sans-serif")]
    #[case("line-height", "1.5", VariableCategory::Font, "text-1-5")]
    #[case("cursor", "pointer", VariableCategory::Other, "cursor-pointer")]
    fn naming(
        #[case] property: &str,
        #[case] value: &str,
        #[case] category: VariableCategory,
        #[case] expected: &str,
    ) {
        assert_eq!(suggest_name(property, value, category), expected);
    }

    #[test]
    fn repeated_color_becomes_variable() {
        let mut rules = vec![
            rule(".header", &[("background-color", "#007bff")]),
            rule(".nav", &[("background-color", "#007bff")]),
            rule(".button", &[("background-color", "#007bff")]),
        ];
        let config = VariableConfig::default();
        let sink = CollectingSink::new();
        let vars = VariableExtractor::new(&config).extract(&mut rules, &sink);

        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "$primary-blue");
        assert_eq!(vars[0].occurrences, 3);
        assert_eq!(vars[0].contexts, vec![".header", ".nav", ".button"]);
        for r in &rules {
            assert_eq!(value_of(r, "background-color"), "$primary-blue");
            let prop = r.declarations[0].as_property().unwrap();
            assert_eq!(prop.original_value.as_deref(), Some("#007bff"));
        }
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn threshold_keeps_literals() {
        let mut rules = vec![
            rule(".header", &[("background-color", "#007bff")]),
            rule(".nav", &[("background-color", "#007bff")]),
            rule(".button", &[("background-color", "#007bff")]),
        ];
        let config = VariableConfig {
            min_occurrences: 4,
            ..VariableConfig::default()
        };
        let vars = VariableExtractor::new(&config).extract(&mut rules, &NoopSink);
        assert!(vars.is_empty());
        assert_eq!(value_of(&rules[2], "background-color"), "#007bff");
    }

    #[test]
    fn shared_value_folds_into_one_variable() {
        let mut rules = vec![
            rule(".a", &[("color", "#abcdef")]),
            rule(".b", &[("border-color", "#abcdef")]),
            rule(".c", &[("border-color", "#abcdef")]),
        ];
        let config = VariableConfig::default();
        let vars = VariableExtractor::new(&config).extract(&mut rules, &NoopSink);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].occurrences, 3);
        assert_eq!(vars[0].properties, vec!["color", "border-color"]);
        assert_eq!(value_of(&rules[0], "color"), "$color-abcdef");
    }

    #[test]
    fn sum_across_properties_reaches_threshold() {
        let mut rules = vec![
            rule(".a", &[("color", "#123456")]),
            rule(".b", &[("background-color", "#123456")]),
        ];
        let config = VariableConfig::default();
        let vars = VariableExtractor::new(&config).extract(&mut rules, &NoopSink);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "$color-123456");
    }

    #[test]
    fn name_collisions_get_numeric_suffix() {
        let mut rules = vec![
            rule(".a", &[("color", "#fff"), ("background", "#ffffff")]),
            rule(".b", &[("color", "#fff"), ("background", "#ffffff")]),
        ];
        let config = VariableConfig::default();
        let vars = VariableExtractor::new(&config).extract(&mut rules, &NoopSink);
        let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["$white", "$white-1"]);
    }

    #[test]
    fn disabled_category_keeps_literals() {
        let mut rules = vec![
            rule(".a", &[("color", "#333"), ("cursor", "pointer")]),
            rule(".b", &[("color", "#333"), ("cursor", "pointer")]),
        ];
        let config = VariableConfig {
            extract_colors: false,
            ..VariableConfig::default()
        };
        let vars = VariableExtractor::new(&config).extract(&mut rules, &NoopSink);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].category, VariableCategory::Other);
        assert_eq!(value_of(&rules[0], "color"), "#333");
        assert_eq!(value_of(&rules[0], "cursor"), "$cursor-pointer");
    }

    #[test]
    fn custom_properties_and_references_are_skipped() {
        let mut rules = vec![
            rule(".a", &[("--brand", "#333"), ("color", "var(--brand)")]),
            rule(".b", &[("--brand", "#333"), ("color", "var(--brand)")]),
        ];
        let config = VariableConfig::default();
        let vars = VariableExtractor::new(&config).extract(&mut rules, &NoopSink);
        assert!(vars.is_empty());
    }

    #[test]
    fn disabled_extraction_is_a_no_op() {
        let mut rules = vec![rule(".a", &[("color", "red")]), rule(".b", &[("color", "red")])];
        let config = VariableConfig {
            enabled: false,
            ..VariableConfig::default()
        };
        assert!(VariableExtractor::new(&config).extract(&mut rules, &NoopSink).is_empty());
        assert_eq!(value_of(&rules[1], "color"), "red");
    }

    #[test]
    fn custom_prefix_is_applied() {
        let mut rules = vec![rule(".a", &[("cursor", "pointer")]), rule(".b", &[("cursor", "pointer")])];
        let config = VariableConfig {
            prefix: "$ui-".to_string(),
            ..VariableConfig::default()
        };
        let vars = VariableExtractor::new(&config).extract(&mut rules, &NoopSink);
        assert_eq!(vars[0].name, "$ui-cursor-pointer");
    }
}

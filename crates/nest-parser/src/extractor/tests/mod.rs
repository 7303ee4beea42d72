use super::*;
use nest_core::{Declaration, RuleKind};
use pretty_assertions::assert_eq;

mod at_rules;

const SAMPLE: &str = include_str!("../../../tests/fixtures/sample.css");

fn extract(source: &str) -> Vec<ParsedRule> {
    extract_rules(source, &ExtractOptions::default()).expect("extraction should succeed")
}

fn find_rule<'a>(rules: &'a [ParsedRule], selector: &str) -> &'a ParsedRule {
    rules
        .iter()
        .find(|r| r.selector == selector)
        .unwrap_or_else(|| {
            let selectors: Vec<_> = rules.iter().map(|r| &r.selector).collect();
            panic!("should find rule '{selector}', available: {selectors:?}")
        })
}

fn property_pairs(rule: &ParsedRule) -> Vec<(String, String)> {
    rule.declarations
        .iter()
        .filter_map(Declaration::as_property)
        .map(|p| (p.property.clone(), p.value.clone()))
        .collect()
}

#[test]
fn sample_extracts_in_document_order() {
    let rules = extract(SAMPLE);
    let kinds: Vec<_> = rules.iter().map(|r| r.kind).collect();
    assert_eq!(kinds.first(), Some(&RuleKind::Statement));
    assert_eq!(kinds.last(), Some(&RuleKind::AtRule));
    let style: Vec<_> = rules
        .iter()
        .filter(|r| r.kind == RuleKind::Style && r.media_query.is_none())
        .map(|r| r.selector.as_str())
        .collect();
    assert_eq!(
        style,
        vec![
            "body",
            ".card",
            ".card__title",
            ".card__title:hover",
            ".btn--primary",
            "#main-header > .nav a",
            "h1",
            "h2",
            ".heading",
        ]
    );
}

#[test]
fn empty_source_yields_no_rules() {
    assert!(extract("").is_empty());
    assert!(extract("   \n\t").is_empty());
}

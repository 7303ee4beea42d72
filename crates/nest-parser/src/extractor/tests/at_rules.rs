use super::*;
use nest_core::rule::{AT_RULE_BLOCK_KEY, KEYFRAMES_BLOCK_KEY};
use pretty_assertions::assert_eq;

#[test]
fn media_rules_carry_query() {
    let rules = extract(SAMPLE);
    let mobile = rules
        .iter()
        .find(|r| r.selector == ".card" && r.media_query.is_some())
        .expect("media .card");
    assert_eq!(mobile.media_query.as_deref(), Some("@media (max-width: 768px)"));
    assert_eq!(
        property_pairs(mobile),
        vec![("padding".to_string(), "8px".to_string())]
    );
}

#[test]
fn media_query_whitespace_is_collapsed() {
    let rules = extract("@media screen   and\n (min-width: 100px) { a { color: red; } }");
    assert_eq!(
        rules[0].media_query.as_deref(),
        Some("@media screen and (min-width: 100px)")
    );
}

#[test]
fn keyframes_are_one_opaque_rule() {
    let rules = extract(SAMPLE);
    let fade = find_rule(&rules, "@keyframes fade");
    assert_eq!(fade.kind, RuleKind::Keyframes);
    let body = fade.declarations[0].as_property().unwrap();
    assert_eq!(body.property, KEYFRAMES_BLOCK_KEY);
    assert!(body.value.contains("from"));
    assert!(body.value.contains("opacity: 1"));
    assert!(!rules.iter().any(|r| r.selector == "from" || r.selector == "to"));
}

#[test]
fn font_face_keeps_declarations() {
    let rules = extract(SAMPLE);
    let font = find_rule(&rules, "@font-face");
    assert_eq!(font.kind, RuleKind::AtRule);
    assert_eq!(
        property_pairs(font),
        vec![
            ("font-family".to_string(), "\"Brand\"".to_string()),
            (
                "src".to_string(),
                "url(\"brand.woff2\") format(\"woff2\")".to_string()
            ),
        ]
    );
}

#[test]
fn supports_keeps_raw_block() {
    let rules = extract(SAMPLE);
    let supports = find_rule(&rules, "@supports (display: grid)");
    assert_eq!(supports.kind, RuleKind::AtRule);
    let body = supports.declarations[0].as_property().unwrap();
    assert_eq!(body.property, AT_RULE_BLOCK_KEY);
    assert!(body.value.contains(".grid"));
    assert!(!rules.iter().any(|r| r.selector == ".grid"));
}

#[test]
fn statements_keep_their_text() {
    let rules = extract(SAMPLE);
    assert_eq!(rules[0].selector, "@charset \"UTF-8\"");
    assert_eq!(rules[0].kind, RuleKind::Statement);
    assert_eq!(rules[1].selector, "@import url(\"reset.css\")");
}

#[test]
fn orphan_percentage_steps_are_dropped() {
    let rules = extract("0% { color: red; }\n.a { color: red; }\n50%, 100% { color: blue; }");
    let selectors: Vec<_> = rules.iter().map(|r| r.selector.as_str()).collect();
    assert_eq!(selectors, vec![".a"]);
}

#[test]
fn orphan_steps_keep_line_numbers_for_errors() {
    let err = extract_rules("0% {\n  color: red;\n}\n.a { color: red;", &ExtractOptions::default())
        .unwrap_err();
    assert!(matches!(err, ParserError::Syntax { line: 4, .. }), "{err}");
}

#[test]
fn media_nested_in_rule_applies_to_parent() {
    let rules = extract(".a, .b { color: red; @media print { color: black; .c { margin: 0; } } }");
    let flat: Vec<_> = rules
        .iter()
        .map(|r| (r.selector.as_str(), r.media_query.as_deref(), property_pairs(r)))
        .collect();
    assert_eq!(
        flat,
        vec![
            (".a", None, vec![("color".to_string(), "red".to_string())]),
            (".b", None, vec![("color".to_string(), "red".to_string())]),
            (
                ".a",
                Some("@media print"),
                vec![("color".to_string(), "black".to_string())]
            ),
            (
                ".b",
                Some("@media print"),
                vec![("color".to_string(), "black".to_string())]
            ),
            (
                ".a .c",
                Some("@media print"),
                vec![("margin".to_string(), "0".to_string())]
            ),
            (
                ".b .c",
                Some("@media print"),
                vec![("margin".to_string(), "0".to_string())]
            ),
        ]
    );
}

#[test]
fn other_at_rules_nested_in_rule_are_rejected() {
    let err = extract_rules(
        ".a { color: red; @supports (display: grid) { display: grid; } }",
        &ExtractOptions::default(),
    )
    .unwrap_err();
    assert!(
        matches!(&err, ParserError::UnsupportedNesting { line: 1, at_rule } if at_rule.starts_with("@supports")),
        "{err}"
    );
}

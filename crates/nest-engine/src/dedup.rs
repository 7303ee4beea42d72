//! Exact duplicate-rule merging within one media scope.

use std::collections::HashMap;

use nest_core::{Diagnostic, DiagnosticSink, ParsedRule, RuleKind};

/// Merge rules whose declaration sets are identical into one rule with a
/// comma-joined selector.
///
/// The merged rule takes the position of its first member. Rules in
/// different media scopes never merge. Comment, at-rule, keyframes and
/// statement rules pass through untouched, as do rules holding comments
/// and empty rules.
pub fn merge_duplicates(rules: Vec<ParsedRule>, sink: &dyn DiagnosticSink) -> Vec<ParsedRule> {
    let mut merged: Vec<ParsedRule> = Vec::with_capacity(rules.len());
    let mut buckets: HashMap<(Option<String>, String), Vec<usize>> = HashMap::new();
    let mut absorbed = 0usize;

    for mut rule in rules {
        if !is_mergeable(&rule) {
            merged.push(rule);
            continue;
        }
        rule.refresh_hash();
        let key = (rule.media_query.clone(), rule.hash.clone());
        let candidates = buckets.entry(key).or_default();
        let signatures = rule.declaration_signatures();

        let target = candidates
            .iter()
            .copied()
            .find(|&i| merged[i].declaration_signatures() == signatures);

        match target {
            Some(i) => {
                let existing = &mut merged[i];
                if !selector_members(&existing.selector).any(|s| s == rule.selector) {
                    existing.selector = format!("{}, {}", existing.selector, rule.selector);
                }
                existing.bem = None;
                existing.specificity = existing.specificity.max(rule.specificity);
                sink.emit(Diagnostic::DuplicatesMerged {
                    selector: existing.selector.clone(),
                    absorbed: rule.selector,
                    media_query: rule.media_query,
                });
                absorbed += 1;
            }
            None => {
                candidates.push(merged.len());
                merged.push(rule);
            }
        }
    }

    if absorbed > 0 {
        tracing::debug!(absorbed, remaining = merged.len(), "merged duplicate rules");
    }
    merged
}

fn is_mergeable(rule: &ParsedRule) -> bool {
    rule.kind == RuleKind::Style && !rule.declarations.is_empty() && !rule.has_comments()
}

fn selector_members(selector: &str) -> impl Iterator<Item = &str> {
    selector.split(", ")
}

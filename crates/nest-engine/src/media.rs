//! Media-scope bucketing.

use nest_core::ParsedRule;

/// Rules that share one media context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBucket {
    /// `None` for the top-level scope, otherwise the full prelude
    /// (`@media (max-width: 768px)`).
    pub query: Option<String>,
    pub rules: Vec<ParsedRule>,
}

/// Split rules into media buckets.
///
/// With `grouping` on, the top-level bucket comes first followed by one
/// bucket per distinct query in first-appearance order. With it off, every
/// run of consecutive rules with the same context forms its own bucket so
/// source order is kept.
#[must_use]
pub fn group_by_media(rules: Vec<ParsedRule>, grouping: bool) -> Vec<MediaBucket> {
    let mut buckets: Vec<MediaBucket> = Vec::new();

    if grouping {
        buckets.push(MediaBucket {
            query: None,
            rules: Vec::new(),
        });
        for rule in rules {
            match buckets.iter_mut().find(|b| b.query == rule.media_query) {
                Some(bucket) => bucket.rules.push(rule),
                None => buckets.push(MediaBucket {
                    query: rule.media_query.clone(),
                    rules: vec![rule],
                }),
            }
        }
        buckets.retain(|b| !b.rules.is_empty());
    } else {
        for rule in rules {
            match buckets.last_mut() {
                Some(bucket) if bucket.query == rule.media_query => bucket.rules.push(rule),
                _ => buckets.push(MediaBucket {
                    query: rule.media_query.clone(),
                    rules: vec![rule],
                }),
            }
        }
    }

    tracing::trace!(buckets = buckets.len(), grouping, "grouped rules by media");
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use nest_core::{Declaration, Specificity};
    use pretty_assertions::assert_eq;

    const MOBILE: &str = "@media (max-width: 768px)";
    const PRINT: &str = "@media print";

    fn rule(selector: &str, media: Option<&str>) -> ParsedRule {
        ParsedRule::style(
            selector,
            vec![Declaration::property("color", "red")],
            Specificity::default(),
            media.map(str::to_string),
        )
    }

    fn shape(buckets: &[MediaBucket]) -> Vec<(Option<&str>, Vec<&str>)> {
        buckets
            .iter()
            .map(|b| {
                (
                    b.query.as_deref(),
                    b.rules.iter().map(|r| r.selector.as_str()).collect(),
                )
            })
            .collect()
    }

    fn sample() -> Vec<ParsedRule> {
        vec![
            rule(".a", Some(MOBILE)),
            rule(".b", None),
            rule(".c", Some(PRINT)),
            rule(".d", Some(MOBILE)),
            rule(".e", None),
        ]
    }

    #[test]
    fn grouping_puts_top_level_first() {
        let buckets = group_by_media(sample(), true);
        assert_eq!(
            shape(&buckets),
            vec![
                (None, vec![".b", ".e"]),
                (Some(MOBILE), vec![".a", ".d"]),
                (Some(PRINT), vec![".c"]),
            ]
        );
    }

    #[test]
    fn without_grouping_runs_keep_source_order() {
        let buckets = group_by_media(sample(), false);
        assert_eq!(
            shape(&buckets),
            vec![
                (Some(MOBILE), vec![".a"]),
                (None, vec![".b"]),
                (Some(PRINT), vec![".c"]),
                (Some(MOBILE), vec![".d"]),
                (None, vec![".e"]),
            ]
        );
    }

    #[test]
    fn empty_input_has_no_buckets() {
        assert!(group_by_media(Vec::new(), true).is_empty());
        assert!(group_by_media(Vec::new(), false).is_empty());
    }
}

//! The conversion pipeline.
//!
//! extract → BEM annotate → variables → dedup → media buckets → trees → text.
//! All state lives inside one [`Converter::convert`] call.

use nest_config::NestConfig;
use nest_core::{DiagnosticSink, TracingSink};
use nest_parser::{ExtractOptions, extract_rules};
use serde::Serialize;

use crate::bem::classify;
use crate::dedup::merge_duplicates;
use crate::error::ConvertError;
use crate::format::{RenderedBucket, ScssFormatter};
use crate::media::group_by_media;
use crate::tree::TreeBuilder;
use crate::variables::VariableExtractor;

/// Counters describing one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Rules produced by extraction, before merging.
    pub rules: usize,
    /// Rules absorbed into an earlier identical rule.
    pub merged: usize,
    pub variables: usize,
    pub media_buckets: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: String,
    pub stats: ConversionStats,
}

/// Configured CSS → SCSS converter.
pub struct Converter<'a> {
    config: &'a NestConfig,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> Converter<'a> {
    #[must_use]
    pub fn new(config: &'a NestConfig) -> Self {
        Self {
            config,
            sink: &TracingSink,
        }
    }

    /// Route merge, variable and folding events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Convert one stylesheet.
    ///
    /// # Errors
    /// Returns `ConvertError::Parse` when the input is not valid CSS. No
    /// partial output is produced.
    pub fn convert(&self, source: &str) -> Result<Conversion, ConvertError> {
        let options = ExtractOptions {
            preserve_comments: self.config.format.preserve_comments,
        };
        let mut rules = extract_rules(source, &options)?;
        let mut stats = ConversionStats {
            rules: rules.len(),
            ..ConversionStats::default()
        };

        if self.config.nesting.enable_bem {
            for rule in rules.iter_mut().filter(|r| !r.kind.is_passthrough()) {
                rule.bem = classify(&rule.selector);
            }
        }

        let variables = VariableExtractor::new(&self.config.variables).extract(&mut rules, self.sink);
        stats.variables = variables.len();

        if self.config.optimize.enable_duplicate_detection {
            let before = rules.len();
            rules = merge_duplicates(rules, self.sink);
            stats.merged = before - rules.len();
        }

        let builder = TreeBuilder::new(&self.config.nesting).with_sink(self.sink);
        let buckets: Vec<RenderedBucket> =
            group_by_media(rules, self.config.optimize.enable_media_query_grouping)
                .into_iter()
                .map(|bucket| RenderedBucket {
                    tree: builder.build(&bucket.rules),
                    query: bucket.query,
                })
                .collect();
        stats.media_buckets = buckets.iter().filter(|b| b.query.is_some()).count();

        let output = ScssFormatter::new(&self.config.format).render(&buckets, &variables);
        tracing::debug!(
            rules = stats.rules,
            merged = stats.merged,
            variables = stats.variables,
            media_buckets = stats.media_buckets,
            "converted stylesheet"
        );
        Ok(Conversion { output, stats })
    }
}

/// Convert with diagnostics forwarded to `tracing`.
///
/// # Errors
/// Returns `ConvertError::Parse` when the input is not valid CSS.
pub fn convert(source: &str, config: &NestConfig) -> Result<String, ConvertError> {
    Converter::new(config).convert(source).map(|c| c.output)
}

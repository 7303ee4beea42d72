//! # nest-engine
//!
//! Turns flat CSS rules into nested SCSS.
//!
//! The pipeline runs once per [`Converter::convert`] call:
//! 1. [`nest_parser::extract_rules`] flattens the stylesheet
//! 2. [`bem::classify`] annotates Block-Element-Modifier selectors
//! 3. [`variables::VariableExtractor`] mints variables for repeated values
//! 4. [`dedup::merge_duplicates`] folds identical rules per media scope
//! 5. [`media::group_by_media`] splits rules into media buckets
//! 6. [`tree::TreeBuilder`] nests each bucket
//! 7. [`format::ScssFormatter`] writes the text
//!
//! Merge, extraction and depth-folding events go to an injected
//! [`DiagnosticSink`](nest_core::DiagnosticSink).

pub mod bem;
pub mod convert;
pub mod dedup;
pub mod error;
pub mod format;
pub mod media;
pub mod tree;
pub mod variables;

pub use convert::{Conversion, ConversionStats, Converter, convert};
pub use error::ConvertError;
pub use format::{RenderedBucket, ScssFormatter};
pub use media::{MediaBucket, group_by_media};
pub use tree::{NestedRule, NodeKind, TreeBuilder};
pub use variables::VariableExtractor;

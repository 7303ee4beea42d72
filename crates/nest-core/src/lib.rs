//! # nest-core
//!
//! Core data model and diagnostics for cssnest.
//!
//! This crate provides the foundational types shared across all cssnest crates:
//! - `Declaration` and `ParsedRule`, the flat rule records produced by extraction
//! - `BemInfo` / `BemKind`, the Block-Element-Modifier classification of a selector
//! - `VariableCategory` / `ExtractedVariable`, the variable extraction results
//! - The `DiagnosticSink` seam used by the engine to report merge/extract events

pub mod bem;
pub mod declaration;
pub mod diagnostics;
pub mod rule;
pub mod variables;

pub use bem::{BemInfo, BemKind};
pub use declaration::{Declaration, Property};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NoopSink, TracingSink};
pub use rule::{ParsedRule, RuleKind, Specificity};
pub use variables::{ExtractedVariable, VariableCategory};

//! Diagnostic events reported while a stylesheet is converted.
//!
//! The engine never prints. It hands events to a caller-supplied
//! [`DiagnosticSink`]; [`TracingSink`] forwards them to `tracing`.

use std::sync::Mutex;

use serde::Serialize;

use crate::variables::VariableCategory;

/// Something noteworthy that happened during one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum Diagnostic {
    /// A rule was folded into an earlier rule with identical declarations.
    DuplicatesMerged {
        selector: String,
        absorbed: String,
        media_query: Option<String>,
    },
    /// A repeated value was promoted to a variable.
    VariableExtracted {
        name: String,
        value: String,
        category: VariableCategory,
        occurrences: usize,
    },
    /// A nesting path deeper than the configured maximum was folded.
    DepthFolded { selector: String, max_depth: usize },
}

/// Receiver of [`Diagnostic`] events.
pub trait DiagnosticSink {
    fn emit(&self, event: Diagnostic);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn emit(&self, _event: Diagnostic) {}
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: Diagnostic) {
        match event {
            Diagnostic::DuplicatesMerged {
                selector,
                absorbed,
                media_query,
            } => tracing::debug!(
                %selector,
                %absorbed,
                media = media_query.as_deref().unwrap_or("-"),
                "merged duplicate rule"
            ),
            Diagnostic::VariableExtracted {
                name,
                value,
                category,
                occurrences,
            } => tracing::debug!(%name, %value, %category, occurrences, "extracted variable"),
            Diagnostic::DepthFolded {
                selector,
                max_depth,
            } => tracing::debug!(%selector, max_depth, "folded nesting beyond max depth"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, event: Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.emit(Diagnostic::DepthFolded {
            selector: ".a .b".into(),
            max_depth: 0,
        });
        sink.emit(Diagnostic::VariableExtracted {
            name: "$white".into(),
            value: "#fff".into(),
            category: VariableCategory::Color,
            occurrences: 2,
        });
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Diagnostic::DepthFolded { .. }));
    }

    #[test]
    fn noop_and_tracing_sinks_accept_events() {
        let event = Diagnostic::DuplicatesMerged {
            selector: ".a, .b".into(),
            absorbed: ".b".into(),
            media_query: None,
        };
        NoopSink.emit(event.clone());
        TracingSink.emit(event);
    }
}

//! Non-fatal problems raised while mapping and exporting records
//!
//! Every diagnostic is also emitted as a `warn!` event when it is recorded.

use serde::Serialize;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Primary conversion failed, a fallback value was used
    DegradedField,
    /// A statement was left out of the output
    SkippedStatement,
    /// A whole record was left out of a batch export
    RecordSkipped,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::DegradedField => "degraded field",
            DiagnosticKind::SkippedStatement => "skipped statement",
            DiagnosticKind::RecordSkipped => "record skipped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Field (or record) the problem is about
    pub field: String,
    /// Offending value as text
    pub value: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {} ('{}'): {}",
            self.kind, self.field, self.value, self.message
        )
    }
}

/// Ordered collector of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            field: field.into(),
            value: value.into(),
            message: message.into(),
        };
        warn!(
            kind = ?diagnostic.kind,
            field = %diagnostic.field,
            value = %diagnostic.value,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    pub fn degraded(&mut self, field: impl Into<String>, value: impl Into<String>, message: impl Into<String>) {
        self.push(DiagnosticKind::DegradedField, field, value, message);
    }

    pub fn skipped(&mut self, field: impl Into<String>, value: impl Into<String>, message: impl Into<String>) {
        self.push(DiagnosticKind::SkippedStatement, field, value, message);
    }

    /// Append already-recorded diagnostics without logging them again
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diags = Diagnostics::new();
        diags.degraded("routedVia", "bad:uri", "kept as string");
        diags.skipped("sourceEntityURI", "not a uri", "statement omitted");

        assert_eq!(diags.len(), 2);
        assert_eq!(diags.count(DiagnosticKind::SkippedStatement), 1);
        let kinds: Vec<_> = diags.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::DegradedField, DiagnosticKind::SkippedStatement]);
    }

    #[test]
    fn test_merge_and_display() {
        let mut a = Diagnostics::new();
        let mut b = Diagnostics::new();
        b.degraded("messagesRouted", "n/a", "substituted 0.0");
        a.merge(b);
        let first = a.iter().next().unwrap();
        assert_eq!(
            first.to_string(),
            "degraded field for messagesRouted ('n/a'): substituted 0.0"
        );
    }
}

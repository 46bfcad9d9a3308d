//! Validation report

use super::shapes::Severity;
use crate::rdf::{RdfObject, RdfPredicate, RdfSubject};
use std::fmt;

/// SHACL core constraint components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintComponent {
    MinCount,
    MaxCount,
    Datatype,
    NodeKind,
    Class,
    Pattern,
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,
    MinLength,
    MaxLength,
    In,
    HasValue,
}

impl ConstraintComponent {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintComponent::MinCount => "MinCountConstraintComponent",
            ConstraintComponent::MaxCount => "MaxCountConstraintComponent",
            ConstraintComponent::Datatype => "DatatypeConstraintComponent",
            ConstraintComponent::NodeKind => "NodeKindConstraintComponent",
            ConstraintComponent::Class => "ClassConstraintComponent",
            ConstraintComponent::Pattern => "PatternConstraintComponent",
            ConstraintComponent::MinInclusive => "MinInclusiveConstraintComponent",
            ConstraintComponent::MaxInclusive => "MaxInclusiveConstraintComponent",
            ConstraintComponent::MinExclusive => "MinExclusiveConstraintComponent",
            ConstraintComponent::MaxExclusive => "MaxExclusiveConstraintComponent",
            ConstraintComponent::MinLength => "MinLengthConstraintComponent",
            ConstraintComponent::MaxLength => "MaxLengthConstraintComponent",
            ConstraintComponent::In => "InConstraintComponent",
            ConstraintComponent::HasValue => "HasValueConstraintComponent",
        }
    }
}

impl fmt::Display for ConstraintComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sh:{}", self.name())
    }
}

/// One failed constraint
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationEntry {
    pub component: ConstraintComponent,
    pub severity: Severity,
    pub source_shape: RdfSubject,
    pub focus_node: RdfObject,
    /// `None` for constraints on the focus node itself
    pub path: Option<RdfPredicate>,
    pub value: Option<RdfObject>,
    pub message: String,
}

impl fmt::Display for ValidationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = match self.severity {
            Severity::Violation => "Constraint Violation",
            Severity::Warning => "Validation Warning",
            Severity::Info => "Validation Info",
        };
        writeln!(f, "{} in {}:", heading, self.component.name())?;
        writeln!(f, "\tSeverity: {}", self.severity)?;
        writeln!(f, "\tSource Shape: {}", self.source_shape)?;
        writeln!(f, "\tFocus Node: {}", self.focus_node)?;
        if let Some(value) = &self.value {
            writeln!(f, "\tValue Node: {}", value)?;
        }
        if let Some(path) = &self.path {
            writeln!(f, "\tResult Path: {}", path)?;
        }
        writeln!(f, "\tMessage: {}", self.message)
    }
}

/// Outcome of validating one data graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    /// True when there are no results at all, whatever their severity
    pub conforms: bool,
    pub results: Vec<ValidationEntry>,
}

impl ValidationReport {
    pub fn new(results: Vec<ValidationEntry>) -> Self {
        Self {
            conforms: results.is_empty(),
            results,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    pub fn by_component(&self, component: ConstraintComponent) -> impl Iterator<Item = &ValidationEntry> {
        self.results.iter().filter(move |r| r.component == component)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report")?;
        writeln!(f, "Conforms: {}", if self.conforms { "True" } else { "False" })?;
        if !self.results.is_empty() {
            writeln!(f, "Results ({}):", self.results.len())?;
            for result in &self.results {
                write!(f, "{}", result)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::NamedNode;

    #[test]
    fn test_conforming_report() {
        let report = ValidationReport::new(Vec::new());
        assert!(report.conforms);
        assert_eq!(report.to_string(), "Validation Report\nConforms: True\n");
    }

    #[test]
    fn test_report_text() {
        let node = NamedNode::new("http://x/m/1").unwrap();
        let report = ValidationReport::new(vec![ValidationEntry {
            component: ConstraintComponent::MinCount,
            severity: Severity::Violation,
            source_shape: NamedNode::new("http://example.com/corona#MetricShape").unwrap().into(),
            focus_node: node.into(),
            path: Some(NamedNode::new("http://example.com/corona#observedAt").unwrap().into()),
            value: None,
            message: "Less than 1 values".to_string(),
        }]);

        assert!(!report.conforms);
        assert_eq!(report.count(Severity::Violation), 1);
        let text = report.to_string();
        assert!(text.contains("Conforms: False\nResults (1):\n"));
        assert!(text.contains("Constraint Violation in MinCountConstraintComponent:\n"));
        assert!(text.contains("\tFocus Node: <http://x/m/1>\n"));
        assert!(text.contains("\tResult Path: <http://example.com/corona#observedAt>\n"));
        assert!(!text.contains("Value Node"));
    }
}

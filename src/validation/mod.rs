//! Shape-constraint validation of RDF documents
//!
//! The exporters never look inside a validator: they hand over a Turtle
//! document and read back a [`ValidationReport`]. [`ShapeValidator`] is that
//! seam, and [`CoreShapeValidator`] is the built-in implementation covering
//! the SHACL core constraints the metric documents use.

mod engine;
mod report;
mod shapes;

pub use engine::CoreShapeValidator;
pub use report::{ConstraintComponent, ValidationEntry, ValidationReport};
pub use shapes::{Constraint, NodeKind, NodeShape, PropertyShape, Severity, ShapesGraph, Target, SUPPORTED};

use crate::rdf::{ParseError, RdfFormat, RdfParser, ReasoningError, TripleStore};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors reading a shapes graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("Unsupported property path on shape {0}: only predicate paths are allowed")]
    UnsupportedPath(String),

    #[error("Property shape {0} has no sh:path")]
    MissingPath(String),

    #[error("Unsupported constraint sh:{constraint} on shape {shape}")]
    UnsupportedConstraint { shape: String, constraint: String },

    #[error("Invalid sh:{constraint} value {value} on shape {shape}")]
    InvalidValue {
        shape: String,
        constraint: &'static str,
        value: String,
    },

    #[error("Invalid sh:pattern \"{pattern}\" on shape {shape}: {reason}")]
    InvalidPattern {
        shape: String,
        pattern: String,
        reason: String,
    },
}

pub type ShapeResult<T> = Result<T, ShapeError>;

/// Which input document a parse failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    Data,
    Shapes,
    Ontology,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Data => f.write_str("data"),
            DocumentRole::Shapes => f.write_str("shapes"),
            DocumentRole::Ontology => f.write_str("ontology"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse {document} document: {source}")]
    Parse {
        document: DocumentRole,
        #[source]
        source: ParseError,
    },

    #[error("Shapes error: {0}")]
    Shape(#[from] ShapeError),

    #[error("Reasoning error: {0}")]
    Reasoning(#[from] ReasoningError),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Inference applied to the data graph before shapes are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inference {
    None,
    #[default]
    Rdfs,
}

/// Validates a data graph against a shapes graph
pub trait ShapeValidator {
    fn validate(
        &self,
        data: &TripleStore,
        shapes: &TripleStore,
        ontology: Option<&TripleStore>,
    ) -> ValidationResult<ValidationReport>;
}

/// Parse three Turtle documents and run `validator` over them
pub fn validate_turtle(
    data: &str,
    shapes: &str,
    ontology: Option<&str>,
    validator: &dyn ShapeValidator,
) -> ValidationResult<ValidationReport> {
    let data = parse(data, DocumentRole::Data)?;
    let shapes = parse(shapes, DocumentRole::Shapes)?;
    let ontology = ontology.map(|o| parse(o, DocumentRole::Ontology)).transpose()?;
    validator.validate(&data, &shapes, ontology.as_ref())
}

/// Read three RDF files and run `validator` over them
///
/// The syntax of each file follows its extension (`.nt` is N-Triples,
/// anything else Turtle).
pub fn validate_files(
    data: &Path,
    shapes: &Path,
    ontology: Option<&Path>,
    validator: &dyn ShapeValidator,
) -> ValidationResult<ValidationReport> {
    let data = load(data, DocumentRole::Data)?;
    let shapes = load(shapes, DocumentRole::Shapes)?;
    let ontology = ontology.map(|o| load(o, DocumentRole::Ontology)).transpose()?;
    validator.validate(&data, &shapes, ontology.as_ref())
}

fn parse(input: &str, document: DocumentRole) -> ValidationResult<TripleStore> {
    RdfParser::parse(input, RdfFormat::Turtle)
        .map(TripleStore::from_triples)
        .map_err(|source| ValidationError::Parse { document, source })
}

fn load(path: &Path, document: DocumentRole) -> ValidationResult<TripleStore> {
    RdfParser::parse_file(path, RdfFormat::from_path(path))
        .map(TripleStore::from_triples)
        .map_err(|source| ValidationError::Parse { document, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix ex: <http://example.org/> .
        ex:S sh:targetClass ex:Metric ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ] .
    "#;

    #[test]
    fn test_validate_turtle() {
        let validator = CoreShapeValidator::default();
        let ok = validate_turtle(
            r#"<http://x/m/1> a <http://example.org/Metric> ; <http://example.org/name> "a" ."#,
            SHAPES,
            None,
            &validator,
        )
        .unwrap();
        assert!(ok.conforms);

        let bad = validate_turtle(r#"<http://x/m/1> a <http://example.org/Metric> ."#, SHAPES, None, &validator).unwrap();
        assert!(!bad.conforms);
        assert_eq!(bad.results.len(), 1);
    }

    #[test]
    fn test_validate_files_picks_syntax_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.nt");
        let shapes = dir.path().join("shapes.ttl");
        std::fs::write(
            &data,
            "<http://x/m/1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Metric> .\n",
        )
        .unwrap();
        std::fs::write(&shapes, SHAPES).unwrap();

        let validator = CoreShapeValidator::new(Inference::None);
        let report = validate_files(&data, &shapes, None, &validator).unwrap();
        assert_eq!(report.results.len(), 1);

        let missing = dir.path().join("missing.ttl");
        let err = validate_files(&data, &shapes, Some(&missing), &validator).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Parse { document: DocumentRole::Ontology, source: ParseError::Io(_) }
        ));
    }

    #[test]
    fn test_parse_error_names_document() {
        let validator = CoreShapeValidator::new(Inference::None);
        let err = validate_turtle("<http://x/m/1> a .", SHAPES, None, &validator).unwrap_err();
        assert!(matches!(err, ValidationError::Parse { document: DocumentRole::Data, .. }));

        let err = validate_turtle("", SHAPES, Some("@prefix broken"), &validator).unwrap_err();
        assert!(matches!(err, ValidationError::Parse { document: DocumentRole::Ontology, .. }));
        assert!(err.to_string().starts_with("Failed to parse ontology document"));
    }
}

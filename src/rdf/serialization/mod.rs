//! RDF serialization formats
//!
//! Supports:
//! - Turtle (TTL), written with the bound prefixes and subject grouping
//! - N-Triples (NT)
//!
//! Both formats can be parsed back; parsing is delegated to `rio_turtle`.

mod ntriples;
mod turtle;

use super::namespace::NamespaceManager;
use super::Triple;
use std::path::Path;
use thiserror::Error;

pub use ntriples::{NTriplesParserWrapper, NTriplesSerializerWrapper};
pub use turtle::{TurtleParserWrapper, TurtleWriter};

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
}

impl RdfFormat {
    /// Guess the format from a file extension, defaulting to Turtle
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("nt") => RdfFormat::NTriples,
            _ => RdfFormat::Turtle,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax or term error
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<std::fmt::Error> for SerializeError {
    fn from(e: std::fmt::Error) -> Self {
        SerializeError::Serialize(e.to_string())
    }
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse RDF data from a string
    pub fn parse(input: &str, format: RdfFormat) -> ParseResult<Vec<Triple>> {
        match format {
            RdfFormat::Turtle => TurtleParserWrapper::parse(input),
            RdfFormat::NTriples => NTriplesParserWrapper::parse(input),
        }
    }

    /// Parse RDF data from a file
    pub fn parse_file(path: &Path, format: RdfFormat) -> ParseResult<Vec<Triple>> {
        let input = std::fs::read_to_string(path)?;
        Self::parse(&input, format)
    }
}

/// RDF serializer
///
/// Turtle output uses the manager's prefixes; N-Triples ignores them.
#[derive(Debug, Clone, Default)]
pub struct RdfSerializer {
    namespaces: NamespaceManager,
}

impl RdfSerializer {
    pub fn new(namespaces: NamespaceManager) -> Self {
        Self { namespaces }
    }

    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    /// Serialize triples to a string
    pub fn serialize(&self, triples: &[Triple], format: RdfFormat) -> SerializeResult<String> {
        match format {
            RdfFormat::Turtle => TurtleWriter::new(&self.namespaces).write(triples),
            RdfFormat::NTriples => NTriplesSerializerWrapper::serialize(triples),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, NamedNode};

    fn sample() -> Vec<Triple> {
        vec![Triple::new(
            NamedNode::new("http://example.org/a").unwrap(),
            NamedNode::new("http://example.org/b").unwrap(),
            Literal::new_simple_literal("c"),
        )]
    }

    #[test]
    fn test_both_formats_parse_back() {
        let serializer = RdfSerializer::default();
        for format in [RdfFormat::Turtle, RdfFormat::NTriples] {
            let text = serializer.serialize(&sample(), format).unwrap();
            assert_eq!(RdfParser::parse(&text, format).unwrap(), sample(), "{format:?}");
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(RdfFormat::from_path(Path::new("out.nt")), RdfFormat::NTriples);
        assert_eq!(RdfFormat::from_path(Path::new("shapes.ttl")), RdfFormat::Turtle);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            RdfParser::parse("<http://a> <http://b> .", RdfFormat::Turtle),
            Err(ParseError::Parse(_))
        ));
    }
}

//! Turtle format implementation

use super::{ParseError, ParseResult, SerializeResult};
use crate::rdf::namespace::NamespaceManager;
use crate::rdf::vocab::{rdf, xsd};
use crate::rdf::{BlankNode, Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple};
use indexmap::IndexMap;
use rio_api::parser::TriplesParser;
use rio_turtle::TurtleParser;
use std::fmt::Write;
use std::io::{BufReader, Cursor};

/// Turtle parser
pub struct TurtleParserWrapper;

impl TurtleParserWrapper {
    /// Parse Turtle string to Triples
    pub fn parse(input: &str) -> ParseResult<Vec<Triple>> {
        let cursor = Cursor::new(input);
        let mut reader = BufReader::new(cursor);
        let mut parser = TurtleParser::new(&mut reader, None);

        let mut triples = Vec::new();

        let res: Result<(), rio_turtle::TurtleError> = parser.parse_all(&mut |t| {
            triples.push(convert_triple(t).map_err(invalid_data)?);
            Ok(())
        });

        match res {
            Ok(_) => Ok(triples),
            Err(e) => Err(ParseError::Parse(e.to_string())),
        }
    }
}

/// Turtle writer
///
/// Emits one `@prefix` line per bound namespace, then one block per
/// subject in first-appearance order. Predicates keep their emission order;
/// repeated predicates share a line with `,`.
pub struct TurtleWriter<'a> {
    namespaces: &'a NamespaceManager,
}

impl<'a> TurtleWriter<'a> {
    pub fn new(namespaces: &'a NamespaceManager) -> Self {
        Self { namespaces }
    }

    /// Serialize Triples to Turtle string
    pub fn write(&self, triples: &[Triple]) -> SerializeResult<String> {
        let mut output = String::new();
        for ns in self.namespaces.prefixes() {
            writeln!(output, "@prefix {}: <{}> .", ns.prefix, ns.iri)?;
        }

        let mut subjects: IndexMap<&RdfSubject, IndexMap<&RdfPredicate, Vec<&RdfObject>>> =
            IndexMap::new();
        for triple in triples {
            let objects = subjects
                .entry(&triple.subject)
                .or_default()
                .entry(&triple.predicate)
                .or_default();
            if !objects.contains(&&triple.object) {
                objects.push(&triple.object);
            }
        }

        for (subject, predicates) in &subjects {
            writeln!(output)?;
            output.push_str(&self.subject(subject));
            for (i, (predicate, objects)) in predicates.iter().enumerate() {
                output.push_str(if i == 0 { " " } else { " ;\n    " });
                output.push_str(&self.predicate(predicate));
                let objects: Vec<String> = objects.iter().map(|o| self.object(o)).collect();
                write!(output, " {}", objects.join(", "))?;
            }
            writeln!(output, " .")?;
        }

        Ok(output)
    }

    fn iri(&self, iri: &str) -> String {
        self.namespaces
            .compact(iri)
            .unwrap_or_else(|| format!("<{}>", iri))
    }

    fn subject(&self, subject: &RdfSubject) -> String {
        match subject {
            RdfSubject::NamedNode(n) => self.iri(n.as_str()),
            RdfSubject::BlankNode(b) => b.to_string(),
        }
    }

    fn predicate(&self, predicate: &RdfPredicate) -> String {
        if predicate.as_str() == rdf::TYPE {
            "a".to_string()
        } else {
            self.iri(predicate.as_str())
        }
    }

    fn object(&self, object: &RdfObject) -> String {
        match object {
            RdfObject::NamedNode(n) => self.iri(n.as_str()),
            RdfObject::BlankNode(b) => b.to_string(),
            RdfObject::Literal(l) => self.literal(l),
        }
    }

    fn literal(&self, literal: &Literal) -> String {
        let value = literal.value();
        if let Some(lang) = literal.language() {
            return format!("{}@{}", quote(value), lang);
        }
        if literal.is_plain() {
            return quote(value);
        }
        let datatype = literal.datatype();
        match datatype.as_str() {
            xsd::INTEGER if is_integer_token(value) => value.to_string(),
            xsd::BOOLEAN if value == "true" || value == "false" => value.to_string(),
            dt => format!("{}^^{}", quote(value), self.iri(dt)),
        }
    }
}

fn is_integer_token(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub(super) fn invalid_data(e: ParseError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
}

pub(super) fn convert_triple(t: rio_api::model::Triple) -> ParseResult<Triple> {
    Ok(Triple::new(
        convert_subject(t.subject)?,
        convert_predicate(t.predicate)?,
        convert_object(t.object)?,
    ))
}

fn convert_subject(s: rio_api::model::Subject) -> ParseResult<RdfSubject> {
    match s {
        rio_api::model::Subject::NamedNode(n) => Ok(RdfSubject::NamedNode(
            NamedNode::new(n.iri).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        rio_api::model::Subject::BlankNode(b) => Ok(RdfSubject::BlankNode(
            BlankNode::from_id(b.id).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        #[allow(unreachable_patterns)]
        _ => Err(ParseError::Parse("Unsupported subject type".to_string())),
    }
}

fn convert_predicate(p: rio_api::model::NamedNode) -> ParseResult<RdfPredicate> {
    RdfPredicate::new(p.iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_object(o: rio_api::model::Term) -> ParseResult<RdfObject> {
    match o {
        rio_api::model::Term::NamedNode(n) => Ok(RdfObject::NamedNode(
            NamedNode::new(n.iri).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        rio_api::model::Term::BlankNode(b) => Ok(RdfObject::BlankNode(
            BlankNode::from_id(b.id).map_err(|e| ParseError::Parse(e.to_string()))?,
        )),
        rio_api::model::Term::Literal(l) => match l {
            rio_api::model::Literal::Simple { value } => {
                Ok(RdfObject::Literal(Literal::new_simple_literal(value)))
            }
            rio_api::model::Literal::LanguageTaggedString { value, language } => {
                Ok(RdfObject::Literal(
                    Literal::new_language_tagged_literal(value, language)
                        .map_err(|e| ParseError::Parse(e.to_string()))?,
                ))
            }
            rio_api::model::Literal::Typed { value, datatype } => {
                let dt = NamedNode::new(datatype.iri)
                    .map_err(|e| ParseError::Parse(e.to_string()))?;
                Ok(RdfObject::Literal(Literal::new_typed_literal(value, dt)))
            }
        },
        #[allow(unreachable_patterns)]
        _ => Err(ParseError::Parse("Unsupported object type".to_string())),
    }
}

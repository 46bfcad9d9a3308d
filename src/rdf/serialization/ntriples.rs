//! N-Triples format implementation

use super::turtle::{convert_triple, invalid_data};
use super::{ParseError, ParseResult, SerializeError, SerializeResult};
use crate::rdf::{RdfObject, RdfSubject, Triple};
use rio_api::formatter::TriplesFormatter;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser};
use std::io::{BufReader, Cursor};

/// N-Triples parser
pub struct NTriplesParserWrapper;

impl NTriplesParserWrapper {
    pub fn parse(input: &str) -> ParseResult<Vec<Triple>> {
        let mut reader = BufReader::new(Cursor::new(input));
        let mut parser = NTriplesParser::new(&mut reader);

        let mut triples = Vec::new();
        let res: Result<(), rio_turtle::TurtleError> = parser.parse_all(&mut |t| {
            triples.push(convert_triple(t).map_err(invalid_data)?);
            Ok(())
        });

        res.map(|_| triples)
            .map_err(|e| ParseError::Parse(e.to_string()))
    }
}

/// N-Triples serializer
pub struct NTriplesSerializerWrapper;

impl NTriplesSerializerWrapper {
    pub fn serialize(triples: &[Triple]) -> SerializeResult<String> {
        let mut output = Vec::new();
        let mut formatter = NTriplesFormatter::new(&mut output);

        for triple in triples {
            let subject = match &triple.subject {
                RdfSubject::NamedNode(n) => {
                    rio_api::model::Subject::NamedNode(rio_api::model::NamedNode { iri: n.as_str() })
                }
                RdfSubject::BlankNode(b) => {
                    rio_api::model::Subject::BlankNode(rio_api::model::BlankNode { id: b.as_str() })
                }
            };

            let predicate = rio_api::model::NamedNode {
                iri: triple.predicate.as_str(),
            };

            let datatype;
            let object = match &triple.object {
                RdfObject::NamedNode(n) => {
                    rio_api::model::Term::NamedNode(rio_api::model::NamedNode { iri: n.as_str() })
                }
                RdfObject::BlankNode(b) => {
                    rio_api::model::Term::BlankNode(rio_api::model::BlankNode { id: b.as_str() })
                }
                RdfObject::Literal(l) => {
                    let literal = if let Some(language) = l.language() {
                        rio_api::model::Literal::LanguageTaggedString {
                            value: l.value(),
                            language,
                        }
                    } else if l.is_plain() {
                        rio_api::model::Literal::Simple { value: l.value() }
                    } else {
                        datatype = l.datatype();
                        rio_api::model::Literal::Typed {
                            value: l.value(),
                            datatype: rio_api::model::NamedNode {
                                iri: datatype.as_str(),
                            },
                        }
                    };
                    rio_api::model::Term::Literal(literal)
                }
            };

            formatter
                .format(&rio_api::model::Triple {
                    subject,
                    predicate,
                    object,
                })
                .map_err(|e| SerializeError::Serialize(e.to_string()))?;
        }

        formatter
            .finish()
            .map_err(|e| SerializeError::Serialize(e.to_string()))?;

        String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::vocab::{self, xsd};
    use crate::rdf::{Literal, NamedNode};

    #[test]
    fn test_one_line_per_triple() {
        let s = NamedNode::new("http://x/m/1").unwrap();
        let triples = vec![
            Triple::new(s.clone(), NamedNode::new("http://x/p").unwrap(), Literal::new_simple_literal("a \"b\"")),
            Triple::new(
                s,
                NamedNode::new("http://x/q").unwrap(),
                Literal::new_typed_literal("7", vocab::node(xsd::INTEGER)),
            ),
        ];
        let output = NTriplesSerializerWrapper::serialize(&triples).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"<http://x/m/1> <http://x/p> "a \"b\"" ."#);
        assert_eq!(
            lines[1],
            r#"<http://x/m/1> <http://x/q> "7"^^<http://www.w3.org/2001/XMLSchema#integer> ."#
        );
        assert_eq!(NTriplesParserWrapper::parse(&output).unwrap(), triples);
    }
}

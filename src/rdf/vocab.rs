//! Well-known vocabulary terms (RDF, RDFS, XSD, SHACL)

use super::types::{NamedNode, RdfPredicate};

pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

pub mod rdfs {
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    pub const DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
}

pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// Datatypes compared by numeric value
    pub const NUMERIC: [&str; 7] = [INTEGER, FLOAT, DOUBLE, DECIMAL, INT, LONG, NON_NEGATIVE_INTEGER];
}

pub mod sh {
    pub const NAMESPACE: &str = "http://www.w3.org/ns/shacl#";

    pub const NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
    pub const PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
    pub const PATH: &str = "http://www.w3.org/ns/shacl#path";
    pub const TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";
    pub const TARGET_NODE: &str = "http://www.w3.org/ns/shacl#targetNode";
    pub const TARGET_SUBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetSubjectsOf";
    pub const TARGET_OBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetObjectsOf";
    pub const MIN_COUNT: &str = "http://www.w3.org/ns/shacl#minCount";
    pub const MAX_COUNT: &str = "http://www.w3.org/ns/shacl#maxCount";
    pub const DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";
    pub const NODE_KIND: &str = "http://www.w3.org/ns/shacl#nodeKind";
    pub const CLASS: &str = "http://www.w3.org/ns/shacl#class";
    pub const PATTERN: &str = "http://www.w3.org/ns/shacl#pattern";
    pub const FLAGS: &str = "http://www.w3.org/ns/shacl#flags";
    pub const MIN_INCLUSIVE: &str = "http://www.w3.org/ns/shacl#minInclusive";
    pub const MAX_INCLUSIVE: &str = "http://www.w3.org/ns/shacl#maxInclusive";
    pub const MIN_EXCLUSIVE: &str = "http://www.w3.org/ns/shacl#minExclusive";
    pub const MAX_EXCLUSIVE: &str = "http://www.w3.org/ns/shacl#maxExclusive";
    pub const MIN_LENGTH: &str = "http://www.w3.org/ns/shacl#minLength";
    pub const MAX_LENGTH: &str = "http://www.w3.org/ns/shacl#maxLength";
    pub const IN: &str = "http://www.w3.org/ns/shacl#in";
    pub const HAS_VALUE: &str = "http://www.w3.org/ns/shacl#hasValue";
    pub const SEVERITY: &str = "http://www.w3.org/ns/shacl#severity";
    pub const MESSAGE: &str = "http://www.w3.org/ns/shacl#message";
    pub const DEACTIVATED: &str = "http://www.w3.org/ns/shacl#deactivated";
    pub const NAME: &str = "http://www.w3.org/ns/shacl#name";
    pub const DESCRIPTION: &str = "http://www.w3.org/ns/shacl#description";
    pub const ORDER: &str = "http://www.w3.org/ns/shacl#order";
    pub const GROUP: &str = "http://www.w3.org/ns/shacl#group";

    pub const IRI: &str = "http://www.w3.org/ns/shacl#IRI";
    pub const BLANK_NODE: &str = "http://www.w3.org/ns/shacl#BlankNode";
    pub const LITERAL: &str = "http://www.w3.org/ns/shacl#Literal";
    pub const BLANK_NODE_OR_IRI: &str = "http://www.w3.org/ns/shacl#BlankNodeOrIRI";
    pub const BLANK_NODE_OR_LITERAL: &str = "http://www.w3.org/ns/shacl#BlankNodeOrLiteral";
    pub const IRI_OR_LITERAL: &str = "http://www.w3.org/ns/shacl#IRIOrLiteral";

    pub const VIOLATION: &str = "http://www.w3.org/ns/shacl#Violation";
    pub const WARNING: &str = "http://www.w3.org/ns/shacl#Warning";
    pub const INFO: &str = "http://www.w3.org/ns/shacl#Info";
}

/// Named node for one of the constants above
pub fn node(iri: &'static str) -> NamedNode {
    NamedNode::new_unchecked(iri)
}

/// Predicate for one of the constants above
pub fn predicate(iri: &'static str) -> RdfPredicate {
    RdfPredicate::from(node(iri))
}

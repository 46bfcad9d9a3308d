//! Shapes graph model
//!
//! Reads node and property shapes out of a parsed shapes document. Only
//! predicate paths and the constraints in [`SUPPORTED`] are understood; any
//! other path or `sh:` predicate on a shape is reported as an error instead
//! of being skipped.

use super::{ShapeError, ShapeResult};
use crate::rdf::vocab::{self, rdf, sh};
use crate::rdf::{Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, TripleStore};
use indexmap::IndexSet;
use regex::{Regex, RegexBuilder};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Violation,
}

impl Severity {
    fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            sh::VIOLATION => Some(Severity::Violation),
            sh::WARNING => Some(Severity::Warning),
            sh::INFO => Some(Severity::Info),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Violation => f.write_str("sh:Violation"),
            Severity::Warning => f.write_str("sh:Warning"),
            Severity::Info => f.write_str("sh:Info"),
        }
    }
}

/// `sh:nodeKind` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Iri,
    BlankNode,
    Literal,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

impl NodeKind {
    fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            sh::IRI => Some(NodeKind::Iri),
            sh::BLANK_NODE => Some(NodeKind::BlankNode),
            sh::LITERAL => Some(NodeKind::Literal),
            sh::BLANK_NODE_OR_IRI => Some(NodeKind::BlankNodeOrIri),
            sh::BLANK_NODE_OR_LITERAL => Some(NodeKind::BlankNodeOrLiteral),
            sh::IRI_OR_LITERAL => Some(NodeKind::IriOrLiteral),
            _ => None,
        }
    }

    pub fn matches(&self, term: &RdfObject) -> bool {
        let (iri, blank, literal) = (term.is_named_node(), term.is_blank_node(), term.is_literal());
        match self {
            NodeKind::Iri => iri,
            NodeKind::BlankNode => blank,
            NodeKind::Literal => literal,
            NodeKind::BlankNodeOrIri => blank || iri,
            NodeKind::BlankNodeOrLiteral => blank || literal,
            NodeKind::IriOrLiteral => iri || literal,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Iri => "sh:IRI",
            NodeKind::BlankNode => "sh:BlankNode",
            NodeKind::Literal => "sh:Literal",
            NodeKind::BlankNodeOrIri => "sh:BlankNodeOrIRI",
            NodeKind::BlankNodeOrLiteral => "sh:BlankNodeOrLiteral",
            NodeKind::IriOrLiteral => "sh:IRIOrLiteral",
        };
        f.write_str(s)
    }
}

/// How a node shape selects its focus nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Instances of the class, subclasses included
    Class(NamedNode),
    Node(RdfObject),
    SubjectsOf(RdfPredicate),
    ObjectsOf(RdfPredicate),
}

#[derive(Debug, Clone)]
pub enum Constraint {
    MinCount(usize),
    MaxCount(usize),
    Datatype(NamedNode),
    NodeKind(NodeKind),
    Class(NamedNode),
    Pattern { regex: Regex, source: String },
    MinInclusive(Literal),
    MaxInclusive(Literal),
    MinExclusive(Literal),
    MaxExclusive(Literal),
    MinLength(usize),
    MaxLength(usize),
    /// Allowed values, from an RDF list
    In(Vec<RdfObject>),
    HasValue(RdfObject),
}

/// `sh:` predicates the reader understands on a shape node
pub const SUPPORTED: [&str; 28] = [
    sh::TARGET_CLASS,
    sh::TARGET_NODE,
    sh::TARGET_SUBJECTS_OF,
    sh::TARGET_OBJECTS_OF,
    sh::PROPERTY,
    sh::PATH,
    sh::MIN_COUNT,
    sh::MAX_COUNT,
    sh::DATATYPE,
    sh::NODE_KIND,
    sh::CLASS,
    sh::PATTERN,
    sh::FLAGS,
    sh::MIN_INCLUSIVE,
    sh::MAX_INCLUSIVE,
    sh::MIN_EXCLUSIVE,
    sh::MAX_EXCLUSIVE,
    sh::MIN_LENGTH,
    sh::MAX_LENGTH,
    sh::IN,
    sh::HAS_VALUE,
    sh::SEVERITY,
    sh::MESSAGE,
    sh::DEACTIVATED,
    // non-validating
    sh::NAME,
    sh::DESCRIPTION,
    sh::ORDER,
    sh::GROUP,
];

#[derive(Debug, Clone)]
pub struct PropertyShape {
    pub id: RdfSubject,
    pub path: RdfPredicate,
    pub constraints: Vec<Constraint>,
    pub severity: Severity,
    pub message: Option<String>,
    pub deactivated: bool,
}

#[derive(Debug, Clone)]
pub struct NodeShape {
    pub id: RdfSubject,
    pub targets: Vec<Target>,
    /// Constraints on the focus node itself
    pub constraints: Vec<Constraint>,
    pub properties: Vec<PropertyShape>,
    pub severity: Severity,
    pub message: Option<String>,
    pub deactivated: bool,
}

/// All node shapes of a shapes document
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    pub node_shapes: Vec<NodeShape>,
}

impl ShapesGraph {
    /// Collect node shapes: declared `sh:NodeShape`s plus any subject with a
    /// target declaration
    pub fn from_store(store: &TripleStore) -> ShapeResult<Self> {
        let mut ids: IndexSet<RdfSubject> = store
            .subjects(&vocab::predicate(rdf::TYPE), &vocab::node(sh::NODE_SHAPE).into())
            .cloned()
            .collect();
        for target in [sh::TARGET_CLASS, sh::TARGET_NODE, sh::TARGET_SUBJECTS_OF, sh::TARGET_OBJECTS_OF] {
            ids.extend(
                store
                    .with_predicate(&vocab::predicate(target))
                    .into_iter()
                    .map(|t| t.subject.clone()),
            );
        }

        let node_shapes = ids
            .into_iter()
            .map(|id| read_node_shape(store, id))
            .collect::<ShapeResult<Vec<_>>>()?;
        Ok(Self { node_shapes })
    }

    pub fn len(&self) -> usize {
        self.node_shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_shapes.is_empty()
    }
}

fn read_node_shape(store: &TripleStore, id: RdfSubject) -> ShapeResult<NodeShape> {
    check_supported(store, &id)?;
    let mut targets = Vec::new();
    for class in store.objects(&id, &vocab::predicate(sh::TARGET_CLASS)) {
        targets.push(Target::Class(named(&id, "targetClass", class)?));
    }
    for node in store.objects(&id, &vocab::predicate(sh::TARGET_NODE)) {
        targets.push(Target::Node(node.clone()));
    }
    for p in store.objects(&id, &vocab::predicate(sh::TARGET_SUBJECTS_OF)) {
        targets.push(Target::SubjectsOf(named(&id, "targetSubjectsOf", p)?.into()));
    }
    for p in store.objects(&id, &vocab::predicate(sh::TARGET_OBJECTS_OF)) {
        targets.push(Target::ObjectsOf(named(&id, "targetObjectsOf", p)?.into()));
    }

    let properties = store
        .objects(&id, &vocab::predicate(sh::PROPERTY))
        .map(|obj| {
            let prop_id = obj.to_subject().ok_or_else(|| ShapeError::InvalidValue {
                shape: id.to_string(),
                constraint: "property",
                value: obj.to_string(),
            })?;
            read_property_shape(store, prop_id)
        })
        .collect::<ShapeResult<Vec<_>>>()?;

    Ok(NodeShape {
        targets,
        constraints: read_constraints(store, &id)?,
        properties,
        severity: read_severity(store, &id)?,
        message: read_message(store, &id),
        deactivated: read_deactivated(store, &id),
        id,
    })
}

fn read_property_shape(store: &TripleStore, id: RdfSubject) -> ShapeResult<PropertyShape> {
    check_supported(store, &id)?;
    let path = match store.object(&id, &vocab::predicate(sh::PATH)) {
        Some(RdfObject::NamedNode(p)) => RdfPredicate::from(p.clone()),
        Some(_) => return Err(ShapeError::UnsupportedPath(id.to_string())),
        None => return Err(ShapeError::MissingPath(id.to_string())),
    };
    Ok(PropertyShape {
        path,
        constraints: read_constraints(store, &id)?,
        severity: read_severity(store, &id)?,
        message: read_message(store, &id),
        deactivated: read_deactivated(store, &id),
        id,
    })
}

fn read_constraints(store: &TripleStore, id: &RdfSubject) -> ShapeResult<Vec<Constraint>> {
    let values = |p: &'static str| store.objects(id, &vocab::predicate(p));
    let mut constraints = Vec::new();

    for v in values(sh::MIN_COUNT) {
        constraints.push(Constraint::MinCount(count(id, "minCount", v)?));
    }
    for v in values(sh::MAX_COUNT) {
        constraints.push(Constraint::MaxCount(count(id, "maxCount", v)?));
    }
    for v in values(sh::DATATYPE) {
        constraints.push(Constraint::Datatype(named(id, "datatype", v)?));
    }
    for v in values(sh::NODE_KIND) {
        let kind = v
            .as_named_node()
            .and_then(|n| NodeKind::from_iri(n.as_str()))
            .ok_or_else(|| invalid(id, "nodeKind", v))?;
        constraints.push(Constraint::NodeKind(kind));
    }
    for v in values(sh::CLASS) {
        constraints.push(Constraint::Class(named(id, "class", v)?));
    }
    let flags = store
        .object(id, &vocab::predicate(sh::FLAGS))
        .and_then(|f| f.as_literal())
        .map(|l| l.value().to_string())
        .unwrap_or_default();
    for v in values(sh::PATTERN) {
        let source = v.as_literal().ok_or_else(|| invalid(id, "pattern", v))?.value();
        let regex = build_pattern(source, &flags).map_err(|e| ShapeError::InvalidPattern {
            shape: id.to_string(),
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        constraints.push(Constraint::Pattern {
            regex,
            source: source.to_string(),
        });
    }
    for v in values(sh::MIN_INCLUSIVE) {
        let lit = v.as_literal().ok_or_else(|| invalid(id, "minInclusive", v))?;
        constraints.push(Constraint::MinInclusive(lit.clone()));
    }
    for v in values(sh::MAX_INCLUSIVE) {
        let lit = v.as_literal().ok_or_else(|| invalid(id, "maxInclusive", v))?;
        constraints.push(Constraint::MaxInclusive(lit.clone()));
    }
    for v in values(sh::MIN_EXCLUSIVE) {
        let lit = v.as_literal().ok_or_else(|| invalid(id, "minExclusive", v))?;
        constraints.push(Constraint::MinExclusive(lit.clone()));
    }
    for v in values(sh::MAX_EXCLUSIVE) {
        let lit = v.as_literal().ok_or_else(|| invalid(id, "maxExclusive", v))?;
        constraints.push(Constraint::MaxExclusive(lit.clone()));
    }
    for v in values(sh::MIN_LENGTH) {
        constraints.push(Constraint::MinLength(count(id, "minLength", v)?));
    }
    for v in values(sh::MAX_LENGTH) {
        constraints.push(Constraint::MaxLength(count(id, "maxLength", v)?));
    }
    for v in values(sh::IN) {
        constraints.push(Constraint::In(read_list(store, id, v)?));
    }
    for v in values(sh::HAS_VALUE) {
        constraints.push(Constraint::HasValue(v.clone()));
    }
    Ok(constraints)
}

/// Reject `sh:` predicates this reader would otherwise ignore
fn check_supported(store: &TripleStore, id: &RdfSubject) -> ShapeResult<()> {
    let unsupported = store.iter().find(|t| {
        &t.subject == id
            && t.predicate.as_str().starts_with(sh::NAMESPACE)
            && !SUPPORTED.contains(&t.predicate.as_str())
    });
    match unsupported {
        Some(t) => Err(ShapeError::UnsupportedConstraint {
            shape: id.to_string(),
            constraint: t.predicate.as_str()[sh::NAMESPACE.len()..].to_string(),
        }),
        None => Ok(()),
    }
}

/// Members of the RDF list starting at `head`
fn read_list(store: &TripleStore, id: &RdfSubject, head: &RdfObject) -> ShapeResult<Vec<RdfObject>> {
    let first = vocab::predicate(rdf::FIRST);
    let rest = vocab::predicate(rdf::REST);
    let nil: RdfObject = vocab::node(rdf::NIL).into();

    let mut members = Vec::new();
    let mut seen = IndexSet::new();
    let mut current = head.clone();
    while current != nil {
        let node = current
            .to_subject()
            .filter(|node| seen.insert(node.clone()))
            .ok_or_else(|| invalid(id, "in", head))?;
        let item = store.object(&node, &first).ok_or_else(|| invalid(id, "in", head))?;
        members.push(item.clone());
        current = store.object(&node, &rest).ok_or_else(|| invalid(id, "in", head))?.clone();
    }
    Ok(members)
}

fn build_pattern(source: &str, flags: &str) -> Result<Regex, regex::Error> {
    let mut builder = RegexBuilder::new(source);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            _ => &mut builder,
        };
    }
    builder.build()
}

fn read_severity(store: &TripleStore, id: &RdfSubject) -> ShapeResult<Severity> {
    match store.object(id, &vocab::predicate(sh::SEVERITY)) {
        None => Ok(Severity::Violation),
        Some(v) => v
            .as_named_node()
            .and_then(|n| Severity::from_iri(n.as_str()))
            .ok_or_else(|| invalid(id, "severity", v)),
    }
}

fn read_message(store: &TripleStore, id: &RdfSubject) -> Option<String> {
    store
        .object(id, &vocab::predicate(sh::MESSAGE))
        .and_then(|m| m.as_literal())
        .map(|l| l.value().to_string())
}

fn read_deactivated(store: &TripleStore, id: &RdfSubject) -> bool {
    store
        .object(id, &vocab::predicate(sh::DEACTIVATED))
        .and_then(|d| d.as_literal())
        .is_some_and(|l| l.value() == "true" || l.value() == "1")
}

fn count(id: &RdfSubject, constraint: &'static str, value: &RdfObject) -> ShapeResult<usize> {
    value
        .as_literal()
        .and_then(|l| l.value().parse::<usize>().ok())
        .ok_or_else(|| invalid(id, constraint, value))
}

fn named(id: &RdfSubject, constraint: &'static str, value: &RdfObject) -> ShapeResult<NamedNode> {
    value
        .as_named_node()
        .cloned()
        .ok_or_else(|| invalid(id, constraint, value))
}

fn invalid(id: &RdfSubject, constraint: &'static str, value: &RdfObject) -> ShapeError {
    ShapeError::InvalidValue {
        shape: id.to_string(),
        constraint,
        value: value.to_string(),
    }
}

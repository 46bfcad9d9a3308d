//! Built-in SHACL core validator

use super::report::{ConstraintComponent, ValidationEntry, ValidationReport};
use super::shapes::{Constraint, NodeShape, Severity, ShapesGraph, Target};
use super::{Inference, ShapeValidator, ValidationResult};
use crate::rdf::vocab::{self, rdf, rdfs, xsd};
use crate::rdf::{Literal, NamedNode, RdfObject, RdfPredicate, RdfSubject, RdfsReasoner, TripleStore};
use chrono::{DateTime, NaiveDateTime};
use indexmap::IndexSet;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Validator for the SHACL core subset described in [`super::shapes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreShapeValidator {
    inference: Inference,
}

impl CoreShapeValidator {
    pub fn new(inference: Inference) -> Self {
        Self { inference }
    }

    pub fn inference(&self) -> Inference {
        self.inference
    }
}

impl Default for CoreShapeValidator {
    fn default() -> Self {
        Self::new(Inference::Rdfs)
    }
}

impl ShapeValidator for CoreShapeValidator {
    fn validate(
        &self,
        data: &TripleStore,
        shapes: &TripleStore,
        ontology: Option<&TripleStore>,
    ) -> ValidationResult<ValidationReport> {
        let shapes = ShapesGraph::from_store(shapes)?;

        let mut graph = data.clone();
        if self.inference == Inference::Rdfs {
            if let Some(ontology) = ontology {
                graph.extend(ontology.iter().cloned());
            }
            let inferred = RdfsReasoner::new().reason(&mut graph)?;
            debug!("RDFS inference added {} triples", inferred);
        }

        let mut results = Vec::new();
        for shape in shapes.node_shapes.iter().filter(|s| !s.deactivated) {
            validate_node_shape(&graph, shape, &mut results);
        }

        let report = ValidationReport::new(results);
        info!(
            "Validated {} triples against {} shapes: conforms={}, {} results",
            data.len(),
            shapes.len(),
            report.conforms,
            report.results.len()
        );
        Ok(report)
    }
}

fn validate_node_shape(graph: &TripleStore, shape: &NodeShape, results: &mut Vec<ValidationEntry>) {
    for focus in focus_nodes(graph, &shape.targets) {
        let own = std::slice::from_ref(&focus);
        for constraint in &shape.constraints {
            let check = Check {
                graph,
                shape_id: &shape.id,
                severity: shape.severity,
                message: shape.message.as_deref(),
                focus: &focus,
                path: None,
            };
            check.run(constraint, own, results);
        }

        for property in shape.properties.iter().filter(|p| !p.deactivated) {
            let values: Vec<RdfObject> = focus
                .to_subject()
                .map(|s| graph.objects(&s, &property.path).cloned().collect())
                .unwrap_or_default();
            let check = Check {
                graph,
                shape_id: &property.id,
                severity: property.severity,
                message: property.message.as_deref(),
                focus: &focus,
                path: Some(&property.path),
            };
            for constraint in &property.constraints {
                check.run(constraint, &values, results);
            }
        }
    }
}

/// Focus nodes of all targets, deduplicated in discovery order
fn focus_nodes(graph: &TripleStore, targets: &[Target]) -> IndexSet<RdfObject> {
    let mut nodes = IndexSet::new();
    for target in targets {
        match target {
            Target::Class(class) => {
                let rdf_type = vocab::predicate(rdf::TYPE);
                for sub in subclasses(graph, class) {
                    nodes.extend(graph.subjects(&rdf_type, &sub).cloned().map(RdfObject::from));
                }
            }
            Target::Node(node) => {
                nodes.insert(node.clone());
            }
            Target::SubjectsOf(p) => {
                nodes.extend(graph.with_predicate(p).into_iter().map(|t| RdfObject::from(t.subject.clone())));
            }
            Target::ObjectsOf(p) => {
                nodes.extend(graph.with_predicate(p).into_iter().map(|t| t.object.clone()));
            }
        }
    }
    nodes
}

/// The class and all its transitive subclasses
fn subclasses(graph: &TripleStore, class: &NamedNode) -> IndexSet<RdfObject> {
    let sub_class_of = vocab::predicate(rdfs::SUB_CLASS_OF);
    let mut found: IndexSet<RdfObject> = IndexSet::new();
    found.insert(class.clone().into());
    let mut i = 0;
    while let Some(current) = found.get_index(i).cloned() {
        found.extend(graph.subjects(&sub_class_of, &current).cloned().map(RdfObject::from));
        i += 1;
    }
    found
}

/// SHACL instance check: `rdf:type/rdfs:subClassOf*`
fn is_instance_of(graph: &TripleStore, node: &RdfObject, class: &NamedNode) -> bool {
    let Some(subject) = node.to_subject() else {
        return false;
    };
    let classes = subclasses(graph, class);
    graph
        .objects(&subject, &vocab::predicate(rdf::TYPE))
        .any(|t| classes.contains(t))
}

struct Check<'a> {
    graph: &'a TripleStore,
    shape_id: &'a RdfSubject,
    severity: Severity,
    message: Option<&'a str>,
    focus: &'a RdfObject,
    path: Option<&'a RdfPredicate>,
}

impl Check<'_> {
    fn run(&self, constraint: &Constraint, values: &[RdfObject], results: &mut Vec<ValidationEntry>) {
        match constraint {
            Constraint::MinCount(min) => {
                if values.len() < *min {
                    results.push(self.entry(
                        ConstraintComponent::MinCount,
                        None,
                        format!("Less than {} values on {}", min, self.location()),
                    ));
                }
            }
            Constraint::MaxCount(max) => {
                if values.len() > *max {
                    results.push(self.entry(
                        ConstraintComponent::MaxCount,
                        None,
                        format!("More than {} values on {}", max, self.location()),
                    ));
                }
            }
            Constraint::Datatype(dt) => self.each(values, results, ConstraintComponent::Datatype, |v| {
                has_datatype(v, dt).then_some(()).ok_or_else(|| format!("Value is not Literal with datatype {}", dt))
            }),
            Constraint::NodeKind(kind) => self.each(values, results, ConstraintComponent::NodeKind, |v| {
                kind.matches(v).then_some(()).ok_or_else(|| format!("Value is not of Node Kind {}", kind))
            }),
            Constraint::Class(class) => self.each(values, results, ConstraintComponent::Class, |v| {
                is_instance_of(self.graph, v, class)
                    .then_some(())
                    .ok_or_else(|| format!("Value does not have class {}", class))
            }),
            Constraint::Pattern { regex, source } => self.each(values, results, ConstraintComponent::Pattern, |v| {
                let text = match v {
                    RdfObject::NamedNode(n) => Some(n.as_str()),
                    RdfObject::Literal(l) => Some(l.value()),
                    RdfObject::BlankNode(_) => None,
                };
                text.is_some_and(|t| regex.is_match(t))
                    .then_some(())
                    .ok_or_else(|| format!("Value does not match pattern \"{}\"", source))
            }),
            Constraint::MinInclusive(bound) => self.each(values, results, ConstraintComponent::MinInclusive, |v| {
                compare(v, bound)
                    .is_some_and(|o| o != Ordering::Less)
                    .then_some(())
                    .ok_or_else(|| format!("Value is not >= {}", bound))
            }),
            Constraint::MaxInclusive(bound) => self.each(values, results, ConstraintComponent::MaxInclusive, |v| {
                compare(v, bound)
                    .is_some_and(|o| o != Ordering::Greater)
                    .then_some(())
                    .ok_or_else(|| format!("Value is not <= {}", bound))
            }),
            Constraint::MinExclusive(bound) => self.each(values, results, ConstraintComponent::MinExclusive, |v| {
                (compare(v, bound) == Some(Ordering::Greater))
                    .then_some(())
                    .ok_or_else(|| format!("Value is not > {}", bound))
            }),
            Constraint::MaxExclusive(bound) => self.each(values, results, ConstraintComponent::MaxExclusive, |v| {
                (compare(v, bound) == Some(Ordering::Less))
                    .then_some(())
                    .ok_or_else(|| format!("Value is not < {}", bound))
            }),
            Constraint::MinLength(min) => self.each(values, results, ConstraintComponent::MinLength, |v| {
                string_length(v)
                    .is_some_and(|len| len >= *min)
                    .then_some(())
                    .ok_or_else(|| format!("Value has less than {} characters", min))
            }),
            Constraint::MaxLength(max) => self.each(values, results, ConstraintComponent::MaxLength, |v| {
                string_length(v)
                    .is_some_and(|len| len <= *max)
                    .then_some(())
                    .ok_or_else(|| format!("Value has more than {} characters", max))
            }),
            Constraint::In(allowed) => self.each(values, results, ConstraintComponent::In, |v| {
                allowed.contains(v).then_some(()).ok_or_else(|| {
                    let list: Vec<String> = allowed.iter().map(|a| a.to_string()).collect();
                    format!("Value is not in ({})", list.join(" "))
                })
            }),
            Constraint::HasValue(expected) => {
                if !values.contains(expected) {
                    results.push(self.entry(
                        ConstraintComponent::HasValue,
                        None,
                        format!("Missing expected value {} on {}", expected, self.location()),
                    ));
                }
            }
        }
    }

    fn each(
        &self,
        values: &[RdfObject],
        results: &mut Vec<ValidationEntry>,
        component: ConstraintComponent,
        check: impl Fn(&RdfObject) -> Result<(), String>,
    ) {
        for value in values {
            if let Err(message) = check(value) {
                results.push(self.entry(component, Some(value.clone()), message));
            }
        }
    }

    fn entry(&self, component: ConstraintComponent, value: Option<RdfObject>, default_message: String) -> ValidationEntry {
        ValidationEntry {
            component,
            severity: self.severity,
            source_shape: self.shape_id.clone(),
            focus_node: self.focus.clone(),
            path: self.path.cloned(),
            value,
            message: self.message.map(str::to_string).unwrap_or(default_message),
        }
    }

    fn location(&self) -> String {
        match self.path {
            Some(path) => format!("{}->{}", self.focus, path),
            None => self.focus.to_string(),
        }
    }
}

fn has_datatype(value: &RdfObject, datatype: &NamedNode) -> bool {
    match value.as_literal() {
        Some(lit) if lit.language().is_none() && lit.datatype() == *datatype => {
            well_formed(datatype.as_str(), lit.value())
        }
        _ => false,
    }
}

// Blank nodes have no string form
fn string_length(value: &RdfObject) -> Option<usize> {
    match value {
        RdfObject::NamedNode(n) => Some(n.as_str().chars().count()),
        RdfObject::Literal(l) => Some(l.value().chars().count()),
        RdfObject::BlankNode(_) => None,
    }
}

fn well_formed(datatype: &str, lexical: &str) -> bool {
    match datatype {
        xsd::INTEGER | xsd::INT | xsd::LONG => {
            let digits = lexical.strip_prefix(['-', '+']).unwrap_or(lexical);
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        xsd::NON_NEGATIVE_INTEGER => {
            let digits = lexical.strip_prefix('+').unwrap_or(lexical);
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        xsd::BOOLEAN => matches!(lexical, "true" | "false" | "1" | "0"),
        xsd::FLOAT | xsd::DOUBLE => matches!(lexical, "INF" | "-INF" | "NaN") || lexical.parse::<f64>().is_ok(),
        xsd::DECIMAL => lexical.parse::<f64>().is_ok() && !lexical.contains(['e', 'E']),
        xsd::DATE_TIME => parse_date_time(lexical).is_some(),
        _ => true,
    }
}

fn parse_date_time(lexical: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(lexical)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

/// Order a value against a range bound; `None` when incomparable
fn compare(value: &RdfObject, bound: &Literal) -> Option<Ordering> {
    let value = value.as_literal()?;
    let numeric = |l: &Literal| {
        let dt = l.datatype();
        xsd::NUMERIC
            .contains(&dt.as_str())
            .then(|| l.value().parse::<f64>().ok())
            .flatten()
    };
    if let (Some(a), Some(b)) = (numeric(value), numeric(bound)) {
        return a.partial_cmp(&b);
    }
    let date_time = |l: &Literal| {
        (l.datatype().as_str() == xsd::DATE_TIME)
            .then(|| parse_date_time(l.value()))
            .flatten()
    };
    match (date_time(value), date_time(bound)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => None,
    }
}

//! RDFS (RDF Schema) reasoning
//!
//! Forward-chaining RDFS entailment used by the validation pipeline before
//! shapes are evaluated. Rules are applied in rounds until no round adds a
//! triple.

use super::store::TripleStore;
use super::types::{RdfObject, RdfPredicate, RdfSubject, Triple};
use super::vocab::{self, rdf, rdfs};
use thiserror::Error;
use tracing::debug;

/// Reasoning errors
#[derive(Error, Debug)]
pub enum ReasoningError {
    /// Fixpoint not reached within the configured number of rounds
    #[error("Inference did not converge after {0} iterations")]
    IterationLimit(usize),
}

pub type ReasoningResult<T> = Result<T, ReasoningError>;

/// RDFS inference rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceRule {
    /// rdfs:subClassOf transitivity
    SubClassOfTransitive,

    /// rdfs:subPropertyOf transitivity
    SubPropertyOfTransitive,

    /// (P subPropertyOf Q) ∧ (X P Y) → (X Q Y)
    PropertyInheritance,

    /// rdfs:domain inference
    DomainInference,

    /// rdfs:range inference
    RangeInference,

    /// rdf:type inheritance via rdfs:subClassOf
    TypeInheritance,
}

const DEFAULT_MAX_ITERATIONS: usize = 64;

/// RDFS reasoner with forward chaining
pub struct RdfsReasoner {
    /// Enable specific rules
    enabled_rules: Vec<InferenceRule>,
    max_iterations: usize,
}

impl RdfsReasoner {
    /// Create a new reasoner with all rules enabled
    pub fn new() -> Self {
        Self::with_rules(vec![
            InferenceRule::SubClassOfTransitive,
            InferenceRule::SubPropertyOfTransitive,
            InferenceRule::PropertyInheritance,
            InferenceRule::DomainInference,
            InferenceRule::RangeInference,
            InferenceRule::TypeInheritance,
        ])
    }

    /// Create a reasoner with specific rules
    pub fn with_rules(rules: Vec<InferenceRule>) -> Self {
        Self {
            enabled_rules: rules,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Compute the inferred triples without touching the input store
    pub fn materialize(&self, store: &TripleStore) -> ReasoningResult<Vec<Triple>> {
        let mut working = store.clone();
        let before = working.len();
        self.reason(&mut working)?;
        Ok(working.iter().skip(before).cloned().collect())
    }

    /// Apply reasoning and add inferred triples to the store
    ///
    /// Returns the number of triples added.
    pub fn reason(&self, store: &mut TripleStore) -> ReasoningResult<usize> {
        let mut total = 0;
        for round in 0..self.max_iterations {
            let candidates: Vec<Triple> = self
                .enabled_rules
                .iter()
                .flat_map(|rule| apply_rule(*rule, store))
                .collect();
            let added = store.extend(candidates);
            debug!("RDFS round {}: {} new triples", round, added);
            if added == 0 {
                return Ok(total);
            }
            total += added;
        }
        Err(ReasoningError::IterationLimit(self.max_iterations))
    }
}

impl Default for RdfsReasoner {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_rule(rule: InferenceRule, store: &TripleStore) -> Vec<Triple> {
    let rdf_type = vocab::predicate(rdf::TYPE);
    match rule {
        InferenceRule::SubClassOfTransitive => {
            transitive(store, &vocab::predicate(rdfs::SUB_CLASS_OF))
        }
        InferenceRule::SubPropertyOfTransitive => {
            transitive(store, &vocab::predicate(rdfs::SUB_PROPERTY_OF))
        }
        InferenceRule::PropertyInheritance => store
            .with_predicate(&vocab::predicate(rdfs::SUB_PROPERTY_OF))
            .into_iter()
            .filter_map(|decl| {
                let sub = subject_as_predicate(decl)?;
                let sup = RdfPredicate::from(decl.object.as_named_node()?.clone());
                Some((sub, sup))
            })
            .flat_map(|(sub, sup)| {
                store
                    .with_predicate(&sub)
                    .into_iter()
                    .map(|t| Triple::new(t.subject.clone(), sup.clone(), t.object.clone()))
                    .collect::<Vec<_>>()
            })
            .collect(),
        InferenceRule::DomainInference => store
            .with_predicate(&vocab::predicate(rdfs::DOMAIN))
            .into_iter()
            .filter_map(|decl| Some((subject_as_predicate(decl)?, decl.object.clone())))
            .flat_map(|(prop, class)| {
                store
                    .with_predicate(&prop)
                    .into_iter()
                    .map(|t| Triple::new(t.subject.clone(), rdf_type.clone(), class.clone()))
                    .collect::<Vec<_>>()
            })
            .collect(),
        InferenceRule::RangeInference => store
            .with_predicate(&vocab::predicate(rdfs::RANGE))
            .into_iter()
            .filter_map(|decl| Some((subject_as_predicate(decl)?, decl.object.clone())))
            .flat_map(|(prop, class)| {
                store
                    .with_predicate(&prop)
                    .into_iter()
                    .filter_map(|t| t.object.to_subject())
                    .map(|s| Triple::new(s, rdf_type.clone(), class.clone()))
                    .collect::<Vec<_>>()
            })
            .collect(),
        InferenceRule::TypeInheritance => {
            let sub_class_of = vocab::predicate(rdfs::SUB_CLASS_OF);
            store
                .with_predicate(&rdf_type)
                .into_iter()
                .flat_map(|t| {
                    let supers: Vec<RdfObject> = t
                        .object
                        .to_subject()
                        .map(|class| store.objects(&class, &sub_class_of).cloned().collect())
                        .unwrap_or_default();
                    supers
                        .into_iter()
                        .map(|sup| Triple::new(t.subject.clone(), rdf_type.clone(), sup))
                        .collect::<Vec<_>>()
                })
                .collect()
        }
    }
}

/// (A p B) ∧ (B p C) → (A p C)
fn transitive(store: &TripleStore, predicate: &RdfPredicate) -> Vec<Triple> {
    store
        .with_predicate(predicate)
        .into_iter()
        .flat_map(|first| {
            first
                .object
                .to_subject()
                .map(|middle| {
                    store
                        .objects(&middle, predicate)
                        .map(|end| Triple::new(first.subject.clone(), predicate.clone(), end.clone()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
        .collect()
}

fn subject_as_predicate(decl: &Triple) -> Option<RdfPredicate> {
    match &decl.subject {
        RdfSubject::NamedNode(n) => Some(RdfPredicate::from(n.clone())),
        RdfSubject::BlankNode(_) => None,
    }
}

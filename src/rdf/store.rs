//! In-memory triple store
//!
//! Backs the validation pipeline: parsed data, shape and ontology documents
//! are loaded here, and the RDFS reasoner materializes into it.

use super::types::{RdfObject, RdfPredicate, RdfSubject, Triple};
use indexmap::IndexSet;
use std::collections::HashMap;

/// Insertion-ordered, deduplicating triple set
///
/// Keeps two indices:
/// - SP index: Subject -> Predicate -> triple positions
/// - PO index: Predicate -> Object -> triple positions
///
/// Triples are never removed, so positions stay stable.
#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    /// All triples (primary storage)
    triples: IndexSet<Triple>,

    sp_index: HashMap<RdfSubject, HashMap<RdfPredicate, Vec<usize>>>,

    po_index: HashMap<RdfPredicate, HashMap<RdfObject, Vec<usize>>>,
}

impl TripleStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of triples
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut store = Self::new();
        store.extend(triples);
        store
    }

    /// Insert a triple, returning `false` if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }

        let (pos, _) = self.triples.insert_full(triple.clone());

        self.sp_index
            .entry(triple.subject)
            .or_default()
            .entry(triple.predicate.clone())
            .or_default()
            .push(pos);

        self.po_index
            .entry(triple.predicate)
            .or_default()
            .entry(triple.object)
            .or_default()
            .push(pos);

        true
    }

    /// Insert many triples, returning how many were new
    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        triples
            .into_iter()
            .map(|t| self.insert(t))
            .filter(|inserted| *inserted)
            .count()
    }

    /// Check if a triple exists in the store
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Get the total number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Objects of all triples with the given subject and predicate
    pub fn objects<'a>(
        &'a self,
        subject: &RdfSubject,
        predicate: &RdfPredicate,
    ) -> impl Iterator<Item = &'a RdfObject> + 'a {
        self.positions_sp(subject, predicate)
            .filter_map(move |pos| self.triples.get_index(pos))
            .map(|t| &t.object)
    }

    /// First object for a subject/predicate pair
    pub fn object(&self, subject: &RdfSubject, predicate: &RdfPredicate) -> Option<&RdfObject> {
        self.objects(subject, predicate).next()
    }

    /// Subjects of all triples with the given predicate and object
    pub fn subjects<'a>(
        &'a self,
        predicate: &RdfPredicate,
        object: &RdfObject,
    ) -> impl Iterator<Item = &'a RdfSubject> + 'a {
        self.positions_po(predicate, object)
            .filter_map(move |pos| self.triples.get_index(pos))
            .map(|t| &t.subject)
    }

    /// All triples using a predicate, in insertion order
    pub fn with_predicate(&self, predicate: &RdfPredicate) -> Vec<&Triple> {
        let mut positions: Vec<usize> = self
            .po_index
            .get(predicate)
            .into_iter()
            .flat_map(|by_object| by_object.values().flatten().copied())
            .collect();
        positions.sort_unstable();
        positions
            .into_iter()
            .filter_map(|pos| self.triples.get_index(pos))
            .collect()
    }

    fn positions_sp(
        &self,
        subject: &RdfSubject,
        predicate: &RdfPredicate,
    ) -> impl Iterator<Item = usize> + '_ {
        self.sp_index
            .get(subject)
            .and_then(|by_pred| by_pred.get(predicate))
            .into_iter()
            .flatten()
            .copied()
    }

    fn positions_po(
        &self,
        predicate: &RdfPredicate,
        object: &RdfObject,
    ) -> impl Iterator<Item = usize> + '_ {
        self.po_index
            .get(predicate)
            .and_then(|by_obj| by_obj.get(object))
            .into_iter()
            .flatten()
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::types::{Literal, NamedNode};

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn create_test_triple() -> Triple {
        Triple::new(
            node("http://example.org/alice"),
            node("http://xmlns.com/foaf/0.1/name"),
            Literal::new_simple_literal("Alice"),
        )
    }

    #[test]
    fn test_insert_and_contains() {
        let mut store = TripleStore::new();
        let triple = create_test_triple();

        assert!(store.insert(triple.clone()));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&triple));
    }

    #[test]
    fn test_duplicate_insert() {
        let mut store = TripleStore::new();
        let triple = create_test_triple();

        assert!(store.insert(triple.clone()));
        assert!(!store.insert(triple));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_objects_and_subjects() {
        let alice: RdfSubject = node("http://example.org/alice").into();
        let knows = RdfPredicate::from(node("http://xmlns.com/foaf/0.1/knows"));
        let bob: RdfObject = node("http://example.org/bob").into();
        let carol: RdfObject = node("http://example.org/carol").into();

        let mut store = TripleStore::new();
        store.insert(Triple::new(alice.clone(), knows.clone(), bob.clone()));
        store.insert(Triple::new(alice.clone(), knows.clone(), carol.clone()));

        let objects: Vec<_> = store.objects(&alice, &knows).cloned().collect();
        assert_eq!(objects, vec![bob.clone(), carol]);

        let subjects: Vec<_> = store.subjects(&knows, &bob).cloned().collect();
        assert_eq!(subjects, vec![alice]);
    }

    #[test]
    fn test_extend_counts_new_triples() {
        let mut store = TripleStore::new();
        let triple = create_test_triple();
        assert_eq!(store.extend(vec![triple.clone(), triple.clone()]), 1);
        assert_eq!(store.with_predicate(&triple.predicate).len(), 1);
    }
}

//! RDF support for metric records
//!
//! This module implements:
//! - RDF terms and triples (thin wrappers over `oxrdf`)
//! - Prefix management and the two application namespaces
//! - Literal coercion and the metric → triple projection
//! - Turtle / N-Triples serialization and parsing
//! - An in-memory triple store and RDFS forward-chaining inference
//!
//! # Example
//!
//! ```rust
//! use corona::config::CoronaConfig;
//! use corona::metric::{MetricKind, MetricRecord};
//! use corona::rdf::MetricToRdfMapper;
//!
//! let record = MetricRecord::builder(MetricKind::BacnetApplication, "http://x/m/1")
//!     .value("readPropertyRequests", 150)
//!     .build()
//!     .unwrap();
//!
//! let mapper = MetricToRdfMapper::from_config(&CoronaConfig::default());
//! let projection = mapper.project(&record).unwrap();
//! // type, timestamp and the counter
//! assert_eq!(projection.triples.len(), 3);
//! ```

pub mod coerce;
mod mapping;
mod namespace;
mod schema;
mod serialization;
mod store;
mod types;
pub mod vocab;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    Triple,
};

pub use store::TripleStore;

pub use mapping::{terms, MappingError, MappingResult, MetricToRdfMapper, Projection};

pub use namespace::{
    Namespace, NamespaceKind, NamespaceManager, Namespaces, PrefixError, PrefixResult,
};

pub use serialization::{
    ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer, SerializeError,
    SerializeResult, TurtleWriter,
};

pub use schema::{InferenceRule, RdfsReasoner, ReasoningError, ReasoningResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_module_exports() {
        let _store: TripleStore = TripleStore::new();
        let _reasoner = RdfsReasoner::new();
        let _ns_mgr = NamespaceManager::new();
        let _serializer = RdfSerializer::default();
    }
}

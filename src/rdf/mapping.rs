//! Metric record → RDF mapping
//!
//! This module projects a [`MetricRecord`] onto RDF triples. The subject of
//! every triple is the record's instance IRI.
//!
//! # Emission order
//!
//! 1. `rdf:type` → domain class named after the variant
//! 2. observer (`corona:observedFrom`, coerced: IRI or string)
//! 3. description (`rdfs:comment`, plain literal)
//! 4. identifier (`corona:metric-identifier`, always `xsd:string`)
//! 5. name (`rdfs:label`)
//! 6. timestamp (`corona:observedAt`, `xsd:dateTime`)
//! 7. source entity IRI (`corona:metricSource`), or else the source address
//!    (`corona:sourceAddress`)
//! 8. value fields in declaration order, each under its resolved
//!    namespace and public name
//!
//! # Failure policy
//!
//! Only an unusable subject or class IRI aborts a record. A source entity
//! IRI that does not parse drops that one statement; every other malformed
//! value falls back to a string literal. Both cases are recorded as
//! diagnostics.

use super::coerce::{coerce_field, coerce_text_field, timestamp_literal};
use super::namespace::Namespaces;
use super::types::{Literal, NamedNode, RdfObject, Triple};
use super::vocab::{self, rdf, rdfs, xsd};
use crate::config::CoronaConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::metric::MetricRecord;
use thiserror::Error;
use tracing::debug;

/// Domain-namespace local names of the envelope properties
pub mod terms {
    pub const OBSERVED_FROM: &str = "observedFrom";
    pub const METRIC_IDENTIFIER: &str = "metric-identifier";
    pub const OBSERVED_AT: &str = "observedAt";
    pub const METRIC_SOURCE: &str = "metricSource";
    pub const SOURCE_ADDRESS: &str = "sourceAddress";
}

/// Mapping errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// A namespace term could not be turned into an IRI
    #[error("Invalid IRI for {field} ('{iri}'): {reason}")]
    InvalidTerm {
        field: String,
        iri: String,
        reason: String,
    },
}

pub type MappingResult<T> = Result<T, MappingError>;

/// Triples of one or more records plus the non-fatal problems met on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub triples: Vec<Triple>,
    pub diagnostics: Diagnostics,
}

/// Metric record → RDF mapper
#[derive(Debug, Clone)]
pub struct MetricToRdfMapper {
    namespaces: Namespaces,
}

impl MetricToRdfMapper {
    /// Create a mapper over the given application namespaces
    pub fn new(namespaces: Namespaces) -> Self {
        Self { namespaces }
    }

    /// Create a mapper from a validated configuration
    pub fn from_config(config: &CoronaConfig) -> Self {
        Self::new(config.namespaces())
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Project a single record
    pub fn project(&self, record: &MetricRecord) -> MappingResult<Projection> {
        let env = record.envelope();
        let subject = env.instance_uri.clone();
        let mut diagnostics = Diagnostics::new();
        let mut triples = Vec::new();
        let mut emit = |predicate: NamedNode, object: RdfObject| {
            triples.push(Triple::new(subject.clone(), predicate, object));
        };

        let class = self.domain_term("rdf:type", record.kind().class_name())?;
        emit(vocab::node(rdf::TYPE), class.into());

        if let Some(observer) = &env.observed_from {
            let object = coerce_text_field(terms::OBSERVED_FROM, observer, &mut diagnostics);
            emit(self.domain_term(terms::OBSERVED_FROM, terms::OBSERVED_FROM)?, object);
        }
        if let Some(description) = &env.description {
            emit(
                vocab::node(rdfs::COMMENT),
                Literal::new_simple_literal(description.as_str()).into(),
            );
        }
        if let Some(identifier) = &env.metric_identifier {
            emit(
                self.domain_term(terms::METRIC_IDENTIFIER, terms::METRIC_IDENTIFIER)?,
                Literal::new_typed_literal(identifier.as_str(), vocab::node(xsd::STRING)).into(),
            );
        }
        if let Some(name) = &env.metric_name {
            emit(
                vocab::node(rdfs::LABEL),
                Literal::new_simple_literal(name.as_str()).into(),
            );
        }
        emit(
            self.domain_term(terms::OBSERVED_AT, terms::OBSERVED_AT)?,
            timestamp_literal(&env.timestamp),
        );

        if let Some(source) = &env.source_entity_uri {
            match NamedNode::new(source.as_str()) {
                Ok(node) => emit(
                    self.domain_term(terms::METRIC_SOURCE, terms::METRIC_SOURCE)?,
                    node.into(),
                ),
                Err(e) => diagnostics.skipped(
                    "sourceEntityURI",
                    source.as_str(),
                    format!("{} statement omitted: {}", terms::METRIC_SOURCE, e),
                ),
            }
        } else if let Some(address) = &env.source_entity_address {
            emit(
                self.domain_term(terms::SOURCE_ADDRESS, terms::SOURCE_ADDRESS)?,
                Literal::new_simple_literal(address.as_str()).into(),
            );
        }

        for (field, value) in record.present_fields() {
            let public_name = field.public_name();
            let predicate = self
                .namespaces
                .get(field.namespace_kind())
                .term(&public_name)
                .map_err(|e| invalid_term(&public_name, e))?;
            let object = coerce_field(&public_name, value, &mut diagnostics);
            emit(predicate, object);
        }

        debug!(
            "Projected {} into {} triples",
            record.instance_uri().as_str(),
            triples.len()
        );
        Ok(Projection {
            triples,
            diagnostics,
        })
    }

    /// Project several records into one statement list
    ///
    /// Records are independent: one that fails to project is left out and
    /// reported as a `RecordSkipped` diagnostic, the rest are still emitted.
    pub fn project_batch<'a>(&self, records: impl IntoIterator<Item = &'a MetricRecord>) -> Projection {
        let mut batch = Projection::default();
        for record in records {
            match self.project(record) {
                Ok(projection) => {
                    batch.triples.extend(projection.triples);
                    batch.diagnostics.merge(projection.diagnostics);
                }
                Err(e) => batch.diagnostics.push(
                    DiagnosticKind::RecordSkipped,
                    record.instance_uri().as_str(),
                    record.kind().class_name(),
                    e.to_string(),
                ),
            }
        }
        batch
    }

    fn domain_term(&self, field: &str, local: &str) -> MappingResult<NamedNode> {
        self.namespaces
            .domain_term(local)
            .map_err(|e| invalid_term(field, e))
    }
}

fn invalid_term(field: &str, e: super::types::RdfError) -> MappingError {
    let (iri, reason) = match e {
        super::types::RdfError::InvalidIri { iri, reason } => (iri, reason),
        other => (String::new(), other.to_string()),
    };
    MappingError::InvalidTerm {
        field: field.to_string(),
        iri,
        reason,
    }
}

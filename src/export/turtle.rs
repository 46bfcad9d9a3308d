//! RDF document export (Turtle or N-Triples)

use crate::diagnostics::Diagnostics;
use crate::metric::MetricRecord;
use crate::rdf::{MetricToRdfMapper, NamespaceManager, RdfFormat, RdfSerializer, SerializeResult};

/// Projects records and serializes the combined statements
#[derive(Debug, Clone)]
pub struct RdfExporter {
    mapper: MetricToRdfMapper,
    serializer: RdfSerializer,
}

impl RdfExporter {
    pub fn new(mapper: MetricToRdfMapper) -> Self {
        let serializer = RdfSerializer::new(NamespaceManager::with_namespaces(mapper.namespaces()));
        Self { mapper, serializer }
    }

    pub fn mapper(&self) -> &MetricToRdfMapper {
        &self.mapper
    }

    /// One document for all records; records that fail to project are
    /// skipped and reported
    pub fn export(
        &self,
        records: &[MetricRecord],
        format: RdfFormat,
    ) -> SerializeResult<(String, Diagnostics)> {
        let projection = self.mapper.project_batch(records);
        let text = self.serializer.serialize(&projection.triples, format)?;
        Ok((text, projection.diagnostics))
    }
}

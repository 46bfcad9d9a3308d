//! Format exporters
//!
//! Four independent projections of the same records:
//! - RDF (Turtle or N-Triples) via the triple mapping
//! - Haystack-style tag rows (JSON array)
//! - Prometheus-style exposition text
//! - plain JSON
//!
//! [`Exporter`] bundles them behind one configuration.

pub mod haystack;
pub mod json;
pub mod prometheus;
pub mod turtle;

pub use haystack::TagRow;
pub use json::PlainRecord;
pub use prometheus::{ExpositionSample, MetricType};
pub use turtle::RdfExporter;

use crate::config::{ConfigError, CoronaConfig};
use crate::diagnostics::Diagnostics;
use crate::metric::MetricRecord;
use crate::rdf::{MetricToRdfMapper, RdfFormat, SerializeError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("RDF serialization failed: {0}")]
    Rdf(#[from] SerializeError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Turtle,
    NTriples,
    Haystack,
    Prometheus,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Turtle,
        ExportFormat::NTriples,
        ExportFormat::Haystack,
        ExportFormat::Prometheus,
        ExportFormat::Json,
    ];

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Turtle => "ttl",
            ExportFormat::NTriples => "nt",
            ExportFormat::Haystack => "haystack",
            ExportFormat::Prometheus => "prometheus",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Ok(ExportFormat::Turtle),
            "nt" | "ntriples" | "n-triples" => Ok(ExportFormat::NTriples),
            "haystack" => Ok(ExportFormat::Haystack),
            "prometheus" | "prom" => Ok(ExportFormat::Prometheus),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Rendered document plus the warnings raised while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub text: String,
    pub diagnostics: Diagnostics,
}

/// All exporters over one immutable configuration
#[derive(Debug, Clone)]
pub struct Exporter {
    rdf: RdfExporter,
    exposition_prefix: String,
}

impl Exporter {
    /// Validate the configuration and build the exporters
    pub fn new(config: &CoronaConfig) -> ExportResult<Self> {
        config.validate()?;
        Ok(Self {
            rdf: RdfExporter::new(MetricToRdfMapper::from_config(config)),
            exposition_prefix: config.exposition_prefix.clone(),
        })
    }

    pub fn mapper(&self) -> &MetricToRdfMapper {
        self.rdf.mapper()
    }

    pub fn exposition_prefix(&self) -> &str {
        &self.exposition_prefix
    }

    pub fn export(&self, records: &[MetricRecord], format: ExportFormat) -> ExportResult<ExportOutput> {
        debug!("Exporting {} records as {}", records.len(), format);
        let output = match format {
            ExportFormat::Turtle => self.rdf_document(records, RdfFormat::Turtle)?,
            ExportFormat::NTriples => self.rdf_document(records, RdfFormat::NTriples)?,
            ExportFormat::Haystack => ExportOutput {
                text: serde_json::to_string(&self.tag_rows(records))?,
                diagnostics: Diagnostics::new(),
            },
            ExportFormat::Prometheus => {
                let (samples, diagnostics) = self.samples(records);
                ExportOutput {
                    text: prometheus::render(&samples),
                    diagnostics,
                }
            }
            ExportFormat::Json => ExportOutput {
                text: serde_json::to_string_pretty(&self.plain_records(records))?,
                diagnostics: Diagnostics::new(),
            },
        };
        Ok(output)
    }

    fn rdf_document(&self, records: &[MetricRecord], format: RdfFormat) -> ExportResult<ExportOutput> {
        let (text, diagnostics) = self.rdf.export(records, format)?;
        Ok(ExportOutput { text, diagnostics })
    }

    pub fn tag_rows(&self, records: &[MetricRecord]) -> Vec<TagRow> {
        records.iter().flat_map(haystack::tag_rows).collect()
    }

    pub fn samples(&self, records: &[MetricRecord]) -> (Vec<ExpositionSample>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let samples = records
            .iter()
            .flat_map(|r| prometheus::samples(r, &self.exposition_prefix, &mut diagnostics))
            .collect();
        (samples, diagnostics)
    }

    pub fn plain_records<'a>(&self, records: &'a [MetricRecord]) -> Vec<PlainRecord<'a>> {
        records.iter().map(PlainRecord::from).collect()
    }
}

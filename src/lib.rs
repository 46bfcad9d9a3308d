//! Corona BACnet metric exporters
//!
//! Typed telemetry records from building-automation (BACnet) devices and
//! their projections into several serialization formats.
//!
//! # Components
//!
//! - [`metric`]: metric records (shared envelope plus per-variant counters)
//!   and the static field descriptor tables
//! - [`rdf`]: RDF terms, literal coercion, the record → triple mapping,
//!   Turtle / N-Triples serialization and RDFS inference
//! - [`export`]: Turtle, Haystack-style tag rows, Prometheus-style
//!   exposition text and plain JSON
//! - [`validation`]: shape-constraint validation of RDF documents
//! - [`config`]: namespaces and exposition prefix, loadable from YAML
//! - [`diagnostics`]: non-fatal conversion problems collected during export
//!
//! ## Example Usage
//!
//! ```rust
//! use corona::{CoronaConfig, ExportFormat, Exporter, MetricKind, MetricRecord};
//!
//! let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://example.com/m/router-1")
//!     .observed_from("http://example.com/device/router")
//!     .value("messagesRouted", 980)
//!     .value("bbmdEntriesCount", 7)
//!     .build()
//!     .unwrap();
//!
//! let exporter = Exporter::new(&CoronaConfig::default()).unwrap();
//! let output = exporter.export(&[record], ExportFormat::Prometheus).unwrap();
//! assert!(output.text.contains("# TYPE bacnet_messages_routed gauge"));
//! assert!(output.diagnostics.is_empty());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod diagnostics;
pub mod export;
pub mod metric;
pub mod rdf;
pub mod validation;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, CoronaConfig, NamespaceConfig};

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};

pub use export::{ExportError, ExportFormat, ExportOutput, ExportResult, Exporter};

pub use metric::{
    FieldDescriptor, FieldValue, MetricEnvelope, MetricError, MetricKind, MetricRecord,
    MetricRecordBuilder, MetricResult, ValueKind,
};

pub use rdf::{
    MetricToRdfMapper, NamedNode, NamespaceManager, Namespaces, Projection, RdfFormat,
    RdfParser, RdfSerializer, RdfsReasoner, Triple, TripleStore,
};

pub use validation::{
    validate_files, validate_turtle, CoreShapeValidator, Inference, ShapeValidator, ValidationError,
    ValidationReport, ValidationResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}

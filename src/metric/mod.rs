//! Typed BACnet metric records
//!
//! A record is a shared [`MetricEnvelope`] plus the value fields of one
//! [`MetricKind`]. Field metadata (public name, description, namespace) is
//! static per variant, see [`field`].

pub mod field;
pub mod record;
pub mod value;
pub mod variants;

pub use field::{classify_namespace, resolve, to_camel_case, FieldDescriptor, PROTOCOL_KEYWORDS};
pub use record::{MetricEnvelope, MetricRecord, MetricRecordBuilder};
pub use value::{FieldValue, ValueKind};
pub use variants::MetricKind;

use thiserror::Error;

/// Metric construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// The instance identifier is not an absolute IRI
    #[error("Invalid metric instance URI '{value}': {reason}")]
    InvalidInstanceUri { value: String, reason: String },

    /// Field not declared on the variant
    #[error("{kind} has no field named '{field}'")]
    UnknownField { kind: &'static str, field: String },

    /// Value of the wrong kind for the field
    #[error("Field '{field}' expects a {expected} value, got {found}")]
    FieldType {
        field: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },
}

pub type MetricResult<T> = Result<T, MetricError>;

//! Metric records: shared envelope plus variant value fields

use super::field::FieldDescriptor;
use super::value::{FieldValue, ValueKind};
use super::variants::MetricKind;
use super::{MetricError, MetricResult};
use crate::rdf::NamedNode;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Envelope metadata common to every variant
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEnvelope {
    /// Identity of this observation instance, always a valid absolute IRI
    pub instance_uri: NamedNode,
    /// Observing agent (IRI or plain identifier)
    pub observed_from: Option<String>,
    pub description: Option<String>,
    /// Stable identifier independent of the instance IRI
    pub metric_identifier: Option<String>,
    pub metric_name: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Observed entity; preferred over `source_entity_address`
    pub source_entity_uri: Option<String>,
    pub source_entity_address: Option<String>,
}

/// One timestamped observation
///
/// Immutable once built. Value slots line up with
/// [`MetricKind::fields`]; `None` means "not observed".
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    kind: MetricKind,
    envelope: MetricEnvelope,
    values: Vec<Option<FieldValue>>,
}

impl MetricRecord {
    /// Start building a record of the given variant
    pub fn builder(kind: MetricKind, instance_uri: impl Into<String>) -> MetricRecordBuilder {
        MetricRecordBuilder::new(kind, instance_uri)
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn envelope(&self) -> &MetricEnvelope {
        &self.envelope
    }

    pub fn instance_uri(&self) -> &NamedNode {
        &self.envelope.instance_uri
    }

    /// Value of a field by internal or public name
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        let (idx, _) = self.kind.field(key)?;
        self.values.get(idx)?.as_ref()
    }

    /// Present value fields with their descriptors, in declaration order
    pub fn present_fields(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &FieldValue)> {
        self.kind
            .fields()
            .iter()
            .zip(self.values.iter())
            .filter_map(|(field, value)| value.as_ref().map(|v| (field, v)))
    }

    /// Present value fields keyed by internal field name, in declaration order
    ///
    /// Envelope metadata is never part of this mapping.
    pub fn value_fields(&self) -> IndexMap<&'static str, &FieldValue> {
        self.present_fields()
            .map(|(field, value)| (field.name, value))
            .collect()
    }
}

/// Builder for [`MetricRecord`]
///
/// Field errors are deferred to [`MetricRecordBuilder::build`] so calls can
/// be chained.
#[derive(Debug, Clone)]
pub struct MetricRecordBuilder {
    kind: MetricKind,
    instance_uri: String,
    observed_from: Option<String>,
    description: Option<String>,
    metric_identifier: Option<String>,
    metric_name: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    source_entity_uri: Option<String>,
    source_entity_address: Option<String>,
    values: Vec<(String, FieldValue)>,
}

impl MetricRecordBuilder {
    fn new(kind: MetricKind, instance_uri: impl Into<String>) -> Self {
        Self {
            kind,
            instance_uri: instance_uri.into(),
            observed_from: None,
            description: None,
            metric_identifier: None,
            metric_name: None,
            timestamp: None,
            source_entity_uri: None,
            source_entity_address: None,
            values: Vec::new(),
        }
    }

    pub fn observed_from(mut self, observer: impl Into<String>) -> Self {
        self.observed_from = non_empty(observer.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description.into());
        self
    }

    pub fn metric_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.metric_identifier = non_empty(identifier.into());
        self
    }

    pub fn metric_name(mut self, name: impl Into<String>) -> Self {
        self.metric_name = non_empty(name.into());
        self
    }

    /// Observation time; defaults to the moment `build` is called
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn source_entity_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_entity_uri = non_empty(uri.into());
        self
    }

    pub fn source_entity_address(mut self, address: impl Into<String>) -> Self {
        self.source_entity_address = non_empty(address.into());
        self
    }

    /// Set a value field by internal or public name
    pub fn value(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.push((key.into(), value.into()));
        self
    }

    /// Validate the instance IRI and the value fields
    pub fn build(self) -> MetricResult<MetricRecord> {
        let instance_uri = NamedNode::new(self.instance_uri.clone()).map_err(|e| {
            MetricError::InvalidInstanceUri {
                value: self.instance_uri.clone(),
                reason: e.to_string(),
            }
        })?;

        let fields = self.kind.fields();
        let mut values: Vec<Option<FieldValue>> = vec![None; fields.len()];
        for (key, value) in self.values {
            let (idx, field) = self.kind.field(&key).ok_or_else(|| MetricError::UnknownField {
                kind: self.kind.class_name(),
                field: key.clone(),
            })?;
            values[idx] = Some(check_kind(field, value)?);
        }

        Ok(MetricRecord {
            kind: self.kind,
            envelope: MetricEnvelope {
                instance_uri,
                observed_from: self.observed_from,
                description: self.description,
                metric_identifier: self.metric_identifier,
                metric_name: self.metric_name,
                timestamp: self.timestamp.unwrap_or_else(Utc::now),
                source_entity_uri: self.source_entity_uri,
                source_entity_address: self.source_entity_address,
            },
            values,
        })
    }
}

fn check_kind(field: &FieldDescriptor, value: FieldValue) -> MetricResult<FieldValue> {
    match (field.kind, value) {
        (ValueKind::Float, FieldValue::Integer(i)) => Ok(FieldValue::Float(i as f64)),
        (expected, value) if value.kind() == expected => Ok(value),
        (expected, value) => Err(MetricError::FieldType {
            field: field.name,
            expected,
            found: value.kind(),
        }),
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_value_fields_in_declaration_order() {
        let record = MetricRecord::builder(MetricKind::BacnetApplication, "http://x/m/1")
            .timestamp(ts())
            .description("not a value field")
            .value("totalBroadcastsReceived", 25)
            .value("read_property_requests", 150)
            .value("whoIsRequestsSent", 3)
            .build()
            .unwrap();

        let keys: Vec<_> = record.value_fields().keys().copied().collect();
        assert_eq!(
            keys,
            vec!["read_property_requests", "who_is_requests_sent", "total_broadcasts_received"]
        );
        assert_eq!(record.value("readPropertyRequests"), Some(&FieldValue::Integer(150)));
        assert_eq!(record.value("readPropertyResponses"), None);
    }

    #[test]
    fn test_no_values_means_empty_mapping() {
        let record = MetricRecord::builder(MetricKind::CovNotification, "http://x/m/2")
            .observed_from("agent")
            .metric_identifier("cov_1")
            .build()
            .unwrap();
        assert!(record.value_fields().is_empty());
    }

    #[test]
    fn test_invalid_instance_uri_names_value() {
        let err = MetricRecord::builder(MetricKind::RouterBbmd, "not a uri")
            .build()
            .unwrap_err();
        match err {
            MetricError::InvalidInstanceUri { value, .. } => assert_eq!(value, "not a uri"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_field_and_type_mismatch() {
        let err = MetricRecord::builder(MetricKind::CovNotification, "http://x/m/3")
            .value("messagesRouted", 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, MetricError::UnknownField { .. }));

        let err = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/3")
            .value("messagesRouted", "lots")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            MetricError::FieldType { field: "messages_routed", expected: ValueKind::Integer, found: ValueKind::Text }
        ));
    }

    #[test]
    fn test_empty_envelope_strings_are_absent() {
        let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/4")
            .source_entity_uri("")
            .source_entity_address("10.0.0.2")
            .build()
            .unwrap();
        assert_eq!(record.envelope().source_entity_uri, None);
        assert_eq!(record.envelope().source_entity_address.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_timestamp_defaults_to_now() {
        let before = Utc::now();
        let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/5")
            .build()
            .unwrap();
        assert!(record.envelope().timestamp >= before);
    }
}

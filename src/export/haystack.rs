//! Haystack-style tag rows

use crate::metric::{FieldValue, MetricRecord};
use chrono::SecondsFormat;
use serde::Serialize;

/// One (record, value field) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRow {
    /// `@<entity uri>`, `@addr_<address>` or `@unknown`
    pub entity: String,
    /// Public field name
    pub metric: String,
    /// Raw, uncoerced value
    pub val: FieldValue,
    pub ts: String,
    pub observer: Option<String>,
    #[serde(rename = "metricId")]
    pub metric_id: Option<String>,
}

/// Entity reference shared by every row of a record
pub fn entity_ref(record: &MetricRecord) -> String {
    let env = record.envelope();
    match (&env.source_entity_uri, &env.source_entity_address) {
        (Some(uri), _) => format!("@{}", uri),
        (None, Some(address)) => format!("@addr_{}", address),
        (None, None) => "@unknown".to_string(),
    }
}

/// Rows for every present value field, in declaration order
pub fn tag_rows(record: &MetricRecord) -> Vec<TagRow> {
    let env = record.envelope();
    let entity = entity_ref(record);
    let ts = env.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true);

    record
        .present_fields()
        .map(|(field, value)| TagRow {
            entity: entity.clone(),
            metric: field.public_name().into_owned(),
            val: value.clone(),
            ts: ts.clone(),
            observer: env.observed_from.clone(),
            metric_id: env.metric_identifier.clone(),
        })
        .collect()
}

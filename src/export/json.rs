//! Plain JSON: one flat object per record

use crate::metric::{FieldValue, MetricRecord};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Flat view of a record; absent fields are left out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainRecord<'a> {
    pub metric_instance_uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_identifier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<&'a str>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_entity_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_entity_address: Option<&'a str>,
    /// Value fields by internal name, in declaration order
    #[serde(flatten)]
    pub values: IndexMap<&'static str, &'a FieldValue>,
}

impl<'a> From<&'a MetricRecord> for PlainRecord<'a> {
    fn from(record: &'a MetricRecord) -> Self {
        let env = record.envelope();
        Self {
            metric_instance_uri: env.instance_uri.as_str(),
            observed_from: env.observed_from.as_deref(),
            description: env.description.as_deref(),
            metric_identifier: env.metric_identifier.as_deref(),
            metric_name: env.metric_name.as_deref(),
            timestamp: env.timestamp,
            source_entity_uri: env.source_entity_uri.as_deref(),
            source_entity_address: env.source_entity_address.as_deref(),
            values: record.value_fields(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MetricKind;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_flat_object_without_absent_fields() {
        let record = MetricRecord::builder(MetricKind::CovNotification, "http://x/m/cov")
            .observed_from("demoAgent")
            .timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
            .value("unconfirmedCOVNotificationsSent", 600)
            .value("confirmed_cov_notifications_received", 30)
            .build()
            .unwrap();

        let value = serde_json::to_value(PlainRecord::from(&record)).unwrap();
        assert_eq!(
            value,
            json!({
                "metric_instance_uri": "http://x/m/cov",
                "observed_from": "demoAgent",
                "timestamp": "2024-05-06T12:00:00Z",
                "unconfirmed_cov_notifications_sent": 600,
                "confirmed_cov_notifications_received": 30
            })
        );
    }

    #[test]
    fn test_key_order_is_envelope_then_declaration_order() {
        let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/r")
            .timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
            .value("bbmdEntriesCount", 12)
            .value("messagesRouted", 15000)
            .build()
            .unwrap();
        let text = serde_json::to_string(&PlainRecord::from(&record)).unwrap();
        assert_eq!(
            text,
            r#"{"metric_instance_uri":"http://x/m/r","timestamp":"2024-05-06T12:00:00Z","messages_routed":15000,"bbmd_entries_count":12}"#
        );
    }
}

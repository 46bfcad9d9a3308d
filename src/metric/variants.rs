//! The closed set of metric variants and their field tables

use super::field::FieldDescriptor;
use super::value::ValueKind;
use serde::{Deserialize, Serialize};
use std::fmt;

const fn counter(name: &'static str, alias: &'static str, description: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, ValueKind::Integer)
        .alias(alias)
        .description(description)
}

static BACNET_APPLICATION_FIELDS: [FieldDescriptor; 16] = [
    counter("read_property_requests", "readPropertyRequests", "Total number of ReadProperty requests sent."),
    counter("read_property_responses", "readPropertyResponses", "Total number of ReadProperty responses received."),
    counter("who_is_requests_sent", "whoIsRequestsSent", "Total number of Who-Is requests sent."),
    counter("global_who_is_requests_sent", "globalWhoIsRequestsSent", "Number of global Who-Is requests sent."),
    counter("directed_who_is_requests_sent", "directedWhoIsRequestsSent", "Number of directed Who-Is requests sent."),
    counter("who_has_requests_sent", "whoHasRequestsSent", "Total number of Who-Has requests sent."),
    counter("global_who_has_requests_sent", "globalWhoHasRequestsSent", "Number of global WhoHas requests sent."),
    counter("directed_who_has_requests_sent", "directedWhoHasRequestsSent", "Number of directed WhoHas requests sent."),
    counter("i_am_responses_sent", "iAmResponsesSent", "Total number of I-am responses sent."),
    counter("i_am_responses_received", "iAmResponsesReceived", "Total number of I-am responses received."),
    counter("i_have_responses_sent", "iHaveResponsesSent", "Total number of I-Have responses sent."),
    counter("i_have_responses_received", "iHaveResponsesReceived", "Total number of I-Have responses received."),
    counter("total_bacnet_messages_sent", "totalBACnetMessagesSent", "Total number of BACnet messages sent by this device."),
    counter("total_bacnet_messages_received", "totalBACnetMessagesReceived", "Total number of BACnet messages received by this device."),
    counter("total_broadcasts_sent", "totalBroadcastsSent", "Total number of broadcast messages (any type) sent by this device."),
    counter("total_broadcasts_received", "totalBroadcastsReceived", "Total number of broadcast messages (any type) received by this device."),
];

static COV_NOTIFICATION_FIELDS: [FieldDescriptor; 4] = [
    counter("unconfirmed_cov_notifications_sent", "unconfirmedCOVNotificationsSent", "Total number of unconfirmed COV notifications sent."),
    counter("confirmed_cov_notifications_sent", "confirmedCOVNotificationsSent", "Total number of confirmed COV notifications sent."),
    counter("unconfirmed_cov_notifications_received", "unconfirmedCOVNotificationsReceived", "Total number of unconfirmed COV notifications received."),
    counter("confirmed_cov_notifications_received", "confirmedCOVNotificationsReceived", "Total number of confirmed COV notifications received."),
];

static ROUTER_BBMD_FIELDS: [FieldDescriptor; 8] = [
    counter("messages_routed", "messagesRouted", "Total number of messages routed by this device acting as a router."),
    counter("messages_forwarded", "messagesForwarded", "Total number of messages forwarded by this device acting as a BBMD."),
    counter("routed_messages_sent", "routedMessagesSent", "Total number of messages routed and sent to other networks."),
    counter("routed_messages_received", "routedMessagesReceived", "Total number of messages received that were routed from other networks."),
    FieldDescriptor::new("routed_via", ValueKind::Text)
        .description("Identifier (URI) of the router/gateway device."),
    counter("routed_devices_seen", "routedDevicesSeen", "Number of unique devices on other networks seen through routing."),
    counter("bbmd_entries_count", "bbmdEntriesCount", "Number of entries in the BBMD table."),
    counter("foreign_device_registrations", "foreignDeviceRegistrations", "Number of currently registered foreign devices."),
];

/// Metric variant, one per device role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Application-layer request/response/broadcast counters
    BacnetApplication,
    /// Change-of-Value notification counters
    CovNotification,
    /// Router / BBMD forwarding and registration counters
    RouterBbmd,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [
        MetricKind::BacnetApplication,
        MetricKind::CovNotification,
        MetricKind::RouterBbmd,
    ];

    /// Local name of the RDF class for this variant
    pub fn class_name(&self) -> &'static str {
        match self {
            MetricKind::BacnetApplication => "BacnetApplicationMetric",
            MetricKind::CovNotification => "COVNotificationMetric",
            MetricKind::RouterBbmd => "RouterBBMDMetric",
        }
    }

    /// Value fields in declaration order
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        match self {
            MetricKind::BacnetApplication => &BACNET_APPLICATION_FIELDS,
            MetricKind::CovNotification => &COV_NOTIFICATION_FIELDS,
            MetricKind::RouterBbmd => &ROUTER_BBMD_FIELDS,
        }
    }

    /// Look up a field by internal or public name
    pub fn field(&self, key: &str) -> Option<(usize, &'static FieldDescriptor)> {
        self.fields().iter().enumerate().find(|(_, f)| f.matches(key))
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::NamespaceKind;
    use std::collections::HashSet;

    #[test]
    fn test_field_tables_have_unique_public_names() {
        for kind in MetricKind::ALL {
            let names: HashSet<_> = kind.fields().iter().map(|f| f.public_name()).collect();
            assert_eq!(names.len(), kind.fields().len(), "{kind}");
        }
    }

    #[test]
    fn test_lookup_by_name_or_alias() {
        let kind = MetricKind::RouterBbmd;
        assert_eq!(kind.field("messages_routed").map(|(i, _)| i), Some(0));
        assert_eq!(kind.field("bbmdEntriesCount").map(|(i, _)| i), Some(6));
        assert_eq!(kind.field("routedVia").map(|(i, _)| i), Some(4));
        assert!(kind.field("readPropertyRequests").is_none());
    }

    #[test]
    fn test_namespace_assignment_of_tables() {
        let app = MetricKind::BacnetApplication;
        let ns = |key: &str| app.field(key).map(|(_, f)| f.namespace_kind());
        assert_eq!(ns("readPropertyRequests"), Some(NamespaceKind::Protocol));
        assert_eq!(ns("totalBACnetMessagesSent"), Some(NamespaceKind::Protocol));
        assert_eq!(ns("totalBroadcastsSent"), Some(NamespaceKind::Domain));

        let router = MetricKind::RouterBbmd;
        let (_, via) = router.field("routed_via").unwrap();
        assert_eq!(via.public_name(), "routedVia");
        assert_eq!(via.namespace_kind(), NamespaceKind::Protocol);
    }

    #[test]
    fn test_class_names() {
        assert_eq!(MetricKind::CovNotification.class_name(), "COVNotificationMetric");
        assert_eq!(MetricKind::RouterBbmd.to_string(), "RouterBBMDMetric");
    }
}

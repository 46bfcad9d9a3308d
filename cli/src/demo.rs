//! Sample records for `corona generate`

use chrono::{DateTime, Utc};
use corona::{MetricKind, MetricRecord, MetricResult};

const OBSERVER: &str = "http://example.com/observer/demoAgent";

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoKind {
    App,
    Cov,
    Router,
    All,
}

pub fn records(kind: DemoKind, now: DateTime<Utc>) -> MetricResult<Vec<MetricRecord>> {
    match kind {
        DemoKind::App => Ok(vec![bacnet_application(now)?]),
        DemoKind::Cov => Ok(vec![cov_notification(now)?]),
        DemoKind::Router => Ok(vec![router_bbmd(now)?]),
        DemoKind::All => Ok(vec![bacnet_application(now)?, cov_notification(now)?, router_bbmd(now)?]),
    }
}

fn bacnet_application(now: DateTime<Utc>) -> MetricResult<MetricRecord> {
    MetricRecord::builder(
        MetricKind::BacnetApplication,
        "http://example.com/metricInstance/bacnetApp/devDemo/1715000000",
    )
    .source_entity_uri("http://example.com/device/bacnetDeviceDemo")
    .source_entity_address("192.168.1.200")
    .observed_from(OBSERVER)
    .description("Sample BACnet application metrics for Demo Device")
    .metric_identifier("bacnet_app_demo")
    .metric_name("BACnet App Stats (Demo)")
    .timestamp(now)
    .value("readPropertyRequests", 250)
    .value("readPropertyResponses", 245)
    .value("who_is_requests_sent", 15)
    .value("global_who_is_requests_sent", 10)
    .value("directed_who_is_requests_sent", 5)
    .value("i_am_responses_received", 8)
    .value("total_bacnet_messages_sent", 300)
    .value("total_broadcasts_received", 25)
    .build()
}

fn cov_notification(now: DateTime<Utc>) -> MetricResult<MetricRecord> {
    MetricRecord::builder(
        MetricKind::CovNotification,
        "http://example.com/metricInstance/cov/devDemo/1715000100",
    )
    .source_entity_uri("http://example.com/device/bacnetDeviceDemo")
    .source_entity_address("192.168.1.200")
    .observed_from(OBSERVER)
    .description("Sample COV metrics for Demo Device")
    .metric_identifier("cov_demo")
    .metric_name("COV Stats (Demo)")
    .timestamp(now)
    .value("unconfirmed_cov_notifications_sent", 600)
    .value("confirmed_cov_notifications_received", 30)
    .build()
}

fn router_bbmd(now: DateTime<Utc>) -> MetricResult<MetricRecord> {
    MetricRecord::builder(
        MetricKind::RouterBbmd,
        "http://example.com/metricInstance/router/gwDemo/1715000200",
    )
    .source_entity_uri("http://example.com/device/gatewayDemo")
    .source_entity_address("10.0.0.2")
    .observed_from(OBSERVER)
    .description("Sample Router/BBMD metrics for Demo Gateway")
    .metric_identifier("router_demo")
    .metric_name("Router/BBMD Stats (Demo)")
    .timestamp(now)
    .value("messages_routed", 15000)
    .value("messages_forwarded", 750)
    .value("routed_devices_seen", 30)
    .value("bbmd_entries_count", 12)
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_demo_records_build() {
        let records = records(DemoKind::All, Utc::now()).unwrap();
        let kinds: Vec<MetricKind> = records.iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, MetricKind::ALL.to_vec());
        assert_eq!(records[0].present_fields().count(), 8);
    }
}

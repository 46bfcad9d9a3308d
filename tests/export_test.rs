use chrono::{TimeZone, Utc};
use corona::diagnostics::DiagnosticKind;
use corona::export::PlainRecord;
use corona::rdf::{Literal, RdfFormat, RdfObject, RdfParser};
use corona::{
    CoronaConfig, ExportFormat, Exporter, FieldValue, MetricKind, MetricRecord, MetricToRdfMapper,
    NamedNode, Triple,
};
use std::collections::HashSet;

const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

fn mapper() -> MetricToRdfMapper {
    MetricToRdfMapper::from_config(&CoronaConfig::default())
}

fn app_record(uri: &str) -> MetricRecord {
    MetricRecord::builder(MetricKind::BacnetApplication, uri)
        .timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
        .value("readPropertyRequests", 150)
        .value("who_is_requests_sent", 15)
        .value("total_broadcasts_received", 25)
        .build()
        .unwrap()
}

#[test]
fn test_single_counter_projection() {
    let record = MetricRecord::builder(MetricKind::BacnetApplication, "http://x/m/1")
        .timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
        .value("readPropertyRequests", 150)
        .build()
        .unwrap();

    let projection = mapper().project(&record).unwrap();
    assert_eq!(projection.triples.len(), 3);
    assert!(projection.diagnostics.is_empty());

    let expected = Triple::new(
        NamedNode::new("http://x/m/1").unwrap(),
        NamedNode::new("http://example.com/bacnet#readPropertyRequests").unwrap(),
        Literal::new_typed_literal("150", NamedNode::new(XSD_INTEGER).unwrap()),
    );
    assert_eq!(projection.triples[2], expected);

    let observed_at = &projection.triples[1];
    assert_eq!(observed_at.predicate.as_str(), "http://example.com/corona#observedAt");
    assert_eq!(
        observed_at.object.as_literal().map(|l| l.value()),
        Some("2024-05-06T12:00:00Z")
    );
}

#[test]
fn test_invalid_source_uri_is_skipped() {
    let record = MetricRecord::builder(MetricKind::BacnetApplication, "http://x/m/1")
        .source_entity_uri("not a uri")
        .source_entity_address("192.168.1.200")
        .metric_name("App stats")
        .value("readPropertyRequests", 150)
        .build()
        .unwrap();

    let projection = mapper().project(&record).unwrap();
    assert_eq!(projection.diagnostics.len(), 1);
    assert_eq!(projection.diagnostics.count(DiagnosticKind::SkippedStatement), 1);

    let predicates: Vec<&str> = projection.triples.iter().map(|t| t.predicate.as_str()).collect();
    assert!(!predicates.contains(&"http://example.com/corona#metricSource"));
    assert!(!predicates.contains(&"http://example.com/corona#sourceAddress"));
    assert!(predicates.contains(&"http://www.w3.org/2000/01/rdf-schema#label"));
    assert!(predicates.contains(&"http://example.com/bacnet#readPropertyRequests"));
    assert_eq!(projection.triples.len(), 4);
}

#[test]
fn test_exposition_name_without_counter_suffix() {
    let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/r")
        .value("messagesRouted", 15000)
        .build()
        .unwrap();
    let exporter = Exporter::new(&CoronaConfig::default()).unwrap();
    let (samples, diagnostics) = exporter.samples(std::slice::from_ref(&record));

    assert!(diagnostics.is_empty());
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].name, "bacnet_messages_routed");

    let text = exporter.export(&[record], ExportFormat::Prometheus).unwrap().text;
    let sample_line = text.lines().nth(2).unwrap();
    assert!(sample_line.starts_with("bacnet_messages_routed 15000.0 "));
}

#[test]
fn test_batch_is_disjoint_union() {
    let first = app_record("http://x/m/1");
    let second = app_record("http://x/m/2");
    let mapper = mapper();

    let a: HashSet<Triple> = mapper.project(&first).unwrap().triples.into_iter().collect();
    let b: HashSet<Triple> = mapper.project(&second).unwrap().triples.into_iter().collect();
    assert!(a.is_disjoint(&b));

    let batch = mapper.project_batch([&first, &second]);
    let union: HashSet<Triple> = batch.triples.iter().cloned().collect();
    assert_eq!(batch.triples.len(), a.len() + b.len());
    assert_eq!(union, a.union(&b).cloned().collect());
}

#[test]
fn test_numeric_tokens_reparse() {
    let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/r")
        .value("messagesRouted", 15000)
        .value("routed_via", "gw-7")
        .value("bbmdEntriesCount", 12)
        .build()
        .unwrap();
    let exporter = Exporter::new(&CoronaConfig::default()).unwrap();
    let output = exporter.export(std::slice::from_ref(&record), ExportFormat::Prometheus).unwrap();

    let tokens: Vec<&str> = output
        .text
        .lines()
        .filter(|l| !l.starts_with('#') && !l.is_empty())
        .map(|l| l.split(' ').nth(1).unwrap())
        .collect();
    assert_eq!(tokens, vec!["15000.0", "0.0", "12.0"]);
    for (token, (_, value)) in tokens.iter().zip(record.present_fields()) {
        let expected = value.to_f64().unwrap_or(0.0);
        assert_eq!(token.parse::<f64>().unwrap(), expected);
    }
    assert_eq!(output.diagnostics.count(DiagnosticKind::DegradedField), 1);
}

#[test]
fn test_uri_strings_become_references() {
    let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/r")
        .observed_from("http://example.com/observer/demoAgent")
        .value("routed_via", "gateway-7")
        .build()
        .unwrap();
    let projection = mapper().project(&record).unwrap();

    let object = |predicate: &str| {
        projection
            .triples
            .iter()
            .find(|t| t.predicate.as_str() == predicate)
            .map(|t| t.object.clone())
            .unwrap()
    };
    assert!(matches!(object("http://example.com/corona#observedFrom"), RdfObject::NamedNode(_)));
    assert!(matches!(object("http://example.com/bacnet#routedVia"), RdfObject::Literal(_)));
}

#[test]
fn test_exports_are_idempotent() {
    let exporter = Exporter::new(&CoronaConfig::default()).unwrap();
    let records = vec![app_record("http://x/m/1"), app_record("http://x/m/2")];
    for format in ExportFormat::ALL {
        let first = exporter.export(&records, format).unwrap();
        let second = exporter.export(&records, format).unwrap();
        assert_eq!(first.text, second.text, "{format}");
    }
    assert_eq!(exporter.tag_rows(&records), exporter.tag_rows(&records));
}

#[test]
fn test_tag_rows_and_plain_json() {
    let record = MetricRecord::builder(MetricKind::CovNotification, "http://x/m/c")
        .source_entity_address("192.168.1.200")
        .metric_identifier("cov_demo")
        .timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
        .value("unconfirmed_cov_notifications_sent", 600)
        .value("confirmed_cov_notifications_received", 30)
        .build()
        .unwrap();
    let exporter = Exporter::new(&CoronaConfig::default()).unwrap();

    let rows = exporter.tag_rows(std::slice::from_ref(&record));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].entity, "@addr_192.168.1.200");
    assert_eq!(rows[0].metric, "unconfirmedCOVNotificationsSent");
    assert_eq!(rows[0].val, FieldValue::Integer(600));
    assert_eq!(rows[1].metric_id.as_deref(), Some("cov_demo"));

    let text = exporter.export(std::slice::from_ref(&record), ExportFormat::Haystack).unwrap().text;
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[1]["val"], 30);
    assert_eq!(parsed[1]["metricId"], "cov_demo");

    let plain = PlainRecord::from(&record);
    let json = serde_json::to_value(&plain).unwrap();
    assert_eq!(json["metric_instance_uri"], "http://x/m/c");
    assert_eq!(json["unconfirmed_cov_notifications_sent"], 600);
    assert!(json.get("description").is_none());
}

#[test]
fn test_turtle_with_non_name_characters_parses_back() {
    let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://example.com/corona#m²")
        .timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
        .value("messagesRouted", 15000)
        .build()
        .unwrap();
    let exporter = Exporter::new(&CoronaConfig::default()).unwrap();
    let text = exporter
        .export(std::slice::from_ref(&record), ExportFormat::Turtle)
        .unwrap()
        .text;
    assert!(!text.contains("corona:m²"));

    let parsed = RdfParser::parse(&text, RdfFormat::Turtle).unwrap();
    assert_eq!(parsed, mapper().project(&record).unwrap().triples);
}

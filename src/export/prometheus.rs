//! Prometheus-style exposition text
//!
//! Each present value field becomes a block of `# HELP`, `# TYPE` and one
//! sample line. Blocks are separated by a blank line.
//!
//! The counter/gauge split is a substring heuristic ([`COUNTER_KEYWORDS`])
//! over the snake_case field name, tied to the current field names. A new
//! field whose name contains none of the keywords is exported as a gauge
//! with no `_total` suffix (`messagesRouted` → `bacnet_messages_routed`).

use crate::diagnostics::Diagnostics;
use crate::metric::MetricRecord;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Names containing one of these get the `_total` counter suffix
pub const COUNTER_KEYWORDS: [&str; 7] = [
    "requests",
    "responses",
    "count",
    "sent",
    "received",
    "total",
    "number",
];

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("invalid regex"));
static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("invalid regex"));
static LABEL_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("invalid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricType::Counter => f.write_str("counter"),
            MetricType::Gauge => f.write_str("gauge"),
        }
    }
}

/// One exposition block
#[derive(Debug, Clone, PartialEq)]
pub struct ExpositionSample {
    pub name: String,
    /// Escaped help text
    pub help: String,
    pub metric_type: MetricType,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
    pub timestamp_ms: i64,
}

impl fmt::Display for ExpositionSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# HELP {} {}", self.name, self.help)?;
        writeln!(f, "# TYPE {} {}", self.name, self.metric_type)?;
        write!(f, "{}", self.name)?;
        if !self.labels.is_empty() {
            let pairs: Vec<String> = self
                .labels
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
                .collect();
            write!(f, "{{{}}}", pairs.join(","))?;
        }
        writeln!(f, " {} {}", sample_token(self.value), self.timestamp_ms)
    }
}

/// Exposition metric name for a public field name
///
/// camelCase → snake_case, lowercased, prefixed with `prefix_`, plus
/// `_total` when the snake_case name contains a counter keyword.
pub fn metric_name(public_name: &str, prefix: &str) -> String {
    let spaced = WORD_BOUNDARY.replace_all(public_name, "${1}_${2}");
    let snake = CASE_BOUNDARY.replace_all(&spaced, "${1}_${2}").to_lowercase();
    let suffix = if COUNTER_KEYWORDS.iter().any(|kw| snake.contains(kw)) {
        "_total"
    } else {
        ""
    };
    format!("{}_{}{}", prefix, snake, suffix)
}

pub fn metric_type(name: &str) -> MetricType {
    if name.ends_with("_total") {
        MetricType::Counter
    } else {
        MetricType::Gauge
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`
pub fn sanitize_label(value: &str) -> String {
    LABEL_UNSAFE.replace_all(value, "_").into_owned()
}

/// Label set shared by every sample of a record; empty values are dropped
pub fn labels(record: &MetricRecord) -> Vec<(&'static str, String)> {
    let env = record.envelope();
    [
        ("entity_uri", env.source_entity_uri.as_deref().map(sanitize_label)),
        ("address", env.source_entity_address.clone()),
        ("observer", env.observed_from.as_deref().map(sanitize_label)),
        ("metric_id", env.metric_identifier.clone()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
    .collect()
}

/// Samples for every present value field
///
/// Values without a numeric form are exported as `0.0` and reported.
pub fn samples(record: &MetricRecord, prefix: &str, diagnostics: &mut Diagnostics) -> Vec<ExpositionSample> {
    let env = record.envelope();
    let labels = labels(record);
    let timestamp_ms = env.timestamp.timestamp_millis();

    record
        .present_fields()
        .map(|(field, value)| {
            let public_name = field.public_name();
            let name = metric_name(&public_name, prefix);
            let help = field
                .description
                .or(env.description.as_deref())
                .unwrap_or(public_name.as_ref());
            let value = value.to_f64().unwrap_or_else(|| {
                diagnostics.degraded(
                    public_name.as_ref(),
                    value.to_string(),
                    format!("no numeric value for {}, exported as 0.0", name),
                );
                0.0
            });
            ExpositionSample {
                metric_type: metric_type(&name),
                help: escape_help(help),
                name,
                labels: labels.clone(),
                value,
                timestamp_ms,
            }
        })
        .collect()
}

/// Render blocks separated by a blank line
pub fn render(samples: &[ExpositionSample]) -> String {
    samples
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_help(text: &str) -> String {
    text.replace('\n', " ").replace('"', "\\\"")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn sample_token(value: f64) -> String {
    if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{:?}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MetricKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_metric_names() {
        assert_eq!(metric_name("messagesRouted", "bacnet"), "bacnet_messages_routed");
        assert_eq!(metric_name("readPropertyRequests", "bacnet"), "bacnet_read_property_requests_total");
        assert_eq!(metric_name("bbmdEntriesCount", "bacnet"), "bacnet_bbmd_entries_count_total");
        assert_eq!(metric_name("routedVia", "bacnet"), "bacnet_routed_via");
        assert_eq!(metric_name("iAmResponsesSent", "x"), "x_i_am_responses_sent_total");
        assert_eq!(
            metric_name("totalBACnetMessagesSent", "bacnet"),
            "bacnet_total_ba_cnet_messages_sent_total"
        );
    }

    #[test]
    fn test_metric_type_follows_suffix() {
        assert_eq!(metric_type("bacnet_messages_routed"), MetricType::Gauge);
        assert_eq!(metric_type("bacnet_routed_messages_sent_total"), MetricType::Counter);
    }

    #[test]
    fn test_labels_sanitized_and_ordered() {
        let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/1")
            .source_entity_uri("http://example.com/device/gw1")
            .source_entity_address("10.0.0.2")
            .observed_from("demo-agent")
            .metric_identifier("router_demo")
            .build()
            .unwrap();
        assert_eq!(
            labels(&record),
            vec![
                ("entity_uri", "http___example_com_device_gw1".to_string()),
                ("address", "10.0.0.2".to_string()),
                ("observer", "demo_agent".to_string()),
                ("metric_id", "router_demo".to_string()),
            ]
        );
    }

    #[test]
    fn test_block_rendering() {
        let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/1")
            .timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
            .value("messagesRouted", 15000)
            .value("bbmdEntriesCount", 12)
            .build()
            .unwrap();
        let mut diags = Diagnostics::new();
        let text = render(&samples(&record, "bacnet", &mut diags));
        let expected = "\
# HELP bacnet_messages_routed Total number of messages routed by this device acting as a router.
# TYPE bacnet_messages_routed gauge
bacnet_messages_routed 15000.0 1714996800000

# HELP bacnet_bbmd_entries_count_total Number of entries in the BBMD table.
# TYPE bacnet_bbmd_entries_count_total counter
bacnet_bbmd_entries_count_total 12.0 1714996800000
";
        assert_eq!(text, expected);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_non_numeric_value_becomes_zero() {
        let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/1")
            .description("Router \"A\"\nsecond line")
            .value("routed_via", "http://example.com/device/gw1")
            .build()
            .unwrap();
        let mut diags = Diagnostics::new();
        let samples = samples(&record, "bacnet", &mut diags);
        assert_eq!(samples[0].value, 0.0);
        assert_eq!(diags.len(), 1);
        let line = samples[0].to_string();
        assert!(line.lines().nth(2).unwrap().starts_with("bacnet_routed_via 0.0 "));
        // field description wins over the record description
        assert_eq!(samples[0].help, "Identifier (URI) of the router/gateway device.");
    }

    #[test]
    fn test_label_values_are_escaped() {
        let record = MetricRecord::builder(MetricKind::RouterBbmd, "http://x/m/1")
            .timestamp(Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap())
            .source_entity_address("gw \"north\"\\rack\n2")
            .value("messagesRouted", 1)
            .build()
            .unwrap();
        let mut diags = Diagnostics::new();
        let text = render(&samples(&record, "bacnet", &mut diags));
        let line = text.lines().nth(2).unwrap();
        assert_eq!(
            line,
            r#"bacnet_messages_routed{address="gw \"north\"\\rack\n2"} 1.0 1714996800000"#
        );
    }

    #[test]
    fn test_help_escaping() {
        assert_eq!(escape_help("Router \"A\"\nsecond"), "Router \\\"A\\\" second");
    }
}

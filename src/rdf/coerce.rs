//! Native value → RDF term coercion
//!
//! Rules, first match wins: booleans → `xsd:boolean`, integers →
//! `xsd:integer`, floats → `xsd:float`, timestamps → `xsd:dateTime` at
//! second precision, text that looks like an absolute IRI → IRI reference,
//! any other text → plain string literal. Coercion never fails; text that
//! looks like an IRI but does not parse falls back to a string literal.

use super::types::{Literal, NamedNode, RdfError, RdfObject};
use super::vocab::{self, xsd};
use crate::diagnostics::Diagnostics;
use crate::metric::FieldValue;
use chrono::{DateTime, SecondsFormat, Utc};

/// Text that looked like an IRI but failed to parse as one
#[derive(Debug, Clone, PartialEq)]
pub struct UriFallback {
    /// The string literal used instead
    pub literal: Literal,
    pub error: RdfError,
}

/// True if `value` carries a recognizable scheme
///
/// Either an `http(s)://` prefix, or a `:` before the first `://`
/// (which catches `urn:`, `mailto:` and the like).
pub fn looks_like_uri(value: &str) -> bool {
    value.starts_with("http://")
        || value.starts_with("https://")
        || value
            .split("://")
            .next()
            .is_some_and(|head| head.contains(':'))
}

/// Coerce a field value, reporting failed IRI parses to the caller
pub fn coerce_checked(value: &FieldValue) -> Result<RdfObject, UriFallback> {
    match value {
        FieldValue::Boolean(b) => Ok(typed(b.to_string(), xsd::BOOLEAN)),
        FieldValue::Integer(i) => Ok(typed(i.to_string(), xsd::INTEGER)),
        FieldValue::Float(f) => Ok(typed(float_lexical(*f), xsd::FLOAT)),
        FieldValue::Timestamp(ts) => Ok(timestamp_literal(ts)),
        FieldValue::Text(s) => coerce_text(s),
    }
}

/// Coerce a string following the text rule alone
pub fn coerce_text(value: &str) -> Result<RdfObject, UriFallback> {
    if !looks_like_uri(value) {
        return Ok(Literal::new_simple_literal(value).into());
    }
    NamedNode::new(value)
        .map(RdfObject::from)
        .map_err(|error| UriFallback {
            literal: Literal::new_simple_literal(value),
            error,
        })
}

/// Total coercion; IRI parse failures silently become string literals
pub fn coerce(value: &FieldValue) -> RdfObject {
    coerce_checked(value).unwrap_or_else(|fallback| fallback.literal.into())
}

/// Coerce a named field, recording a degraded-field diagnostic on fallback
pub fn coerce_field(field: &str, value: &FieldValue, diagnostics: &mut Diagnostics) -> RdfObject {
    coerce_checked(value).unwrap_or_else(|fallback| degrade(field, fallback, diagnostics))
}

/// Like [`coerce_field`] for envelope strings
pub fn coerce_text_field(field: &str, value: &str, diagnostics: &mut Diagnostics) -> RdfObject {
    coerce_text(value).unwrap_or_else(|fallback| degrade(field, fallback, diagnostics))
}

/// `xsd:dateTime` literal truncated to whole seconds
pub fn timestamp_literal(ts: &DateTime<Utc>) -> RdfObject {
    typed(ts.to_rfc3339_opts(SecondsFormat::Secs, true), xsd::DATE_TIME)
}

fn degrade(field: &str, fallback: UriFallback, diagnostics: &mut Diagnostics) -> RdfObject {
    diagnostics.degraded(
        field,
        fallback.literal.value(),
        format!("not a valid IRI, emitted as string literal: {}", fallback.error),
    );
    fallback.literal.into()
}

fn typed(lexical: String, datatype: &'static str) -> RdfObject {
    Literal::new_typed_literal(lexical, vocab::node(datatype)).into()
}

// xsd:float lexical space: INF / -INF / NaN, otherwise a decimal with a point
fn float_lexical(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "INF".to_string()
    } else if f == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{:?}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn literal(obj: RdfObject) -> (String, String) {
        let lit = obj.as_literal().expect("literal");
        (lit.value().to_string(), lit.datatype().as_str().to_string())
    }

    #[test]
    fn test_scalar_datatypes() {
        let (v, dt) = literal(coerce(&FieldValue::Boolean(true)));
        assert_eq!((v.as_str(), dt.as_str()), ("true", xsd::BOOLEAN));

        let (v, dt) = literal(coerce(&FieldValue::Integer(150)));
        assert_eq!((v.as_str(), dt.as_str()), ("150", xsd::INTEGER));

        let (v, dt) = literal(coerce(&FieldValue::Float(250.0)));
        assert_eq!((v.as_str(), dt.as_str()), ("250.0", xsd::FLOAT));

        let (v, _) = literal(coerce(&FieldValue::Float(f64::NEG_INFINITY)));
        assert_eq!(v, "-INF");
    }

    #[test]
    fn test_timestamp_truncated_to_seconds() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 6, 12, 30, 15).unwrap()
            + chrono::Duration::milliseconds(789);
        let (v, dt) = literal(coerce(&FieldValue::Timestamp(ts)));
        assert_eq!(v, "2024-05-06T12:30:15Z");
        assert_eq!(dt, xsd::DATE_TIME);
    }

    #[test]
    fn test_uri_detection() {
        assert!(looks_like_uri("http://example.com/device/1"));
        assert!(looks_like_uri("https://example.com"));
        assert!(looks_like_uri("urn:corona:agent:1"));
        assert!(!looks_like_uri("demoAgent"));
        assert!(!looks_like_uri("192.168.1.200"));
        assert!(!looks_like_uri("path/with://late-scheme"));
    }

    #[test]
    fn test_uri_text_becomes_iri() {
        let obj = coerce(&FieldValue::from("http://example.com/device/gw1"));
        assert_eq!(obj.as_named_node().map(|n| n.as_str()), Some("http://example.com/device/gw1"));

        let obj = coerce(&FieldValue::from("urn:corona:agent:1"));
        assert!(obj.is_named_node());
    }

    #[test]
    fn test_plain_text_becomes_string_literal() {
        let obj = coerce(&FieldValue::from("demoAgent"));
        let lit = obj.as_literal().unwrap();
        assert!(lit.is_plain());
        assert_eq!(lit.value(), "demoAgent");
    }

    #[test]
    fn test_broken_uri_degrades_with_diagnostic() {
        let mut diags = Diagnostics::new();
        let obj = coerce_field("routedVia", &FieldValue::from("http://bad host/x"), &mut diags);
        assert!(obj.is_literal());
        assert_eq!(diags.len(), 1);

        let obj = coerce_text_field("observedFrom", "agent-7", &mut diags);
        assert!(obj.is_literal());
        assert_eq!(diags.len(), 1);
    }
}

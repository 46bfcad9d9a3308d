//! Native field values carried by metric records

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

/// A single observed value
///
/// Serializes to its native JSON type (timestamps as RFC 3339 strings).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

/// Declared kind of a value field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Integer,
    Float,
    Timestamp,
    Text,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Text => "text",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Boolean(_) => ValueKind::Boolean,
            FieldValue::Integer(_) => ValueKind::Integer,
            FieldValue::Float(_) => ValueKind::Float,
            FieldValue::Timestamp(_) => ValueKind::Timestamp,
            FieldValue::Text(_) => ValueKind::Text,
        }
    }

    /// Numeric view of the value
    ///
    /// Booleans count as 1/0 and text is parsed; timestamps and
    /// unparsable text have no numeric form.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Timestamp(_) => None,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v.into())
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Integer(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_numeric_view() {
        assert_eq!(FieldValue::from(150).to_f64(), Some(150.0));
        assert_eq!(FieldValue::from(true).to_f64(), Some(1.0));
        assert_eq!(FieldValue::from(" 12.5 ").to_f64(), Some(12.5));
        assert_eq!(FieldValue::from("urn:corona:router:1").to_f64(), None);
        let ts = Utc.with_ymd_and_hms(2024, 5, 3, 17, 15, 0).unwrap();
        assert_eq!(FieldValue::from(ts).to_f64(), None);
    }

    #[test]
    fn test_json_uses_native_types() {
        let values = vec![
            FieldValue::from(42),
            FieldValue::from(1.5),
            FieldValue::from(false),
            FieldValue::from("gw1"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[42,1.5,false,"gw1"]"#);
    }

    #[test]
    fn test_kind() {
        assert_eq!(FieldValue::from(1).kind(), ValueKind::Integer);
        assert_eq!(FieldValue::from("x").kind().to_string(), "text");
    }
}

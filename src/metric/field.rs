//! Static field metadata and public-name / namespace resolution
//!
//! Every value field of a metric variant is described by a
//! [`FieldDescriptor`] in a per-variant table. The public property name and
//! the namespace a property lives in are derived from that table alone,
//! never from the runtime value.
//!
//! Namespace routing is a substring heuristic over the field name and its
//! public name (see [`PROTOCOL_KEYWORDS`]). It is tied to the current field
//! names: a new field whose name happens to contain one of the keywords is
//! routed to the protocol namespace, and a protocol field without one lands
//! in the domain namespace. Declare `namespace_hint` on such fields instead
//! of extending the keyword list.

use super::value::ValueKind;
use crate::rdf::NamespaceKind;
use std::borrow::Cow;

/// Public names containing one of these (case-insensitive) are BACnet
/// protocol properties.
pub const PROTOCOL_KEYWORDS: [&str; 8] = [
    "who",
    "cov",
    "bbmd",
    "readproperty",
    "iam",
    "ihave",
    "routed",
    "forwarded",
];

/// Metadata for one value field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Internal snake_case field name
    pub name: &'static str,
    /// Explicit public name, overrides camel-casing
    pub alias: Option<&'static str>,
    /// Human-readable description (used for exposition HELP lines)
    pub description: Option<&'static str>,
    pub kind: ValueKind,
    /// Explicit namespace, overrides the keyword heuristic
    pub namespace_hint: Option<NamespaceKind>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            alias: None,
            description: None,
            kind,
            namespace_hint: None,
        }
    }

    pub const fn alias(self, alias: &'static str) -> Self {
        Self {
            alias: Some(alias),
            ..self
        }
    }

    pub const fn description(self, description: &'static str) -> Self {
        Self {
            description: Some(description),
            ..self
        }
    }

    pub const fn namespace(self, kind: NamespaceKind) -> Self {
        Self {
            namespace_hint: Some(kind),
            ..self
        }
    }

    /// Property name used in every output format
    pub fn public_name(&self) -> Cow<'static, str> {
        match self.alias {
            Some(alias) => Cow::Borrowed(alias),
            None => Cow::Owned(to_camel_case(self.name)),
        }
    }

    pub fn namespace_kind(&self) -> NamespaceKind {
        self.namespace_hint
            .unwrap_or_else(|| classify_namespace(self.name, &self.public_name()))
    }

    /// True if `key` is the internal name or the public name of this field
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.public_name() == key
    }
}

/// Resolve the public name and namespace for a field
pub fn resolve(field_name: &str, alias: Option<&str>) -> (String, NamespaceKind) {
    let public_name = match alias {
        Some(alias) => alias.to_string(),
        None => to_camel_case(field_name),
    };
    let namespace = classify_namespace(field_name, &public_name);
    (public_name, namespace)
}

/// `snake_case` → `camelCase`
///
/// The first segment is lowercased, every following segment is
/// capitalized (first letter upper, rest lower) and concatenated.
/// Only the first character of a segment is raised: a letter after a digit
/// stays lowercase (`bbmd_2nd_count` → `bbmd2ndCount`, not `bbmd2NdCount`).
pub fn to_camel_case(snake: &str) -> String {
    let mut segments = snake.split('_');
    let mut out = segments.next().unwrap_or_default().to_lowercase();
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Protocol namespace if the field name mentions "bacnet" or the public
/// name contains a protocol keyword, domain namespace otherwise
pub fn classify_namespace(field_name: &str, public_name: &str) -> NamespaceKind {
    let public_lower = public_name.to_lowercase();
    if field_name.to_lowercase().contains("bacnet")
        || PROTOCOL_KEYWORDS.iter().any(|kw| public_lower.contains(kw))
    {
        NamespaceKind::Protocol
    } else {
        NamespaceKind::Domain
    }
}

//! RDF namespace and prefix management
//!
//! This module handles namespace prefixes for compact IRI notation and the
//! two application namespaces (generic domain vs. BACnet protocol) that
//! metric properties are routed into.

use super::types::{NamedNode, RdfResult};
use indexmap::IndexMap;
use thiserror::Error;

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Namespace (prefix → IRI mapping)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Prefix
    pub prefix: String,
    /// IRI
    pub iri: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }

    /// Build the IRI for a local name inside this namespace
    pub fn term(&self, local: &str) -> RdfResult<NamedNode> {
        NamedNode::new(format!("{}{}", self.iri, local))
    }
}

/// Which of the two application namespaces a property belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// Generic building-telemetry concepts (`corona:`)
    Domain,
    /// BACnet protocol-specific concepts (`bacnet:`)
    Protocol,
}

/// The two configured application namespaces, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    pub domain: Namespace,
    pub protocol: Namespace,
}

impl Namespaces {
    pub fn new(domain: Namespace, protocol: Namespace) -> Self {
        Self { domain, protocol }
    }

    pub fn get(&self, kind: NamespaceKind) -> &Namespace {
        match kind {
            NamespaceKind::Domain => &self.domain,
            NamespaceKind::Protocol => &self.protocol,
        }
    }

    /// Term in the generic domain namespace
    pub fn domain_term(&self, local: &str) -> RdfResult<NamedNode> {
        self.domain.term(local)
    }
}

/// Namespace manager with common prefixes
///
/// Prefixes keep their registration order so that serialized documents are
/// reproducible.
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    /// Prefix → IRI mappings
    prefixes: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Create a new namespace manager with the standard vocabularies
    pub fn new() -> Self {
        let mut mgr = Self {
            prefixes: IndexMap::new(),
        };

        mgr.add_prefix("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        mgr.add_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        mgr.add_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
        mgr.add_prefix("sh", "http://www.w3.org/ns/shacl#");

        mgr
    }

    /// Standard vocabularies plus the two application namespaces
    pub fn with_namespaces(namespaces: &Namespaces) -> Self {
        let mut mgr = Self::new();
        for ns in [&namespaces.domain, &namespaces.protocol] {
            mgr.add_prefix(ns.prefix.clone(), ns.iri.clone());
        }
        mgr
    }

    /// Add a prefix
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        if let Some(pos) = compact_iri.find(':') {
            let prefix = &compact_iri[..pos];
            let local = &compact_iri[pos + 1..];
            let iri = self.get_iri(prefix)?;
            Ok(format!("{}{}", iri, local))
        } else {
            Err(PrefixError::InvalidIri(compact_iri.to_string()))
        }
    }

    /// Compact an IRI using the longest matching namespace
    ///
    /// Returns `None` when no namespace matches or the remainder is not
    /// usable as a Turtle local name.
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .and_then(|(prefix, ns)| {
                let local = &iri[ns.len()..];
                is_local_name(local).then(|| format!("{}:{}", prefix, local))
            })
    }

    /// Get all registered prefixes in registration order
    pub fn prefixes(&self) -> Vec<Namespace> {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| Namespace::new(prefix.clone(), iri.clone()))
            .collect()
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}

// Conservative subset of PN_LOCAL: no escapes, no percent-encoding, no ':'.
fn is_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(is_pn_chars_u(first) || first.is_ascii_digit()) || local.ends_with('.') {
        return false;
    }
    chars.all(|c| is_pn_chars(c) || c == '.')
}

// PN_CHARS_BASE plus '_'
fn is_pn_chars_u(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '_'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || matches!(c, '-' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_namespaces() -> Namespaces {
        Namespaces::new(
            Namespace::new("corona", "http://example.com/corona#"),
            Namespace::new("bacnet", "http://example.com/bacnet#"),
        )
    }

    #[test]
    fn test_common_prefixes() {
        let mgr = NamespaceManager::new();

        assert_eq!(
            mgr.get_iri("rdf").unwrap(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#"
        );
        assert_eq!(mgr.get_iri("xsd").unwrap(), "http://www.w3.org/2001/XMLSchema#");
        assert!(matches!(mgr.get_iri("foaf"), Err(PrefixError::UnknownPrefix(_))));
    }

    #[test]
    fn test_expand() {
        let mgr = NamespaceManager::with_namespaces(&app_namespaces());

        let expanded = mgr.expand("bacnet:readPropertyRequests").unwrap();
        assert_eq!(expanded, "http://example.com/bacnet#readPropertyRequests");

        assert!(mgr.expand("noprefix").is_err());
    }

    #[test]
    fn test_compact() {
        let mgr = NamespaceManager::with_namespaces(&app_namespaces());

        assert_eq!(
            mgr.compact("http://example.com/corona#metric-identifier"),
            Some("corona:metric-identifier".to_string())
        );
        assert_eq!(
            mgr.compact("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            Some("rdf:type".to_string())
        );
        assert_eq!(mgr.compact("http://other.org/x"), None);
        // remainder that cannot be a local name stays a full IRI
        assert_eq!(mgr.compact("http://example.com/corona#a/b"), None);
        assert_eq!(mgr.compact("http://example.com/corona#"), None);
        // outside the PN_CHARS ranges
        assert_eq!(mgr.compact("http://example.com/corona#m²"), None);
        assert_eq!(mgr.compact("http://example.com/corona#a½"), None);
        assert_eq!(
            mgr.compact("http://example.com/corona#café"),
            Some("corona:café".to_string())
        );
    }

    #[test]
    fn test_compact_prefers_longest_namespace() {
        let mut mgr = NamespaceManager::new();
        mgr.add_prefix("ex", "http://example.org/");
        mgr.add_prefix("dev", "http://example.org/device/");

        assert_eq!(
            mgr.compact("http://example.org/device/gw1"),
            Some("dev:gw1".to_string())
        );
    }

    #[test]
    fn test_prefix_order_is_registration_order() {
        let mgr = NamespaceManager::with_namespaces(&app_namespaces());
        let prefixes: Vec<String> = mgr.prefixes().into_iter().map(|n| n.prefix).collect();
        assert_eq!(prefixes, vec!["rdf", "rdfs", "xsd", "sh", "corona", "bacnet"]);
    }

    #[test]
    fn test_namespace_term() {
        let ns = app_namespaces();
        let node = ns.get(NamespaceKind::Protocol).term("whoIsRequestsSent").unwrap();
        assert_eq!(node.as_str(), "http://example.com/bacnet#whoIsRequestsSent");
    }
}

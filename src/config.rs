//! Exporter configuration
//!
//! Loaded once (defaults, or a YAML file) and turned into immutable
//! [`Namespaces`] that are handed to the mapper and the exporters.
//!
//! ```yaml
//! namespaces:
//!   domain_prefix: corona
//!   domain_iri: "http://example.com/corona#"
//!   protocol_prefix: bacnet
//!   protocol_iri: "http://example.com/bacnet#"
//! exposition_prefix: bacnet
//! ```

use crate::rdf::{Namespace, Namespaces};
use oxiri::Iri;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_DOMAIN_IRI: &str = "http://example.com/corona#";
pub const DEFAULT_PROTOCOL_IRI: &str = "http://example.com/bacnet#";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Namespace IRI is not an absolute IRI
    #[error("Invalid namespace IRI for '{prefix}': {iri}")]
    InvalidNamespace { prefix: String, iri: String },

    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// The two application namespaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Prefix for generic building-telemetry terms
    pub domain_prefix: String,
    pub domain_iri: String,
    /// Prefix for BACnet protocol terms
    pub protocol_prefix: String,
    pub protocol_iri: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            domain_prefix: "corona".to_string(),
            domain_iri: DEFAULT_DOMAIN_IRI.to_string(),
            protocol_prefix: "bacnet".to_string(),
            protocol_iri: DEFAULT_PROTOCOL_IRI.to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoronaConfig {
    pub namespaces: NamespaceConfig,
    /// Prefix prepended to every exposition metric name
    pub exposition_prefix: String,
}

impl Default for CoronaConfig {
    fn default() -> Self {
        Self {
            namespaces: NamespaceConfig::default(),
            exposition_prefix: "bacnet".to_string(),
        }
    }
}

impl CoronaConfig {
    /// Parse and validate a YAML document; missing keys take defaults
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: CoronaConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn with_exposition_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exposition_prefix = prefix.into();
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let ns = &self.namespaces;
        for prefix in [&ns.domain_prefix, &ns.protocol_prefix] {
            if !is_prefix_name(prefix) {
                return Err(ConfigError::InvalidPrefix(prefix.clone()));
            }
        }
        if ns.domain_prefix == ns.protocol_prefix {
            return Err(ConfigError::InvalidPrefix(format!(
                "'{}' used for both namespaces",
                ns.domain_prefix
            )));
        }
        for (prefix, iri) in [
            (&ns.domain_prefix, &ns.domain_iri),
            (&ns.protocol_prefix, &ns.protocol_iri),
        ] {
            if Iri::parse(iri.as_str()).is_err() {
                return Err(ConfigError::InvalidNamespace {
                    prefix: prefix.clone(),
                    iri: iri.clone(),
                });
            }
        }
        if !is_exposition_prefix(&self.exposition_prefix) {
            return Err(ConfigError::InvalidPrefix(self.exposition_prefix.clone()));
        }
        Ok(())
    }

    /// Resolved application namespaces
    pub fn namespaces(&self) -> Namespaces {
        let ns = &self.namespaces;
        Namespaces::new(
            Namespace::new(ns.domain_prefix.clone(), ns.domain_iri.clone()),
            Namespace::new(ns.protocol_prefix.clone(), ns.protocol_iri.clone()),
        )
    }
}

// Turtle PN_PREFIX, restricted to ASCII
fn is_prefix_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && !s.ends_with('.')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

// Exposition metric names: [a-zA-Z_:][a-zA-Z0-9_:]*
fn is_exposition_prefix(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = CoronaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.exposition_prefix, "bacnet");
        let ns = config.namespaces();
        assert_eq!(ns.domain.iri, "http://example.com/corona#");
        assert_eq!(ns.protocol.prefix, "bacnet");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = CoronaConfig::from_yaml_str(
            "namespaces:\n  domain_iri: \"https://corona.example.org/ns#\"\n",
        )
        .unwrap();
        assert_eq!(config.namespaces.domain_iri, "https://corona.example.org/ns#");
        assert_eq!(config.namespaces.domain_prefix, "corona");
        assert_eq!(config.namespaces.protocol_iri, DEFAULT_PROTOCOL_IRI);
        assert_eq!(config.exposition_prefix, "bacnet");
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = CoronaConfig::from_yaml_str("namespaces:\n  protocol_iri: \"bacnet ns\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNamespace { .. }));

        let err = CoronaConfig::from_yaml_str("namespaces:\n  protocol_prefix: corona\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix(_)));

        let err = CoronaConfig::from_yaml_str("exposition_prefix: \"9lives\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix(_)));

        let err = CoronaConfig::from_yaml_str("namespaces: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "exposition_prefix: building").unwrap();
        let config = CoronaConfig::from_file(file.path()).unwrap();
        assert_eq!(config.exposition_prefix, "building");

        assert!(matches!(
            CoronaConfig::from_file("/nonexistent/corona.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}

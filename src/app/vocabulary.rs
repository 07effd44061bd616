//! Prefix context for building IRIs
//!
//! A `Vocabulary` is constructed once per run and handed to every component
//! that asserts facts, so namespace resolution never depends on process-wide
//! state.

use crate::app::models::Agent;
use crate::constants::namespaces;
use std::collections::HashMap;

/// Namespace prefixes and the default namespace for bare names
#[derive(Debug, Clone)]
pub struct Vocabulary {
    prefixes: HashMap<String, String>,
    default_namespace: String,
    individuals_namespace: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary {
    /// Create the vocabulary used by the Rio Doce ontology
    pub fn new() -> Self {
        let prefixes = [
            ("rdf", namespaces::RDF),
            ("rdfs", namespaces::RDFS),
            ("xsd", namespaces::XSD),
            ("gufo", namespaces::GUFO),
            ("doce", namespaces::DOCE),
            ("integradoce", namespaces::INTEGRADOCE),
            ("wgs84", namespaces::WGS84),
            ("wgs", namespaces::WGS84),
            ("unit", namespaces::UNIT),
        ]
        .into_iter()
        .map(|(p, ns)| (p.to_string(), ns.to_string()))
        .collect();

        Self {
            prefixes,
            default_namespace: namespaces::DOCE.to_string(),
            individuals_namespace: namespaces::INTEGRADOCE.to_string(),
        }
    }

    /// Register an additional prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), namespace.into());
        self
    }

    /// Resolve a reference into a full IRI
    ///
    /// Accepts absolute IRIs, `prefix:local` names with a registered prefix and
    /// bare local names, which land in the default (`doce`) namespace.
    pub fn resolve(&self, reference: &str) -> String {
        let reference = reference.trim();
        if reference.contains("://") {
            return reference.to_string();
        }

        if let Some((prefix, local)) = reference.split_once(':') {
            if let Some(namespace) = self.prefixes.get(prefix) {
                return format!("{}{}", namespace, local);
            }
        }

        format!("{}{}", self.default_namespace, reference)
    }

    /// IRI of a term in a registered namespace (`term("gufo", "hasQualityValue")`)
    pub fn term(&self, prefix: &str, local: &str) -> String {
        match self.prefixes.get(prefix) {
            Some(namespace) => format!("{}{}", namespace, local),
            None => format!("{}{}", self.default_namespace, local),
        }
    }

    /// IRI of an individual created by this ETL (points, measurements)
    pub fn individual(&self, local: &str) -> String {
        format!("{}{}", self.individuals_namespace, local)
    }

    /// IRI of a well-known agent
    pub fn agent(&self, agent: Agent) -> String {
        self.individual(agent.local_name())
    }

    /// Short form of a reference: the part after the last `#`, `/` or `:`
    pub fn short_name(reference: &str) -> &str {
        let reference = reference.trim();
        reference
            .rfind(['#', '/', ':'])
            .map(|i| &reference[i + 1..])
            .unwrap_or(reference)
    }
}

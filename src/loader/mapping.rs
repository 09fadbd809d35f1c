//! Identifier to target mapping

use crate::config::{Config, PROXIES_SECTION};
use crate::error::{ProxyError, ProxyResult};
use std::collections::BTreeMap;

/// Read-only map from proxy identifier to fully-qualified target type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyMapping {
    entries: BTreeMap<String, String>,
}

impl ProxyMapping {
    /// Build a mapping, rejecting empty identifiers and targets
    pub fn new<I, K, V>(entries: I) -> ProxyResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (identifier, target) in entries {
            let identifier = identifier.into();
            let target = target.into();
            if identifier.trim().is_empty() {
                return Err(ProxyError::MappingInvalid(format!(
                    "[{}] contains an empty identifier",
                    PROXIES_SECTION
                )));
            }
            let target = target.trim().trim_start_matches('.').to_string();
            if target.is_empty() {
                return Err(ProxyError::MappingInvalid(format!(
                    "'{}' has an empty target",
                    identifier
                )));
            }
            if map.insert(identifier.clone(), target).is_some() {
                return Err(ProxyError::MappingInvalid(format!(
                    "'{}' is mapped more than once",
                    identifier
                )));
            }
        }
        Ok(Self { entries: map })
    }

    pub fn from_config(config: &Config) -> ProxyResult<Self> {
        Self::new(config.proxies.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Fully-qualified target of `identifier`
    pub fn target(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Entries in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Configuration schema for lazyproxy
//!
//! Configuration is read from `lazyproxy.toml` (project) or
//! `~/.config/lazyproxy/config.toml` (global).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "lazyproxy.toml";

/// Section of the configuration file holding the proxy mapping
pub const PROXIES_SECTION: &str = "proxies";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Proxy generation settings
    pub proxy: ProxyConfig,

    /// Where target declarations are read from
    pub sources: SourcesConfig,

    /// Proxy identifier -> fully-qualified target type
    pub proxies: BTreeMap<String, String>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Append a JSON line to the generation journal for each published proxy
    pub journal: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            journal: true,
        }
    }
}

/// What a task does when another task already holds the generation lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentionPolicy {
    /// Wait for the winner, then return the published path
    #[default]
    Wait,
    /// Return the computed path immediately, even if not yet published
    Return,
}

/// Proxy generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Namespace every generated proxy is declared in
    pub namespace: String,

    /// Cache directory (defaults to the state directory)
    pub cache_dir: Option<PathBuf>,

    /// File suffix of cache entries
    pub file_suffix: String,

    /// Call emitted to resolve the real instance, given the identifier
    pub container_accessor: String,

    /// Behaviour when the generation lock is busy
    pub on_contention: ContentionPolicy,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            namespace: "lazy.proxies".to_string(),
            cache_dir: None,
            file_suffix: "lazy".to_string(),
            container_accessor: "Container.get".to_string(),
            on_contention: ContentionPolicy::Wait,
        }
    }
}

/// Target declaration sources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directories searched in order for declaration files
    pub roots: Vec<PathBuf>,

    /// Extension of declaration files
    pub extension: String,

    /// Interfaces provided by the runtime itself, with no declaration file
    pub runtime_interfaces: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from("src")],
            extension: "decl".to_string(),
            runtime_interfaces: [
                "Countable",
                "Iterator",
                "IteratorAggregate",
                "ArrayAccess",
                "Traversable",
                "Stringable",
                "JsonSerializable",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

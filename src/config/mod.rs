//! Configuration management for lazyproxy

pub mod schema;

pub use schema::{Config, ContentionPolicy, CONFIG_FILE_NAME, PROXIES_SECTION};

use crate::cache::path::is_reserved_suffix;
use crate::error::{ProxyError, ProxyResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lazyproxy")
            .join("config.toml")
    }

    /// Get the state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lazyproxy")
    }

    /// Default cache directory when `proxy.cache_dir` is unset
    pub fn default_cache_dir() -> PathBuf {
        Self::state_dir().join("proxies")
    }

    /// Walk up from `start` looking for a project `lazyproxy.toml`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> ProxyResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    ///
    /// Relative `sources.roots` and `proxy.cache_dir` are anchored at the
    /// directory containing the file.
    pub async fn load_from_file(&self, path: &Path) -> ProxyResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ProxyError::io(format!("reading config from {}", path.display()), e))?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ProxyError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        validate(&config).map_err(|reason| ProxyError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        })?;

        if let Some(base) = path.parent() {
            anchor_paths(&mut config, base);
        }

        debug!(
            "Loaded {} proxy mapping(s) from {}",
            config.proxies.len(),
            path.display()
        );
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> ProxyResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            ProxyError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> ProxyResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ProxyError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(config: &Config) -> Result<(), String> {
    if is_reserved_suffix(&config.proxy.file_suffix) {
        return Err(format!(
            "proxy.file_suffix '{}' is reserved for temp files or the journal",
            config.proxy.file_suffix
        ));
    }
    for (identifier, target) in &config.proxies {
        if identifier.trim().is_empty() {
            return Err(format!("[{}] contains an empty identifier", PROXIES_SECTION));
        }
        if target.trim().is_empty() {
            return Err(format!(
                "[{}] entry '{}' has an empty target",
                PROXIES_SECTION, identifier
            ));
        }
    }
    Ok(())
}

fn anchor_paths(config: &mut Config, base: &Path) {
    for root in &mut config.sources.roots {
        if root.is_relative() {
            *root = base.join(&*root);
        }
    }
    if let Some(dir) = config.proxy.cache_dir.as_mut() {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
}

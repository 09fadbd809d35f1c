//! Process-wide proxy context

use crate::cache::ProxyCacheResolver;
use crate::config::Config;
use crate::error::ProxyResult;
use crate::loader::hook::ProxyResolver;
use crate::loader::manager::LoaderManager;
use crate::loader::mapping::ProxyMapping;
use std::sync::Arc;
use tracing::debug;

/// Mapping, cache and loader chain, built once and passed to callers
pub struct ProxyContext {
    pub mapping: Arc<ProxyMapping>,
    pub cache: Arc<ProxyCacheResolver>,
    pub loader: LoaderManager,
}

impl ProxyContext {
    /// Build the context with the proxy resolver as the only chain link
    pub fn from_config(config: &Config) -> ProxyResult<Self> {
        let mapping = Arc::new(ProxyMapping::from_config(config)?);
        let cache = Arc::new(ProxyCacheResolver::from_config(config, Arc::clone(&mapping)));

        let mut loader = LoaderManager::new();
        loader.register(Arc::new(ProxyResolver::new(Arc::clone(&cache))));

        debug!(
            "Proxy context ready: {} mapping(s), cache at {}, resolvers [{}]",
            mapping.len(),
            cache.paths().dir().display(),
            loader.names().join(", ")
        );

        Ok(Self {
            mapping,
            cache,
            loader,
        })
    }
}

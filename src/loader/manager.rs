//! Ordered resolver chain
//!
//! Resolution chain (first claim wins):
//! 1. each registered resolver, in registration order
//! 2. nothing claimed: the identifier is unknown

use crate::error::{ProxyError, ProxyResult};
use crate::loader::hook::{Resolution, Resolver};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Source text of a claimed proxy
#[derive(Debug, Clone)]
pub struct LoadedProxy {
    pub identifier: String,
    pub path: PathBuf,
    /// Name of the resolver that claimed it
    pub resolver: String,
    pub source: String,
}

/// Asks resolvers in order until one claims an identifier
#[derive(Default)]
pub struct LoaderManager {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl LoaderManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver to the end of the chain
    pub fn register(&mut self, resolver: Arc<dyn Resolver>) -> &mut Self {
        debug!("Registered resolver {}", resolver.name());
        self.resolvers.push(resolver);
        self
    }

    /// Resolver names in chain order
    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// First claim wins; all declined gives `Declined`
    pub async fn resolve(&self, identifier: &str) -> ProxyResult<Resolution> {
        Ok(self
            .claim(identifier)
            .await?
            .map(|(_, path)| Resolution::Claimed(path))
            .unwrap_or(Resolution::Declined))
    }

    /// Resolve `identifier` and read the claimed file
    pub async fn load(&self, identifier: &str) -> ProxyResult<LoadedProxy> {
        let (resolver, path) = self
            .claim(identifier)
            .await?
            .ok_or_else(|| ProxyError::ProxyNotFound(identifier.to_string()))?;

        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProxyError::ProxyNotReady {
                    identifier: identifier.to_string(),
                    path,
                })
            }
            Err(e) => {
                return Err(ProxyError::io(
                    format!("reading proxy {}", path.display()),
                    e,
                ))
            }
        };

        Ok(LoadedProxy {
            identifier: identifier.to_string(),
            path,
            resolver,
            source,
        })
    }

    async fn claim(&self, identifier: &str) -> ProxyResult<Option<(String, PathBuf)>> {
        for resolver in &self.resolvers {
            match resolver.resolve(identifier).await? {
                Resolution::Claimed(path) => {
                    debug!("{} claimed {} at {}", resolver.name(), identifier, path.display());
                    return Ok(Some((resolver.name().to_string(), path)));
                }
                Resolution::Declined => continue,
            }
        }
        debug!("No resolver claimed {}", identifier);
        Ok(None)
    }
}

//! Lookup hook
//!
//! A [`Resolver`] either claims an identifier by returning a file path, or
//! declines it so the next resolver in the chain is asked.

use crate::cache::ProxyCacheResolver;
use crate::error::ProxyResult;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Outcome of asking one resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier is defined by this file
    Claimed(PathBuf),
    /// Not handled here; ask the next resolver
    Declined,
}

/// One link of the lookup chain
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn resolve(&self, identifier: &str) -> ProxyResult<Resolution>;
}

/// Claims mapped identifiers, generating their proxies on demand
pub struct ProxyResolver {
    cache: Arc<ProxyCacheResolver>,
}

impl ProxyResolver {
    pub fn new(cache: Arc<ProxyCacheResolver>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Resolver for ProxyResolver {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn resolve(&self, identifier: &str) -> ProxyResult<Resolution> {
        if !self.cache.mapping().contains(identifier) {
            debug!("{} is not a mapped proxy", identifier);
            return Ok(Resolution::Declined);
        }
        let path = self.cache.ensure_cached(identifier).await?;
        Ok(Resolution::Claimed(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ProxyTemplate;
    use crate::cache::CachePaths;
    use crate::config::ContentionPolicy;
    use crate::generate::ProxyGenerator;
    use crate::journal::GenerationJournal;
    use crate::loader::ProxyMapping;
    use crate::source::MemoryDeclarationSource;
    use tempfile::TempDir;

    fn cache(dir: &TempDir) -> Arc<ProxyCacheResolver> {
        let source = MemoryDeclarationSource::new().with(
            "services.Mailer",
            "namespace services;\nclass Mailer { public fn send() -> bool { } }",
        );
        Arc::new(ProxyCacheResolver::new(
            CachePaths::new(dir.path(), "lazy"),
            Arc::new(ProxyMapping::new([("MailerService", "services.Mailer")]).unwrap()),
            ProxyGenerator::new(Arc::new(source), Vec::new(), ProxyTemplate::default()),
            ContentionPolicy::Wait,
            GenerationJournal::new(dir.path(), false),
        ))
    }

    #[tokio::test]
    async fn claims_mapped_identifier() {
        let dir = TempDir::new().unwrap();
        let resolver = ProxyResolver::new(cache(&dir));

        let resolution = resolver.resolve("MailerService").await.unwrap();
        assert_eq!(
            resolution,
            Resolution::Claimed(dir.path().join("MailerService.lazy"))
        );
        assert!(dir.path().join("MailerService.lazy").exists());
    }

    #[tokio::test]
    async fn declines_unmapped_identifier() {
        let dir = TempDir::new().unwrap();
        let resolver = ProxyResolver::new(cache(&dir));

        let resolution = resolver.resolve("app.Controller").await.unwrap();
        assert_eq!(resolution, Resolution::Declined);
    }
}

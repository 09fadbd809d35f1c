//! Concurrency-safe, idempotent proxy cache

use crate::cache::locks::LockMap;
use crate::cache::path::{is_temp, lock_key, temp_path, CachePaths};
use crate::config::{Config, ConfigManager, ContentionPolicy};
use crate::error::{ProxyError, ProxyResult};
use crate::generate::ProxyGenerator;
use crate::journal::GenerationJournal;
use crate::loader::ProxyMapping;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// A published cache file
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    /// File stem (the sanitized identifier)
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// What `clear` removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub entries: usize,
    pub temp_files: usize,
}

/// Owns cache paths and the write protocol for generated proxies
pub struct ProxyCacheResolver {
    paths: CachePaths,
    mapping: Arc<ProxyMapping>,
    generator: ProxyGenerator,
    locks: LockMap,
    policy: ContentionPolicy,
    journal: GenerationJournal,
}

impl ProxyCacheResolver {
    pub fn new(
        paths: CachePaths,
        mapping: Arc<ProxyMapping>,
        generator: ProxyGenerator,
        policy: ContentionPolicy,
        journal: GenerationJournal,
    ) -> Self {
        Self {
            paths,
            mapping,
            generator,
            locks: LockMap::new(),
            policy,
            journal,
        }
    }

    pub fn from_config(config: &Config, mapping: Arc<ProxyMapping>) -> Self {
        let dir = config
            .proxy
            .cache_dir
            .clone()
            .unwrap_or_else(ConfigManager::default_cache_dir);
        let journal = GenerationJournal::new(&dir, config.general.journal);

        Self::new(
            CachePaths::new(dir, config.proxy.file_suffix.clone()),
            mapping,
            ProxyGenerator::from_config(config),
            config.proxy.on_contention,
            journal,
        )
    }

    pub fn paths(&self) -> &CachePaths {
        &self.paths
    }

    pub fn mapping(&self) -> &ProxyMapping {
        &self.mapping
    }

    pub fn generator(&self) -> &ProxyGenerator {
        &self.generator
    }

    /// Deterministic cache path of `identifier`
    pub fn cache_path(&self, identifier: &str) -> PathBuf {
        self.paths.entry(identifier)
    }

    /// Whether `identifier` has a published cache file
    pub async fn is_cached(&self, identifier: &str) -> ProxyResult<bool> {
        exists(&self.cache_path(identifier)).await
    }

    /// Return the cache path of `identifier`, generating it on a miss
    ///
    /// At most one task generates per path. With [`ContentionPolicy::Return`]
    /// a task that finds the lock busy returns the path at once, and it may
    /// not exist yet.
    pub async fn ensure_cached(&self, identifier: &str) -> ProxyResult<PathBuf> {
        let target = self
            .mapping
            .target(identifier)
            .ok_or_else(|| ProxyError::ProxyNotFound(identifier.to_string()))?;

        let path = self.cache_path(identifier);
        self.paths.ensure_dir().await?;

        if exists(&path).await? {
            debug!("Cache hit for {}", identifier);
            return Ok(path);
        }

        let key = lock_key(&path);
        let _lock = match self.locks.try_acquire(&key) {
            Some(lock) => lock,
            None => match self.policy {
                ContentionPolicy::Return => {
                    debug!("{} is being generated elsewhere, returning early", identifier);
                    return Ok(path);
                }
                ContentionPolicy::Wait => {
                    debug!("Waiting for generation of {}", identifier);
                    self.locks.acquire(&key).await
                }
            },
        };

        if exists(&path).await? {
            debug!("{} was published while waiting", identifier);
            return Ok(path);
        }

        let proxy = self.generator.generate(identifier, target).await?;
        publish(&path, &proxy.source).await?;
        info!("Published proxy {} to {}", identifier, path.display());
        self.journal.published(&proxy, &path).await;

        Ok(path)
    }

    /// Published cache files, sorted by name
    pub async fn entries(&self) -> ProxyResult<Vec<CacheEntry>> {
        let mut entries = Vec::new();
        for path in self.list_dir().await? {
            if !self.paths.is_entry(&path) {
                continue;
            }
            let meta = fs::metadata(&path)
                .await
                .map_err(|e| ProxyError::io(format!("reading metadata of {}", path.display()), e))?;
            if !meta.is_file() {
                continue;
            }
            entries.push(CacheEntry {
                name: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                size: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Utc>::from),
                path,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Remove published entries and stray temp files
    pub async fn clear(&self) -> ProxyResult<ClearReport> {
        let mut report = ClearReport::default();
        for path in self.list_dir().await? {
            let temp = is_temp(&path);
            if !temp && !self.paths.is_entry(&path) {
                continue;
            }
            fs::remove_file(&path)
                .await
                .map_err(|e| ProxyError::io(format!("removing {}", path.display()), e))?;
            if temp {
                report.temp_files += 1;
            } else {
                report.entries += 1;
            }
        }
        info!(
            "Cleared {} cache entries and {} temp files",
            report.entries, report.temp_files
        );
        Ok(report)
    }

    async fn list_dir(&self) -> ProxyResult<Vec<PathBuf>> {
        let dir = self.paths.dir();
        let mut read = match fs::read_dir(dir).await {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ProxyError::io(
                    format!("listing cache dir {}", dir.display()),
                    e,
                ))
            }
        };

        let mut paths = Vec::new();
        while let Some(entry) = read
            .next_entry()
            .await
            .map_err(|e| ProxyError::io(format!("listing cache dir {}", dir.display()), e))?
        {
            paths.push(entry.path());
        }
        Ok(paths)
    }
}

async fn exists(path: &Path) -> ProxyResult<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| ProxyError::io(format!("checking {}", path.display()), e))
}

/// Write to a sibling temp file, then rename over `path`
async fn publish(path: &Path, text: &str) -> ProxyResult<()> {
    let temp = temp_path(path);

    let result = async {
        fs::write(&temp, text)
            .await
            .map_err(|e| ProxyError::io(format!("writing {}", temp.display()), e))?;
        fs::rename(&temp, path)
            .await
            .map_err(|e| ProxyError::io(format!("publishing {}", path.display()), e))
    }
    .await;

    if result.is_err() {
        if let Err(e) = fs::remove_file(&temp).await {
            debug!("Could not remove temp file {}: {}", temp.display(), e);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ProxyTemplate;
    use crate::source::{DeclarationSource, MemoryDeclarationSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const MAILER: &str = r#"
        namespace services;
        use mail.Message;

        class Mailer {
            public fn send(message: Message) -> bool { return true; }
            public fn queue(message: Message, delay: int = 0) -> void { }
        }
    "#;

    /// Counts lookups and yields before answering
    struct CountingSource {
        inner: MemoryDeclarationSource,
        calls: Arc<AtomicUsize>,
        yields: usize,
    }

    #[async_trait]
    impl DeclarationSource for CountingSource {
        async fn locate(&self, fqn: &str) -> ProxyResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for _ in 0..self.yields {
                tokio::task::yield_now().await;
            }
            self.inner.locate(fqn).await
        }
    }

    fn resolver_with(
        dir: &Path,
        text: &str,
        yields: usize,
        policy: ContentionPolicy,
    ) -> (ProxyCacheResolver, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            inner: MemoryDeclarationSource::new().with("services.Mailer", text),
            calls: Arc::clone(&calls),
            yields,
        };
        let generator =
            ProxyGenerator::new(Arc::new(source), Vec::new(), ProxyTemplate::default());
        let mapping = ProxyMapping::new([("MailerService", "services.Mailer")]).unwrap();
        let resolver = ProxyCacheResolver::new(
            CachePaths::new(dir.join("cache"), "lazy"),
            Arc::new(mapping),
            generator,
            policy,
            GenerationJournal::new(&dir.join("cache"), true),
        );
        (resolver, calls)
    }

    fn resolver(dir: &Path, yields: usize) -> (ProxyCacheResolver, Arc<AtomicUsize>) {
        resolver_with(dir, MAILER, yields, ContentionPolicy::Wait)
    }

    #[tokio::test]
    async fn generates_on_miss() {
        let temp = TempDir::new().unwrap();
        let (resolver, _) = resolver(temp.path(), 0);

        assert!(!resolver.is_cached("MailerService").await.unwrap());
        let path = resolver.ensure_cached("MailerService").await.unwrap();

        assert_eq!(path, temp.path().join("cache").join("MailerService.lazy"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("class MailerService extends .services.Mailer {"));
        assert!(resolver.is_cached("MailerService").await.unwrap());
    }

    #[tokio::test]
    async fn second_call_is_a_hit() {
        let temp = TempDir::new().unwrap();
        let (resolver, calls) = resolver(temp.path(), 0);

        let first = resolver.ensure_cached("MailerService").await.unwrap();
        let content = std::fs::read_to_string(&first).unwrap();
        let modified = std::fs::metadata(&first).unwrap().modified().unwrap();

        let second = resolver.ensure_cached("MailerService").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(&second).unwrap(), content);
        assert_eq!(std::fs::metadata(&second).unwrap().modified().unwrap(), modified);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_generate_once() {
        let temp = TempDir::new().unwrap();
        let (resolver, calls) = resolver(temp.path(), 5);

        let results = futures_util::future::join_all(
            (0..8).map(|_| resolver.ensure_cached("MailerService")),
        )
        .await;

        let expected = resolver.cache_path("MailerService");
        for result in results {
            assert_eq!(result.unwrap(), expected);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(resolver.locks.is_empty());

        let journal = std::fs::read_to_string(temp.path().join("cache").join("generation.log"))
            .unwrap();
        assert_eq!(journal.lines().count(), 1);
    }

    #[tokio::test]
    async fn reader_never_sees_partial_file() {
        let temp = TempDir::new().unwrap();
        let mut text = String::from("namespace services;\nclass Mailer {\n");
        for i in 0..500 {
            text.push_str(&format!(
                "    public fn op{}(value: int, label: string = \"x\") -> string {{ }}\n",
                i
            ));
        }
        text.push_str("}\n");
        let (resolver, _) = resolver_with(temp.path(), &text, 3, ContentionPolicy::Wait);
        let path = resolver.cache_path("MailerService");

        let reader = async {
            loop {
                if let Ok(seen) = tokio::fs::read_to_string(&path).await {
                    return seen;
                }
                tokio::task::yield_now().await;
            }
        };
        let (written, seen) = tokio::join!(resolver.ensure_cached("MailerService"), reader);

        let full = std::fs::read_to_string(written.unwrap()).unwrap();
        assert_eq!(seen, full);
        assert!(seen.ends_with("}\n"));
    }

    #[tokio::test]
    async fn waiter_returns_published_path() {
        let temp = TempDir::new().unwrap();
        let (resolver, calls) = resolver(temp.path(), 0);
        let path = resolver.cache_path("MailerService");
        resolver.paths.ensure_dir().await.unwrap();

        let held = resolver.locks.try_acquire(&lock_key(&path)).unwrap();
        let release = async move {
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            drop(held);
        };
        let (result, ()) = tokio::join!(resolver.ensure_cached("MailerService"), release);

        assert_eq!(result.unwrap(), path);
        assert!(path.exists());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn return_policy_gives_back_unpublished_path() {
        let temp = TempDir::new().unwrap();
        let (resolver, calls) = resolver_with(temp.path(), MAILER, 0, ContentionPolicy::Return);
        let path = resolver.cache_path("MailerService");

        let held = resolver.locks.try_acquire(&lock_key(&path)).unwrap();
        let result = resolver.ensure_cached("MailerService").await.unwrap();
        drop(held);

        assert_eq!(result, path);
        assert!(!path.exists());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found() {
        let temp = TempDir::new().unwrap();
        let (resolver, _) = resolver(temp.path(), 0);

        let err = resolver.ensure_cached("Missing").await.unwrap_err();
        assert!(matches!(err, ProxyError::ProxyNotFound(_)));
    }

    #[tokio::test]
    async fn generation_failure_leaves_no_file() {
        let temp = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            inner: MemoryDeclarationSource::new(),
            calls: Arc::clone(&calls),
            yields: 0,
        };
        let resolver = ProxyCacheResolver::new(
            CachePaths::new(temp.path().join("cache"), "lazy"),
            Arc::new(ProxyMapping::new([("MailerService", "services.Mailer")]).unwrap()),
            ProxyGenerator::new(Arc::new(source), Vec::new(), ProxyTemplate::default()),
            ContentionPolicy::Wait,
            GenerationJournal::new(&temp.path().join("cache"), false),
        );

        let err = resolver.ensure_cached("MailerService").await.unwrap_err();
        assert!(matches!(err, ProxyError::TargetNotFound { .. }));
        assert!(resolver.entries().await.unwrap().is_empty());
        assert!(resolver.locks.is_empty());
    }

    #[tokio::test]
    async fn entries_and_clear() {
        let temp = TempDir::new().unwrap();
        let (resolver, _) = resolver(temp.path(), 0);

        assert!(resolver.entries().await.unwrap().is_empty());
        resolver.ensure_cached("MailerService").await.unwrap();
        let stray = temp_path(&resolver.cache_path("Other"));
        std::fs::write(&stray, "partial").unwrap();

        let entries = resolver.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "MailerService");
        assert!(entries[0].size > 0);
        assert!(entries[0].modified.is_some());

        let report = resolver.clear().await.unwrap();
        assert_eq!(
            report,
            ClearReport {
                entries: 1,
                temp_files: 1
            }
        );
        assert!(resolver.entries().await.unwrap().is_empty());
        assert!(resolver.paths().dir().join("generation.log").exists());
    }
}

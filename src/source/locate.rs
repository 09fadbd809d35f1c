//! Declaration lookup
//!
//! Maps a fully-qualified type name to the text of the file declaring it.

use crate::error::{ProxyError, ProxyResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Source of declaration text for target types
#[async_trait]
pub trait DeclarationSource: Send + Sync {
    /// Return the text declaring `fqn`, or `None` if there is none
    async fn locate(&self, fqn: &str) -> ProxyResult<Option<String>>;
}

/// Reads `a.b.C` from `<root>/a/b/C.<extension>`, first root wins
#[derive(Debug, Clone)]
pub struct FsDeclarationSource {
    roots: Vec<PathBuf>,
    extension: String,
}

impl FsDeclarationSource {
    pub fn new(roots: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            roots,
            extension: extension.into(),
        }
    }

    /// Relative file path for a fully-qualified name
    pub fn relative_path(&self, fqn: &str) -> PathBuf {
        let mut path: PathBuf = fqn.trim_start_matches('.').split('.').collect();
        path.set_extension(&self.extension);
        path
    }

    fn candidates(&self, fqn: &str) -> impl Iterator<Item = PathBuf> + '_ {
        let relative = self.relative_path(fqn);
        self.roots.iter().map(move |root| root.join(&relative))
    }
}

#[async_trait]
impl DeclarationSource for FsDeclarationSource {
    async fn locate(&self, fqn: &str) -> ProxyResult<Option<String>> {
        for candidate in self.candidates(fqn) {
            match fs::read_to_string(&candidate).await {
                Ok(text) => {
                    debug!("Declaration of {} found at {}", fqn, candidate.display());
                    return Ok(Some(text));
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(ProxyError::io(
                        format!("reading declaration {}", candidate.display()),
                        e,
                    ))
                }
            }
        }
        debug!("No declaration file for {}", fqn);
        Ok(None)
    }
}

/// In-memory declarations keyed by fully-qualified name
#[derive(Debug, Clone, Default)]
pub struct MemoryDeclarationSource {
    files: HashMap<String, String>,
}

impl MemoryDeclarationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the text declaring `fqn`
    pub fn with(mut self, fqn: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(fqn.into(), text.into());
        self
    }
}

#[async_trait]
impl DeclarationSource for MemoryDeclarationSource {
    async fn locate(&self, fqn: &str) -> ProxyResult<Option<String>> {
        Ok(self.files.get(fqn.trim_start_matches('.')).cloned())
    }
}

//! Cache file layout

use crate::error::{ProxyError, ProxyResult};
use crate::journal::JOURNAL_FILE_NAME;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const TEMP_SUFFIX: &str = "tmp";

/// Computes where proxies live inside the cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    dir: PathBuf,
    suffix: String,
}

impl CachePaths {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Published path of `identifier`: `<dir>/<sanitized>.<suffix>`
    pub fn entry(&self, identifier: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", sanitize(identifier), self.suffix))
    }

    /// Whether `path` names a published entry
    pub fn is_entry(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.suffix.as_str())
    }

    /// Create the cache directory if missing (mode 0o775 on unix)
    pub async fn ensure_dir(&self) -> ProxyResult<()> {
        if tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ProxyError::CacheDirCreate {
                path: self.dir.clone(),
                source: e,
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o775);
            std::fs::set_permissions(&self.dir, perms)
                .map_err(|e| ProxyError::io("setting cache dir permissions", e))?;
        }

        debug!("Created cache directory {}", self.dir.display());
        Ok(())
    }
}

/// Make an identifier safe as a single file name
///
/// `..` becomes `__`; `/`, `\`, `:` and NUL become `_`. The mapping is not
/// injective: `a/b`, `a:b` and `a_b` share one cache file, and whichever is
/// generated first is served for all of them.
pub fn sanitize(identifier: &str) -> String {
    identifier
        .replace("..", "__")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Sibling temp file for writing `path`: `<path>.<uuid>.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}.{}", Uuid::new_v4().simple(), TEMP_SUFFIX));
    PathBuf::from(name)
}

/// Suffixes an entry may not use: temp files and the journal own them
pub fn is_reserved_suffix(suffix: &str) -> bool {
    let journal = Path::new(JOURNAL_FILE_NAME)
        .extension()
        .and_then(|e| e.to_str());
    suffix.is_empty() || suffix == TEMP_SUFFIX || Some(suffix) == journal
}

pub fn is_temp(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(TEMP_SUFFIX)
}

/// Generation lock key for a cache path: first 16 hex chars of its SHA256
pub fn lock_key(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_os_str().as_encoded_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

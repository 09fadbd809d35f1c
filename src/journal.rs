//! Generation journal
//!
//! Appends one JSON line per published proxy to `<cache_dir>/generation.log`.

use crate::generate::GeneratedProxy;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// File name of the journal inside the cache directory
pub const JOURNAL_FILE_NAME: &str = "generation.log";

/// Append-only JSON-lines log of generation events
#[derive(Debug, Clone)]
pub struct GenerationJournal {
    enabled: bool,
    path: PathBuf,
}

impl GenerationJournal {
    pub fn new(cache_dir: &Path, enabled: bool) -> Self {
        Self {
            enabled,
            path: cache_dir.join(JOURNAL_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a proxy published at `path`
    pub async fn published(&self, proxy: &GeneratedProxy, path: &Path) {
        self.log(
            "proxy.published",
            &serde_json::json!({
                "identifier": proxy.identifier,
                "target": proxy.target,
                "classification": proxy.classification,
                "strategy": proxy.strategy,
                "path": path.display().to_string(),
                "bytes": proxy.source.len(),
            }),
        )
        .await;
    }

    /// Log an event as a JSON line
    ///
    /// Failures are reported with `warn!` and otherwise ignored.
    pub async fn log(&self, event: &str, data: &serde_json::Value) {
        if !self.enabled {
            return;
        }

        let entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
            "data": data,
        });

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize journal event: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write generation journal: {}", e);
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

//! Error types for lazyproxy
//!
//! All modules use `ProxyResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lazyproxy operations
pub type ProxyResult<T> = Result<T, ProxyError>;

/// All errors that can occur in lazyproxy
#[derive(Error, Debug)]
pub enum ProxyError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid proxy mapping: {0}")]
    MappingInvalid(String),

    #[error("Target {target} for proxy {identifier} has no declaration")]
    TargetNotFound { identifier: String, target: String },

    #[error("Declaration of {target} could not be parsed: {reason}")]
    TargetUnparsable { target: String, reason: String },

    // Lookup errors
    #[error("No resolver claimed proxy: {0}")]
    ProxyNotFound(String),

    #[error("Proxy {identifier} is still being generated: {path}")]
    ProxyNotReady { identifier: String, path: PathBuf },

    // Cache errors
    #[error("Failed to create cache directory {path}: {source}")]
    CacheDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl ProxyError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProxyNotReady { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TargetNotFound { .. } => Some(
                "Check [sources] roots, or list the type under sources.runtime_interfaces",
            ),
            Self::ProxyNotFound(_) => Some("Add the identifier to the [proxies] section"),
            Self::ProxyNotReady { .. } => {
                Some("Retry the lookup, or set proxy.on_contention = \"wait\"")
            }
            Self::ConfigNotFound(_) => Some("Run: lazyproxy config init"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProxyError::TargetNotFound {
            identifier: "MailerService".to_string(),
            target: "services.Mailer".to_string(),
        };
        assert!(err.to_string().contains("services.Mailer"));
        assert!(err.to_string().contains("MailerService"));
    }

    #[test]
    fn error_hint() {
        let err = ProxyError::ProxyNotFound("Missing".to_string());
        assert_eq!(
            err.hint(),
            Some("Add the identifier to the [proxies] section")
        );
        assert!(ProxyError::Internal("x".to_string()).hint().is_none());
    }

    #[test]
    fn error_retryable() {
        let not_ready = ProxyError::ProxyNotReady {
            identifier: "MailerService".to_string(),
            path: PathBuf::from("/tmp/MailerService.lazy"),
        };
        assert!(not_ready.is_retryable());
        assert!(!ProxyError::ProxyNotFound("MailerService".to_string()).is_retryable());
    }
}

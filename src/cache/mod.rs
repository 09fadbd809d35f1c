//! Proxy cache
//!
//! One file per proxy identifier in a single cache directory. Files are
//! written once by the generation winner and never modified afterwards.
//!
//! # Write protocol
//!
//! - The per-path lock is keyed by a SHA256 prefix of the cache path
//! - The winner re-checks for the file under the lock before generating
//! - Text goes to `<path>.<uuid>.tmp` in the same directory, then is renamed
//!   over `<path>`, so readers see no file or the complete file
//!
//! # Entry States
//!
//! | State | On disk | Lookup |
//! |-------|---------|--------|
//! | Absent | nothing | lock, generate, publish |
//! | Generating | temp file only | wait (or return early) |
//! | Published | `<id>.<suffix>` | returned immediately |

pub mod locks;
pub mod path;
pub mod resolver;

pub use locks::LockMap;
pub use path::{lock_key, sanitize, CachePaths};
pub use resolver::{CacheEntry, ClearReport, ProxyCacheResolver};

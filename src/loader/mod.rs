//! Lookup hook and loader chain
//!
//! ```text
//! load(id) ──▶ LoaderManager ──▶ Resolver 1 ──declined──▶ Resolver 2 ...
//!                                    │
//!                                 claimed ──▶ read file ──▶ LoadedProxy
//! ```

pub mod context;
pub mod hook;
pub mod manager;
pub mod mapping;

pub use context::ProxyContext;
pub use hook::{ProxyResolver, Resolution, Resolver};
pub use manager::{LoadedProxy, LoaderManager};
pub use mapping::ProxyMapping;

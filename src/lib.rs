//! lazyproxy - lazy proxy generator
//!
//! Generates stand-in types that expose a target type's public operations
//! and resolve the real instance on first call. Generated sources are
//! published to an on-disk cache with at most one writer per proxy.

pub mod builder;
pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod journal;
pub mod loader;
pub mod source;
pub mod ui;

pub use error::{ProxyError, ProxyResult};

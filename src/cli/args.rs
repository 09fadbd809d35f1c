//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// lazyproxy - lazy proxy generator
///
/// Generates stand-in types that resolve the real service only when one of
/// its operations is first called, and caches them on disk.
#[derive(Parser, Debug)]
#[command(name = "lazyproxy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LAZYPROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip project lazyproxy.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the lookup hook for an identifier and print the claimed path
    Resolve(ResolveArgs),

    /// Print the generated source of a proxy
    Show(ShowArgs),

    /// Show classification, strategy and operations without writing
    Inspect(InspectArgs),

    /// Generate every mapped proxy
    Warm(WarmArgs),

    /// List mapped proxies and their cache state
    List(ListArgs),

    /// Manage the proxy cache directory
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Proxy identifier
    pub identifier: String,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Proxy identifier
    pub identifier: String,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Proxy identifier
    pub identifier: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct WarmArgs {
    /// Stop at the first failure
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a lazyproxy.toml with defaults in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list-style commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Plain,
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Print the cache directory
    Path,

    /// List cached proxy files
    List {
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove cached proxies and stray temp files
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

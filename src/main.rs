//! lazyproxy - lazy proxy generator
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use lazyproxy::cli::args::ConfigAction;
use lazyproxy::cli::{commands, Cli, Commands};
use lazyproxy::config::{Config, ConfigManager};
use lazyproxy::error::{ProxyError, ProxyResult};
use lazyproxy::loader::ProxyContext;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ProxyResult<()> {
    let cli = Cli::parse();

    let manager = config_manager(&cli)?;
    let config = match &cli.command {
        Commands::Config(args) if matches!(args.action, Some(ConfigAction::Init { .. })) => {
            Config::default()
        }
        _ => load_config(&cli, &manager).await?,
    };

    init_logging(cli.verbose, &config.general.log_format);
    debug!("Using configuration at {}", manager.path().display());

    match cli.command {
        Commands::Config(args) => commands::config(args, &config, &manager).await,
        command => dispatch(command, &config).await,
    }
}

async fn dispatch(command: Commands, config: &Config) -> ProxyResult<()> {
    let ctx = ProxyContext::from_config(config)?;

    match command {
        Commands::Config(_) => unreachable!("config handled in run"),
        Commands::Resolve(args) => commands::resolve(args, &ctx).await,
        Commands::Show(args) => commands::show(args, &ctx).await,
        Commands::Inspect(args) => commands::inspect(args, &ctx).await,
        Commands::Warm(args) => commands::warm(args, &ctx).await,
        Commands::List(args) => commands::list(args, &ctx).await,
        Commands::Cache(args) => commands::cache(args, &ctx).await,
    }
}

/// `--config`, else the nearest project `lazyproxy.toml`, else the global file
fn config_manager(cli: &Cli) -> ProxyResult<ConfigManager> {
    if let Some(path) = &cli.config {
        return Ok(ConfigManager::with_path(path.clone()));
    }
    if !cli.no_local {
        let cwd = std::env::current_dir()
            .map_err(|e| ProxyError::io("getting current directory", e))?;
        if let Some(local) = ConfigManager::find_local_config(&cwd) {
            return Ok(ConfigManager::with_path(local));
        }
    }
    Ok(ConfigManager::new())
}

async fn load_config(cli: &Cli, manager: &ConfigManager) -> ProxyResult<Config> {
    if cli.config.is_some() && !manager.path().exists() {
        return Err(ProxyError::ConfigNotFound(manager.path().to_path_buf()));
    }
    manager.load().await
}

/// 0 = warn, 1 = info, 2+ = debug; logs go to stderr
fn init_logging(verbose: u8, format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("lazyproxy=warn"),
        1 => EnvFilter::new("lazyproxy=info"),
        _ => EnvFilter::new("lazyproxy=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

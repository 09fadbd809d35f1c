//! List command - mapped proxies and their cache state

use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::ProxyResult;
use crate::loader::ProxyContext;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ListedProxy {
    identifier: String,
    target: String,
    cached: bool,
    path: PathBuf,
}

pub async fn execute(args: ListArgs, ctx: &ProxyContext) -> ProxyResult<()> {
    let mut proxies = Vec::with_capacity(ctx.mapping.len());
    for (identifier, target) in ctx.mapping.iter() {
        proxies.push(ListedProxy {
            identifier: identifier.to_string(),
            target: target.to_string(),
            cached: ctx.cache.is_cached(identifier).await?,
            path: ctx.cache.cache_path(identifier),
        });
    }

    if proxies.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(&UiContext::detect(), "No proxies mapped"),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&proxies),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&proxies)?),
        OutputFormat::Plain => {
            for proxy in &proxies {
                println!("{}", proxy.identifier);
            }
        }
    }
    Ok(())
}

fn print_table(proxies: &[ListedProxy]) {
    println!(
        "{:<28} {:<40} {:<8}",
        style("IDENTIFIER").bold(),
        style("TARGET").bold(),
        style("CACHE").bold()
    );
    println!("{}", "-".repeat(78));

    for proxy in proxies {
        let state = if proxy.cached {
            style("cached").green()
        } else {
            style("missing").dim()
        };
        println!("{:<28} {:<40} {:<8}", proxy.identifier, proxy.target, state);
    }

    let cached = proxies.iter().filter(|p| p.cached).count();
    println!();
    println!("{} proxies, {} cached", proxies.len(), cached);
}

//! Cache command - inspect and clear the proxy cache

use crate::cache::CacheEntry;
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::error::ProxyResult;
use crate::loader::ProxyContext;
use crate::ui::{self, UiContext};
use console::style;

pub async fn execute(args: CacheArgs, ctx: &ProxyContext) -> ProxyResult<()> {
    match args.action {
        CacheAction::Path => {
            println!("{}", ctx.cache.paths().dir().display());
            Ok(())
        }
        CacheAction::List { format } => list_entries(ctx, format).await,
        CacheAction::Clear { yes } => clear(ctx, yes).await,
    }
}

async fn list_entries(ctx: &ProxyContext, format: OutputFormat) -> ProxyResult<()> {
    let entries = ctx.cache.entries().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.path.display());
            }
        }
        OutputFormat::Table if entries.is_empty() => {
            ui::step_info(&UiContext::detect(), "Cache is empty");
        }
        OutputFormat::Table => print_table(&entries),
    }
    Ok(())
}

fn print_table(entries: &[CacheEntry]) {
    println!(
        "{:<32} {:>10} {:<20}",
        style("PROXY").bold(),
        style("BYTES").bold(),
        style("MODIFIED").bold()
    );
    println!("{}", "-".repeat(64));

    for entry in entries {
        let modified = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<32} {:>10} {:<20}", entry.name, entry.size, modified);
    }

    println!();
    println!("Total: {} cached proxies", entries.len());
}

async fn clear(ctx: &ProxyContext, yes: bool) -> ProxyResult<()> {
    let ui = UiContext::detect().with_auto_yes(yes);
    let dir = ctx.cache.paths().dir();

    let prompt = format!("Remove all cached proxies in {}?", dir.display());
    if !ui::confirm(&ui, &prompt, false).await? {
        ui::outro_warn(&ui, "Aborted, nothing removed");
        return Ok(());
    }

    let report = ctx.cache.clear().await?;
    ui::step_ok_detail(
        &ui,
        &format!("Removed {} cached proxies", report.entries),
        &format!("{} temp files", report.temp_files),
    );
    Ok(())
}

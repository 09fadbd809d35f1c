//! Inspect command - classification and operations of a target

use crate::cli::args::{InspectArgs, OutputFormat};
use crate::error::{ProxyError, ProxyResult};
use crate::generate::Inspection;
use crate::loader::ProxyContext;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct InspectReport {
    identifier: String,
    cache_path: PathBuf,
    cached: bool,
    #[serde(flatten)]
    inspection: Inspection,
}

pub async fn execute(args: InspectArgs, ctx: &ProxyContext) -> ProxyResult<()> {
    let target = ctx
        .mapping
        .target(&args.identifier)
        .ok_or_else(|| ProxyError::ProxyNotFound(args.identifier.clone()))?;

    let inspection = ctx.cache.generator().inspect(&args.identifier, target).await?;
    let report = InspectReport {
        cache_path: ctx.cache.cache_path(&args.identifier),
        cached: ctx.cache.is_cached(&args.identifier).await?,
        identifier: args.identifier,
        inspection,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => {
            for op in &report.inspection.operations {
                println!("{}", op);
            }
        }
        OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &InspectReport) {
    let ui = UiContext::detect();
    let inspection = &report.inspection;

    ui::intro(&ui, &report.identifier);
    ui::key_value(&ui, "target", &inspection.target);
    ui::key_value(&ui, "classification", &inspection.classification.to_string());
    ui::key_value(&ui, "strategy", &inspection.strategy.to_string());
    ui::key_value(&ui, "cache", &report.cache_path.display().to_string());
    ui::key_value(&ui, "cached", if report.cached { "yes" } else { "no" });

    if inspection.classification.is_unsupported() {
        ui::step_warn_hint(
            &ui,
            &format!("{} is {}", inspection.target, inspection.classification),
            "proxy will not extend or implement it",
        );
    }

    ui::section(&ui, &format!("Operations ({})", inspection.operations.len()));
    for op in &inspection.operations {
        println!("  {}", style(op).dim());
    }
}

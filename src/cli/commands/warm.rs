//! Warm command - generate every mapped proxy

use crate::cli::args::WarmArgs;
use crate::error::{ProxyError, ProxyResult};
use crate::loader::ProxyContext;
use crate::ui::{self, UiContext, WarmProgress};
use futures_util::future::{join_all, try_join_all};

pub async fn execute(args: WarmArgs, ctx: &ProxyContext) -> ProxyResult<()> {
    let ui = UiContext::detect();
    let identifiers: Vec<&str> = ctx.mapping.iter().map(|(id, _)| id).collect();

    if identifiers.is_empty() {
        ui::step_info(&ui, "No proxies mapped");
        ui::remark(&ui, "Add entries to the [proxies] section of lazyproxy.toml");
        return Ok(());
    }

    let progress = WarmProgress::new(&ui, identifiers.len() as u64);
    let cache = &ctx.cache;
    let progress_ref = &progress;

    if args.fail_fast {
        let result = try_join_all(identifiers.iter().map(|id| async move {
            let path = cache.ensure_cached(id).await;
            progress_ref.done(id, path.is_ok());
            path
        }))
        .await;
        progress.finish();
        let paths = result?;
        ui::outro_success(&ui, &format!("{} proxies ready", paths.len()));
        return Ok(());
    }

    let results = join_all(identifiers.iter().map(|id| async move {
        let result = cache.ensure_cached(id).await;
        progress_ref.done(id, result.is_ok());
        (*id, result)
    }))
    .await;
    progress.finish();

    let mut failed = 0usize;
    for (id, result) in &results {
        if let Err(e) = result {
            failed += 1;
            ui::step_error_detail(&ui, id, &e.to_string());
            if let Some(hint) = e.hint() {
                ui::remark(&ui, hint);
            }
        }
    }

    if failed > 0 {
        return Err(ProxyError::User(format!(
            "{} of {} proxies failed to generate",
            failed,
            results.len()
        )));
    }

    ui::outro_success(&ui, &format!("{} proxies ready", results.len()));
    Ok(())
}

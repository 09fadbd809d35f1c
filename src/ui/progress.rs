//! Progress bar with plain fallback

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress over a known number of proxies
///
/// An indicatif bar in interactive mode, one line per proxy otherwise.
pub struct WarmProgress {
    bar: Option<ProgressBar>,
}

impl WarmProgress {
    pub fn new(ctx: &UiContext, total: u64) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(total);
            let template = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} Warming  {bar:24.cyan/dim} {pos}/{len} {msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .progress_chars("━╸─");
            bar.set_style(template);
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            println!("Warming {} proxies...", total);
            None
        };
        Self { bar }
    }

    /// Record one finished proxy
    pub fn done(&self, identifier: &str, ok: bool) {
        match &self.bar {
            Some(bar) => {
                bar.set_message(identifier.to_string());
                bar.inc(1);
            }
            None => {
                let tag = if ok {
                    style("[OK]").green()
                } else {
                    style("[FAIL]").red()
                };
                println!("  {} {}", tag, identifier);
            }
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

//! Terminal output for the CLI
//!
//! Uses `cliclack` in interactive terminals and plain prefixed lines in CI or
//! when output is piped, so scripted callers get stable text.
//!
//! # Example
//!
//! ```rust,ignore
//! use lazyproxy::ui::{self, UiContext, WarmProgress};
//!
//! let ctx = UiContext::detect();
//!
//! let progress = WarmProgress::new(&ctx, 1);
//! progress.done("MailerService", true);
//! progress.finish();
//!
//! ui::step_warn_hint(&ctx, "services.Mailer is final", "Proxy has no type relationship");
//! ```

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, outro_warn, remark, section, step_error_detail, step_info,
    step_ok_detail, step_warn_hint,
};
pub use progress::WarmProgress;
pub use prompts::confirm;

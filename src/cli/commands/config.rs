//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, CONFIG_FILE_NAME};
use crate::error::{ProxyError, ProxyResult};
use crate::ui::{self, UiContext};

pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> ProxyResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => {
            println!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        Some(ConfigAction::Path) => {
            println!("{}", manager.path().display());
            Ok(())
        }
        Some(ConfigAction::Init { force }) => init(force).await,
    }
}

/// Write a default project config with an example mapping
async fn init(force: bool) -> ProxyResult<()> {
    let ui = UiContext::detect();
    let cwd = std::env::current_dir().map_err(|e| ProxyError::io("getting current directory", e))?;
    let path = cwd.join(CONFIG_FILE_NAME);

    if path.exists() && !force {
        ui::step_warn_hint(
            &ui,
            &format!("{} already exists", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    let mut config = Config::default();
    config
        .proxies
        .insert("MailerService".to_string(), "services.Mailer".to_string());

    ConfigManager::with_path(path.clone()).save(&config).await?;
    ui::step_ok_detail(&ui, "Configuration initialized", &path.display().to_string());
    Ok(())
}

//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{TallyError, TallyResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `tally config set`
const KEYS: &[&str] = &[
    "general.verbose",
    "general.log_format",
    "general.audit_log",
    "api.base_url",
    "api.timeout_secs",
    "api.user_agent",
    "session.credential_file",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> TallyResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            // Start from the file, not the merged view, so CLI overrides are not persisted
            let mut stored = manager.load().await?;
            set_value(&mut stored, &key, &value)?;
            manager.save(&stored).await?;
            ui::step_ok(&UiContext::detect(), &format!("Set {} = {}", key, value));
        }
    }
    Ok(())
}

fn show_config(config: &Config) -> TallyResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> TallyResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
    Ok(())
}

/// Apply `key = value` to `config`
fn set_value(config: &mut Config, key: &str, value: &str) -> TallyResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(TallyError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )))
            }
        },
        ["general", "audit_log"] => config.general.audit_log = parse_bool(value)?,

        ["api", "base_url"] => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(TallyError::User(format!(
                    "Invalid base URL: {}. It must start with http:// or https://",
                    value
                )));
            }
            config.api.base_url = value.trim_end_matches('/').to_string();
        }
        ["api", "timeout_secs"] => {
            config.api.timeout_secs = value
                .parse()
                .map_err(|_| TallyError::User(format!("Invalid number: {}", value)))?
        }
        ["api", "user_agent"] => config.api.user_agent = value.to_string(),

        ["session", "credential_file"] => {
            config.session.credential_file = match value {
                "" => None,
                path => Some(PathBuf::from(path)),
            }
        }

        _ => {
            return Err(TallyError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                KEYS.join(", ")
            )))
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> TallyResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(TallyError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

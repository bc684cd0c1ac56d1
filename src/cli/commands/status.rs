//! Status command - session and configuration overview

use crate::cli::App;
use crate::config::{Config, ConfigManager};
use crate::error::TallyResult;
use crate::session::SessionStatus;
use crate::ui;

/// Execute the status command. Reads local state only.
pub async fn execute(config: &Config, config_path: &std::path::Path) -> TallyResult<()> {
    let app = App::open(config).await?;
    let ctx = &app.ui;

    ui::intro(ctx, "Tally status");

    ui::section(ctx, "Session");
    let session = app.store.session().session();
    let (label, ok) = match session.status() {
        SessionStatus::Authenticated => ("logged in", true),
        SessionStatus::Anonymous => ("not logged in", false),
    };
    ui::key_value_status(ctx, "State", label, ok);
    ui::key_value(ctx, "Token file", &app.credential_path().display().to_string());

    ui::section(ctx, "Configuration");
    ui::key_value(ctx, "API", &config.api.base_url);
    ui::key_value(ctx, "Timeout", &format!("{}s", config.api.timeout_secs));
    ui::key_value(ctx, "Config file", &config_path.display().to_string());
    ui::key_value(
        ctx,
        "Audit log",
        &if config.general.audit_log {
            ConfigManager::audit_log_path().display().to_string()
        } else {
            "disabled".to_string()
        },
    );

    if !ok {
        println!();
        ui::remark(ctx, "Run: tally login");
    }
    Ok(())
}

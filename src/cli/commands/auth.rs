//! Login, register and logout commands

use super::{cache_counts, report_failure};
use crate::cli::args::LoginArgs;
use crate::cli::App;
use crate::config::Config;
use crate::error::{TallyError, TallyResult};
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the login command
pub async fn login(args: LoginArgs, config: &Config) -> TallyResult<()> {
    let app = App::open(config).await?;
    let (email, password) = read_credentials(&app.ui, &args).await?;

    let mut spinner = TaskSpinner::new(&app.ui);
    spinner.start(&format!("Logging in to {}...", config.api.base_url));
    match app.store.login(&email, &password).await {
        Ok(()) => {
            spinner.stop(&format!("Logged in as {}", email));
            ui::remark(&app.ui, &cache_counts(&app.store.snapshot()));
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Login failed");
            if app.store.is_authenticated() {
                ui::step_warn_hint(
                    &app.ui,
                    "Logged in, but loading your data failed",
                    "Run: tally sync",
                );
            }
            report_failure(&app, &e);
            Err(e)
        }
    }
}

/// Execute the register command
pub async fn register(args: LoginArgs, config: &Config) -> TallyResult<()> {
    let app = App::open(config).await?;
    let (email, password) = read_credentials(&app.ui, &args).await?;

    let mut spinner = TaskSpinner::new(&app.ui);
    spinner.start("Creating account...");
    match app.store.register(&email, &password).await {
        Ok(()) => {
            spinner.stop(&format!("Account created, logged in as {}", email));
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Registration failed");
            if let Some(detail) = e.detail() {
                ui::step_error_detail(&app.ui, "Server said", &detail);
            }
            Err(e)
        }
    }
}

/// Execute the logout command
pub async fn logout(config: &Config) -> TallyResult<()> {
    let app = App::open(config).await?;
    if !app.store.is_authenticated() {
        ui::step_info(&app.ui, "Not logged in");
        return Ok(());
    }

    app.store.logout().await?;
    ui::step_ok(&app.ui, "Logged out");
    Ok(())
}

async fn read_credentials(ctx: &UiContext, args: &LoginArgs) -> TallyResult<(String, String)> {
    let email = match &args.email {
        Some(email) => email.trim().to_string(),
        None => ui::input(ctx, "Email").await?.trim().to_string(),
    };

    let password = if args.password_stdin {
        read_password_line().await?
    } else {
        ui::password(ctx, "Password").await?
    };

    if password.is_empty() {
        return Err(TallyError::User("Password must not be empty".to_string()));
    }
    Ok((email, password))
}

/// First line of stdin without its line ending
async fn read_password_line() -> TallyResult<String> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await
    .map_err(|e| TallyError::Internal(format!("stdin task failed: {}", e)))?
    .map_err(|e| TallyError::io("reading password from stdin", e))?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

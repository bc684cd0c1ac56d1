//! Prompts that refuse to block in non-interactive runs

use super::context::UiContext;
use crate::error::{TallyError, TallyResult};

/// Ask a yes/no question; returns `default` when no one can answer
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> TallyResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }
    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    blocking(move || {
        cliclack::confirm(message)
            .initial_value(default)
            .interact()
    })
    .await
}

/// Ask for a line of text
pub async fn input(ctx: &UiContext, message: &str) -> TallyResult<String> {
    if !ctx.is_interactive() {
        return Err(TallyError::User(format!(
            "{} is required when not running in a terminal",
            message
        )));
    }

    let message = message.to_string();
    blocking(move || {
        cliclack::input(message)
            .validate(|value: &String| {
                if value.trim().is_empty() {
                    Err("Value is required")
                } else {
                    Ok(())
                }
            })
            .interact()
    })
    .await
}

/// Ask for a secret without echoing it
pub async fn password(ctx: &UiContext, message: &str) -> TallyResult<String> {
    if !ctx.is_interactive() {
        return Err(TallyError::User(
            "Password is required: pass --password-stdin when not running in a terminal"
                .to_string(),
        ));
    }

    let message = message.to_string();
    blocking(move || cliclack::password(message).mask('▪').interact()).await
}

/// cliclack prompts block on stdin
async fn blocking<T, F>(prompt: F) -> TallyResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> std::io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| TallyError::Internal(format!("Prompt task failed: {}", e)))?
        .map_err(|e| TallyError::User(format!("Prompt cancelled: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_auto_yes() {
        let ctx = UiContext::non_interactive().with_auto_yes(true);
        assert!(confirm(&ctx, "Delete?", false).await.unwrap());
    }

    #[tokio::test]
    async fn confirm_non_interactive_default() {
        let ctx = UiContext::non_interactive();
        assert!(confirm(&ctx, "Delete?", true).await.unwrap());
        assert!(!confirm(&ctx, "Delete?", false).await.unwrap());
    }

    #[tokio::test]
    async fn password_refuses_without_terminal() {
        let ctx = UiContext::non_interactive();
        let err = password(&ctx, "Password").await.unwrap_err();
        assert!(err.to_string().contains("--password-stdin"));
    }

    #[tokio::test]
    async fn input_refuses_without_terminal() {
        let ctx = UiContext::non_interactive();
        assert!(input(&ctx, "Email").await.is_err());
    }
}

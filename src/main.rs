//! Tally CLI entry point

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tally::cli::{commands, Cli, Commands};
use tally::config::{Config, ConfigManager};
use tally::error::TallyResult;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> TallyResult<()> {
    let cli = Cli::parse();

    // Completions must not depend on a readable config
    if let Commands::Completions { shell } = cli.command {
        commands::completions(shell);
        return Ok(());
    }

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = manager.load().await?;
    if let Some(ref url) = cli.api_url {
        config.api.base_url = url.trim_end_matches('/').to_string();
    }

    init_logging(cli.verbose, &config);
    debug!("Using config {}", manager.path().display());
    debug!("API base URL {}", config.api.base_url);

    ConfigManager::ensure_state_dirs().await?;
    tally::ui::init_theme();

    match cli.command {
        Commands::Completions { .. } => Ok(()),
        Commands::Login(args) => commands::login(args, &config).await,
        Commands::Register(args) => commands::register(args, &config).await,
        Commands::Logout => commands::logout(&config).await,
        Commands::Status => commands::status(&config, manager.path()).await,
        Commands::Sync => commands::sync(&config).await,
        Commands::Summary(args) => commands::summary(args, &config).await,
        Commands::Categories(args) => commands::categories(args, &config).await,
        Commands::Transactions(args) => commands::transactions(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &manager).await,
    }
}

/// 0 = errors only (failures are printed by `main`), 1 = info, 2+ = debug.
/// `RUST_LOG` wins when set.
fn init_logging(verbose: u8, config: &Config) {
    let level = match verbose {
        0 if config.general.verbose => "tally=info",
        0 => "tally=error",
        1 => "tally=info",
        _ => "tally=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

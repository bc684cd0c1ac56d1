//! Sync command - reload everything from the API

use super::{cache_counts, report_failure};
use crate::cli::App;
use crate::config::Config;
use crate::error::TallyResult;
use crate::navigation::HOME_PATH;
use crate::ui::TaskSpinner;

/// Execute the sync command
pub async fn execute(config: &Config) -> TallyResult<()> {
    let app = App::open(config).await?;
    app.require(HOME_PATH)?;

    let mut spinner = TaskSpinner::new(&app.ui);
    spinner.start("Syncing...");
    if let Err(e) = app.store.load_all().await {
        spinner.stop_error("Sync failed");
        report_failure(&app, &e);
        return Err(e);
    }
    spinner.stop(&format!("Synced {}", cache_counts(&app.store.snapshot())));
    Ok(())
}

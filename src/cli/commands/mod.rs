//! CLI command implementations

pub mod auth;
pub mod categories;
pub mod completions;
pub mod config;
pub mod status;
pub mod summary;
pub mod sync;
pub mod transactions;

pub use auth::{login, logout, register};
pub use categories::execute as categories;
pub use completions::execute as completions;
pub use config::execute as config;
pub use status::execute as status;
pub use summary::execute as summary;
pub use sync::execute as sync;
pub use transactions::execute as transactions;

use crate::cache::CacheState;
use crate::cli::App;
use crate::error::TallyError;
use crate::ui;

/// One-line description of what the cache holds
pub(crate) fn cache_counts(cache: &CacheState) -> String {
    format!(
        "{} categories, {} transactions",
        cache.categories.len(),
        cache.transactions.len()
    )
}

/// Extra context after a failed API call
pub(crate) fn report_failure(app: &App, err: &TallyError) {
    if app.sent_to_login() && err.is_unauthorized() {
        ui::remark(&app.ui, "Your session was closed and the cached data cleared");
    }
}

//! Store wiring shared by the commands that talk to the API

use crate::audit::AuditLog;
use crate::config::{Config, ConfigManager};
use crate::credentials::FileCredentialStore;
use crate::error::{TallyError, TallyResult};
use crate::navigation::{Access, RecordingNavigator, LOGIN_PATH};
use crate::store::Store;
use crate::transport::HttpTransport;
use crate::ui::UiContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// A store restored from the on-disk token, plus the terminal it reports to
pub struct App {
    pub store: Store,
    pub ui: UiContext,
    navigator: Arc<RecordingNavigator>,
    credential_path: PathBuf,
}

impl App {
    /// Build the store for `config` and restore any saved session
    pub async fn open(config: &Config) -> TallyResult<Self> {
        let credential_path = ConfigManager::credential_path(config);
        let transport = Arc::new(HttpTransport::new(&config.api));
        let credentials = Arc::new(FileCredentialStore::new(credential_path.clone()));
        let navigator = Arc::new(RecordingNavigator::new());

        let store = Store::new(transport, credentials, navigator.clone())
            .with_audit(AuditLog::new(config));
        if store.restore().await? {
            debug!("Using session from {}", credential_path.display());
        }

        Ok(Self {
            store,
            ui: UiContext::detect(),
            navigator,
            credential_path,
        })
    }

    /// Fail with [`TallyError::NotAuthenticated`] if the gate redirects `route`
    pub fn require(&self, route: &str) -> TallyResult<()> {
        match self.store.gate().check(route) {
            Access::Allow => Ok(()),
            Access::Redirect(_) => Err(TallyError::NotAuthenticated),
        }
    }

    /// Whether the last store directive sent the user back to the login view
    pub fn sent_to_login(&self) -> bool {
        self.navigator.current().as_deref() == Some(LOGIN_PATH)
    }

    pub fn credential_path(&self) -> &PathBuf {
        &self.credential_path
    }
}

//! Session lifecycle management
//!
//! Owns the token and keeps its three copies in step: the in-memory
//! session, the persisted credential, and the transport's bearer header.

use crate::audit::AuditLog;
use crate::credentials::CredentialStore;
use crate::error::TallyResult;
use crate::session::state::{AuthSignal, Session};
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Session manager handles token establishment, restore and teardown
pub struct SessionManager {
    state: watch::Sender<Session>,
    credentials: Arc<dyn CredentialStore>,
    transport: Arc<dyn Transport>,
    audit: Option<AuditLog>,
}

impl SessionManager {
    /// Create an anonymous session manager
    pub fn new(credentials: Arc<dyn CredentialStore>, transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(Session::anonymous());
        Self {
            state,
            credentials,
            transport,
            audit: None,
        }
    }

    /// Record lifecycle events in `audit`
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Seed the session from the credential store.
    ///
    /// Returns whether a token was found.
    pub async fn restore(&self) -> TallyResult<bool> {
        let Some(token) = self.credentials.get().await? else {
            debug!("No stored session");
            return Ok(false);
        };

        let session = Session::authenticated(token)?;
        self.transport.set_bearer(session.token());
        self.state.send_replace(session);

        debug!("Restored stored session");
        Ok(true)
    }

    /// Adopt a freshly issued token
    pub async fn establish(&self, token: String) -> TallyResult<()> {
        let session = Session::authenticated(token)?;

        if let Some(token) = session.token() {
            self.credentials.set(token).await?;
        }
        self.transport.set_bearer(session.token());
        self.state.send_replace(session);

        info!("Session established");
        Ok(())
    }

    /// Drop the token everywhere. Safe to call when already anonymous.
    ///
    /// The in-memory session and bearer header are always cleared; a
    /// failure to remove the persisted credential is returned afterwards.
    pub async fn clear(&self) -> TallyResult<()> {
        let was_authenticated = self.is_authenticated();

        self.state.send_replace(Session::anonymous());
        self.transport.set_bearer(None);

        if let Err(e) = self.credentials.remove().await {
            warn!("Failed to remove stored session token: {}", e);
            return Err(e);
        }

        if was_authenticated {
            info!("Session cleared");
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribe to authentication changes
    pub fn signal(&self) -> AuthSignal {
        AuthSignal::new(self.state.subscribe())
    }

    pub(crate) async fn audit(&self, event: &str, data: serde_json::Value) {
        if let Some(ref audit) = self.audit {
            audit.log(event, &data).await;
        }
    }
}

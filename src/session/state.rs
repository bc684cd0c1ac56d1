//! Session token state and the authentication signal

use crate::error::{TallyError, TallyResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

/// Current session: no token, or a non-empty opaque token
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// Session with no credential
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session holding `token`. Empty tokens are rejected.
    pub fn authenticated(token: impl Into<String>) -> TallyResult<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(TallyError::InvalidToken);
        }
        Ok(Self { token: Some(token) })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }
}

// Never print the token itself
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status())
            .finish()
    }
}

/// Read-only view of whether a session is active
///
/// Handed to the navigation gate and to views; cloning is cheap and every
/// clone observes the same session.
#[derive(Debug, Clone)]
pub struct AuthSignal {
    rx: watch::Receiver<Session>,
}

impl AuthSignal {
    pub(crate) fn new(rx: watch::Receiver<Session>) -> Self {
        Self { rx }
    }

    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_authenticated()
    }

    /// Wait until the session changes, then report the new state.
    /// Returns `None` once the owning session manager is gone.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().is_authenticated())
    }
}

//! Session-and-data-cache coordinator
//!
//! [`Store`] is the single entry point views use. It sequences the network
//! calls behind each action, keeps the domain cache consistent with the
//! server, and applies the failure policy from [`crate::policy`]:
//!
//! - a 401 from any data call logs the session out and still returns the error
//! - a conflict on category delete becomes [`DeleteOutcome::Blocked`]
//! - everything else is logged and returned unchanged
//!
//! Login and register report their own failures and never trigger a logout.
//!
//! Shared state lives in `watch` channels. No lock is held across an await;
//! state is only written once the responses it depends on have arrived.

mod auth;
mod data;

use crate::audit::AuditLog;
use crate::cache::CacheState;
use crate::credentials::CredentialStore;
use crate::error::{TallyError, TallyResult};
use crate::inflight::InFlight;
use crate::navigation::{NavigationGate, Navigator, LOGIN_PATH};
use crate::policy::{self, FailureClass, Operation};
use crate::session::{AuthSignal, SessionManager};
use crate::transport::{Body, Method, Response, Transport};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

pub use crate::policy::{DeleteOutcome, DomainConflict};

/// Client-side coordinator for the finance API
pub struct Store {
    session: SessionManager,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
    cache: watch::Sender<CacheState>,
    inflight: InFlight,
    /// Bumped whenever the session starts or ends; responses that straddle
    /// a bump are dropped
    epoch: AtomicU64,
}

impl Store {
    /// Create a store with an anonymous session and an empty cache
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (cache, _) = watch::channel(CacheState::default());
        Self {
            session: SessionManager::new(credentials, Arc::clone(&transport)),
            transport,
            navigator,
            cache,
            inflight: InFlight::new(),
            epoch: AtomicU64::new(0),
        }
    }

    /// Record session lifecycle events in `audit`
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.session = self.session.with_audit(audit);
        self
    }

    /// Seed the session from the credential store. Call once at startup.
    pub async fn restore(&self) -> TallyResult<bool> {
        let restored = self.session.restore().await?;
        if restored {
            self.bump_epoch();
        }
        Ok(restored)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Authentication signal for gates and views
    pub fn auth_signal(&self) -> AuthSignal {
        self.session.signal()
    }

    /// Navigation gate bound to this store's session
    pub fn gate(&self) -> NavigationGate {
        NavigationGate::new(self.auth_signal())
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Copy of the cached data
    pub fn snapshot(&self) -> CacheState {
        self.cache.borrow().clone()
    }

    /// Receive every cache change
    pub fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.cache.subscribe()
    }

    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    fn bump_epoch(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Apply `update` to the cache unless the session changed since `epoch`
    fn apply(&self, epoch: u64, update: impl FnOnce(&mut CacheState)) -> bool {
        if self.current_epoch() != epoch {
            debug!("Discarding response from a previous session");
            return false;
        }
        self.cache.send_modify(update);
        true
    }

    async fn send(&self, method: Method, path: &str, body: Body) -> TallyResult<Response> {
        self.transport.request(method, path, body).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> TallyResult<T> {
        self.send(Method::Get, path, Body::Empty).await?.json()
    }

    /// Run `work` and route its failure through the policy
    async fn policed<T>(
        &self,
        operation: Operation,
        work: impl Future<Output = TallyResult<T>>,
    ) -> TallyResult<T> {
        let epoch = self.current_epoch();
        match work.await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.handle_failure(operation, epoch, err).await),
        }
    }

    /// Act on a failed operation started under `epoch` and hand back the
    /// error to propagate. A 401 for a session that has since ended or been
    /// replaced does not log out the current one.
    async fn handle_failure(
        &self,
        operation: Operation,
        epoch: u64,
        err: TallyError,
    ) -> TallyError {
        match policy::classify(operation, &err) {
            FailureClass::SessionInvalid if self.current_epoch() != epoch => {
                debug!("{} rejected for a previous session, ignoring", operation);
            }
            FailureClass::SessionInvalid => {
                warn!("{} failed: session rejected by server, logging out", operation);
                if let Err(e) = self.end_session("session.expired").await {
                    warn!("Logout after session expiry incomplete: {}", e);
                }
            }
            // Only delete_category turns conflicts into warnings; it
            // intercepts them before reaching here
            FailureClass::DomainConflict | FailureClass::Other => {
                warn!("{} failed: {}", operation, err);
            }
        }
        err
    }

    /// Clear the session and cache, then send the user to the login view
    async fn end_session(&self, event: &str) -> TallyResult<()> {
        let was_authenticated = self.session.is_authenticated();

        self.bump_epoch();
        let cleared = self.session.clear().await;
        self.cache.send_modify(CacheState::reset);

        if was_authenticated {
            self.session.audit(event, serde_json::json!({})).await;
        }
        self.navigator.navigate(LOGIN_PATH);
        cleared
    }
}

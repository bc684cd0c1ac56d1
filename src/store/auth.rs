//! Login, registration and logout

use super::Store;
use crate::cache::{CacheState, Credentials, TokenGrant};
use crate::error::TallyResult;
use crate::navigation::HOME_PATH;
use crate::policy::Operation;
use crate::transport::{Body, Method};
use serde_json::json;
use tracing::{info, warn};

impl Store {
    /// Exchange credentials for a session token, load all data, go home.
    ///
    /// The token is kept even when the initial data load fails; the load
    /// error is returned and no home navigation happens. A 401 during that
    /// load still logs out through the failure policy.
    pub async fn login(&self, email: &str, password: &str) -> TallyResult<()> {
        let _guard = self.inflight.acquire(Operation::Login, None)?;
        self.login_with(&Credentials::new(email, password)).await
    }

    /// Create an account, then log in with the same credentials
    pub async fn register(&self, email: &str, password: &str) -> TallyResult<()> {
        let _guard = self.inflight.acquire(Operation::Register, None)?;
        let credentials = Credentials::new(email, password);

        let body = Body::Json(serde_json::to_value(&credentials)?);
        if let Err(e) = self.send(Method::Post, "/register", body).await {
            warn!("Registration failed: {}", e);
            return Err(e);
        }

        info!("Account created for {}", credentials.email);
        self.session
            .audit("account.registered", json!({ "email": credentials.email }))
            .await;

        self.login_with(&credentials).await
    }

    /// End the session: token, bearer header and cache are all cleared.
    ///
    /// Idempotent. A failure to remove the persisted token is returned after
    /// every other effect has been applied.
    pub async fn logout(&self) -> TallyResult<()> {
        self.end_session("session.logout").await
    }

    async fn login_with(&self, credentials: &Credentials) -> TallyResult<()> {
        let grant = match self.request_token(credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!("Login failed: {}", e);
                return Err(e);
            }
        };

        if let Err(e) = self.session.establish(grant.access_token).await {
            warn!("Login failed: {}", e);
            return Err(e);
        }
        self.bump_epoch();
        self.cache.send_modify(CacheState::reset);

        info!("Logged in as {}", credentials.email);
        self.session
            .audit("session.login", json!({ "email": credentials.email }))
            .await;

        self.load_all().await?;
        self.navigator.navigate(HOME_PATH);
        Ok(())
    }

    async fn request_token(&self, credentials: &Credentials) -> TallyResult<TokenGrant> {
        let body = Body::Form(credentials.form_fields());
        self.send(Method::Post, "/token", body).await?.json()
    }
}

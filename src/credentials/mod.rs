//! Persisted session token storage
//!
//! A single opaque token survives process restarts. The file-backed store is
//! what the CLI uses; the in-memory store backs tests and embedders that
//! manage persistence themselves.

mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use crate::error::TallyResult;
use async_trait::async_trait;

/// Key-value surface holding one session token
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the stored token, if any
    async fn get(&self) -> TallyResult<Option<String>>;

    /// Replace the stored token
    async fn set(&self, token: &str) -> TallyResult<()>;

    /// Remove the stored token. Succeeds when nothing is stored.
    async fn remove(&self) -> TallyResult<()>;
}

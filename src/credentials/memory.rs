//! In-process token storage

use super::CredentialStore;
use crate::error::TallyResult;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Credential store that keeps the token in memory
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store, as if a previous process had logged in
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Current value without going through the async trait
    pub fn peek(&self) -> Option<String> {
        self.token.lock().clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> TallyResult<Option<String>> {
        Ok(self.token.lock().clone().filter(|t| !t.is_empty()))
    }

    async fn set(&self, token: &str) -> TallyResult<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> TallyResult<()> {
        self.token.lock().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(store.get().await.unwrap().is_none());

        store.set("T1").await.unwrap();
        assert_eq!(store.peek().as_deref(), Some("T1"));

        store.remove().await.unwrap();
        assert!(store.peek().is_none());
    }

    #[tokio::test]
    async fn memory_store_hides_empty_token() {
        let store = MemoryCredentialStore::with_token("");
        assert!(store.get().await.unwrap().is_none());
    }
}

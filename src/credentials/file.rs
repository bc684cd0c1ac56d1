//! Token file with restrictive permissions

use super::CredentialStore;
use crate::error::{TallyError, TallyResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// On-disk token record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Credential store backed by a single JSON file
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store at the given file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the token file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> TallyResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            TallyError::io(format!("reading token file {}", self.path.display()), e)
        })?;

        // A corrupt file is treated as no session rather than a hard failure
        let stored: StoredToken = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring unreadable token file {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        if stored.token.is_empty() {
            return Ok(None);
        }

        debug!("Loaded token saved at {}", stored.saved_at);
        Ok(Some(stored.token))
    }

    async fn set(&self, token: &str) -> TallyResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| TallyError::io("creating credentials directory", e))?;
        }

        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored)?;

        fs::write(&self.path, content).await.map_err(|e| {
            TallyError::io(format!("writing token file {}", self.path.display()), e)
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| TallyError::io("setting token file permissions", e))?;
        }

        debug!("Stored session token in {}", self.path.display());
        Ok(())
    }

    async fn remove(&self) -> TallyResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).await.map_err(|e| {
                TallyError::io(format!("removing token file {}", self.path.display()), e)
            })?;
            debug!("Removed token file {}", self.path.display());
        }
        Ok(())
    }
}

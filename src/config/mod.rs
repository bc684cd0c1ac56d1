//! Configuration management for Tally

pub mod schema;

pub use schema::Config;

use crate::error::{TallyError, TallyResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tally")
            .join("config.toml")
    }

    /// Get the state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tally")
    }

    /// Get the credentials directory path
    pub fn credentials_dir() -> PathBuf {
        Self::state_dir().join("credentials")
    }

    /// Get the audit log path
    pub fn audit_log_path() -> PathBuf {
        Self::state_dir().join("audit.log")
    }

    /// Token file for a given API server.
    ///
    /// Keyed by a short hash of the base URL so that sessions against
    /// different servers never overwrite each other.
    pub fn credential_path(config: &Config) -> PathBuf {
        if let Some(ref path) = config.session.credential_file {
            return path.clone();
        }

        let base = config.api.base_url.trim_end_matches('/');
        let digest = Sha256::digest(base.as_bytes());
        let key = hex::encode(&digest[..6]);
        Self::credentials_dir().join(format!("token-{}.json", key))
    }

    /// Load configuration, using defaults if not exists
    pub async fn load(&self) -> TallyResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> TallyResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| TallyError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| TallyError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> TallyResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            TallyError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> TallyResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| TallyError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Ensure all state directories exist
    pub async fn ensure_state_dirs() -> TallyResult<()> {
        let dirs = [Self::state_dir(), Self::credentials_dir()];

        for dir in &dirs {
            fs::create_dir_all(dir).await.map_err(|e| {
                TallyError::io(format!("creating directory {}", dir.display()), e)
            })?;
        }

        // Token files live here
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(Self::credentials_dir(), perms)
                .map_err(|e| TallyError::io("setting credentials dir permissions", e))?;
        }

        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.api.base_url = "https://api.example.com".to_string();

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.api.base_url, "https://api.example.com");
    }

    #[tokio::test]
    async fn load_invalid_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[api\nbase_url = 1").await.unwrap();

        let err = ConfigManager::with_path(path.clone()).load().await.unwrap_err();
        match err {
            TallyError::ConfigInvalid { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn credential_path_per_server() {
        let mut a = Config::default();
        a.api.base_url = "https://one.example.com".to_string();
        let mut b = Config::default();
        b.api.base_url = "https://two.example.com".to_string();

        assert_ne!(
            ConfigManager::credential_path(&a),
            ConfigManager::credential_path(&b)
        );

        // Trailing slash does not change the key
        let mut c = a.clone();
        c.api.base_url.push('/');
        assert_eq!(
            ConfigManager::credential_path(&a),
            ConfigManager::credential_path(&c)
        );
    }

    #[test]
    fn credential_path_override() {
        let mut config = Config::default();
        config.session.credential_file = Some(PathBuf::from("/tmp/token.json"));
        assert_eq!(
            ConfigManager::credential_path(&config),
            PathBuf::from("/tmp/token.json")
        );
    }
}

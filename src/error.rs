//! Error types for Tally
//!
//! All modules use `TallyResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Tally operations
pub type TallyResult<T> = Result<T, TallyError>;

/// All errors that can occur in Tally
#[derive(Error, Debug)]
pub enum TallyError {
    // Transport errors
    #[error("API request failed with status {status}{}", body_suffix(.body))]
    Http { status: u16, body: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),

    // Session errors
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Server issued an empty session token")]
    InvalidToken,

    #[error("Operation already in progress: {operation}")]
    Busy { operation: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) if !body.is_empty() => format!(": {}", body),
        _ => String::new(),
    }
}

impl TallyError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an HTTP status error
    pub fn http(status: u16, body: Option<String>) -> Self {
        Self::Http { status, body }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server rejected the session credential
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Server-provided `detail` message, when the body is a JSON error document
    pub fn detail(&self) -> Option<String> {
        let Self::Http {
            body: Some(body), ..
        } = self
        else {
            return None;
        };

        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotAuthenticated => Some("Run: tally login"),
            Self::Http { status: 401, .. } => Some("Session expired. Run: tally login"),
            Self::Network(_) => Some("Check api.base_url with: tally config show"),
            Self::Busy { .. } => Some("Wait for the previous request to finish"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TallyError::http(404, Some("{\"detail\":\"missing\"}".to_string()));
        assert!(err.to_string().contains("status 404"));
        assert!(err.to_string().contains("missing"));

        let err = TallyError::http(500, None);
        assert_eq!(err.to_string(), "API request failed with status 500");
    }

    #[test]
    fn error_hint() {
        assert_eq!(TallyError::NotAuthenticated.hint(), Some("Run: tally login"));
        assert!(TallyError::http(401, None).hint().is_some());
        assert!(TallyError::http(500, None).hint().is_none());
    }

    #[test]
    fn error_unauthorized() {
        assert!(TallyError::http(401, None).is_unauthorized());
        assert!(!TallyError::http(400, None).is_unauthorized());
        assert!(!TallyError::Network("refused".to_string()).is_unauthorized());
    }

    #[test]
    fn error_detail_from_body() {
        let err = TallyError::http(
            400,
            Some("{\"detail\":\"Email already registered\"}".to_string()),
        );
        assert_eq!(err.detail().as_deref(), Some("Email already registered"));

        assert!(TallyError::http(400, Some("not json".to_string()))
            .detail()
            .is_none());
    }
}

//! Resources served by the finance API

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier
pub type ResourceId = i64;

/// Color the server assigns when none is given
pub const DEFAULT_CATEGORY_COLOR: &str = "#3498db";

/// A spending/income category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,

    /// Fields the client does not interpret, kept as served
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Direction of a transaction
///
/// The server stores `type` as free text. Values other than `income` and
/// `expense` are kept verbatim so one odd row cannot fail a whole fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => f.write_str("income"),
            TransactionKind::Expense => f.write_str("expense"),
            TransactionKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: ResourceId,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category_id: Option<ResourceId>,
    pub date: NaiveDateTime,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Server-computed aggregate over all transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
}

/// Body for creating or updating a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CategoryPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Body for creating or updating a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: ResourceId,
}

/// Login/registration credentials
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// OAuth2 password-grant form fields expected by `/token`
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.email.clone()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}

/// `/token` response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

//! HTTP transport abstraction
//!
//! The store never talks to the network directly. It goes through a
//! [`Transport`], which resolves paths against the API base URL and attaches
//! the bearer credential configured by the session.

mod http;
pub mod scripted;

pub use http::HttpTransport;
pub use scripted::{RecordedRequest, ScriptedTransport};

use crate::error::{TallyError, TallyResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;

/// HTTP methods used by the finance API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
}

/// Successful (2xx) response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> TallyResult<T> {
        serde_json::from_str(&self.body).map_err(|e| TallyError::InvalidResponse(e.to_string()))
    }
}

/// Performs API calls on behalf of the store
///
/// Responses outside 2xx are returned as [`TallyError::Http`] carrying the
/// status code and raw body. Connection-level failures are
/// [`TallyError::Network`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request against a path relative to the API base URL
    async fn request(&self, method: Method, path: &str, body: Body) -> TallyResult<Response>;

    /// Set or clear the default `Authorization: Bearer` header
    fn set_bearer(&self, token: Option<&str>);

    /// Currently configured bearer token
    fn bearer(&self) -> Option<String>;
}

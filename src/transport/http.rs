//! Blocking `ureq` agent driven from tokio's blocking pool

use super::{Body, Method, Response, Transport};
use crate::config::schema::ApiConfig;
use crate::error::{TallyError, TallyResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::time::Duration;
use tracing::debug;

/// Body after JSON encoding, ready to move into the blocking task
enum Payload {
    Empty,
    Json(String),
    Form(Vec<(String, String)>),
}

/// Transport that talks to the real finance API
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    user_agent: String,
    bearer: RwLock<Option<String>>,
}

impl HttpTransport {
    /// Build a transport from API settings
    pub fn new(config: &ApiConfig) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            bearer: RwLock::new(None),
        }
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, body: Body) -> TallyResult<Response> {
        let payload = match body {
            Body::Empty => Payload::Empty,
            Body::Json(value) => Payload::Json(serde_json::to_string(&value)?),
            Body::Form(fields) => Payload::Form(fields),
        };

        let agent = self.agent.clone();
        let url = self.url(path);
        let bearer = self.bearer.read().clone();
        let user_agent = self.user_agent.clone();

        debug!("{} {}", method, url);

        let response = tokio::task::spawn_blocking(move || {
            send(&agent, method, &url, bearer.as_deref(), &user_agent, payload)
        })
        .await
        .map_err(|e| TallyError::Internal(format!("HTTP task failed: {}", e)))??;

        debug!("{} {} -> {}", method, path, response.status);

        if (200..300).contains(&response.status) {
            Ok(response)
        } else {
            let body = Some(response.body).filter(|b| !b.is_empty());
            Err(TallyError::http(response.status, body))
        }
    }

    fn set_bearer(&self, token: Option<&str>) {
        *self.bearer.write() = token.map(str::to_string);
    }

    fn bearer(&self) -> Option<String> {
        self.bearer.read().clone()
    }
}

fn with_headers<B>(
    request: ureq::RequestBuilder<B>,
    bearer: Option<&str>,
    user_agent: &str,
) -> ureq::RequestBuilder<B> {
    let request = request
        .header("Accept", "application/json")
        .header("User-Agent", user_agent);
    match bearer {
        Some(token) => request.header("Authorization", format!("Bearer {}", token)),
        None => request,
    }
}

fn send(
    agent: &ureq::Agent,
    method: Method,
    url: &str,
    bearer: Option<&str>,
    user_agent: &str,
    payload: Payload,
) -> TallyResult<Response> {
    let result = match method {
        Method::Get => with_headers(agent.get(url), bearer, user_agent).call(),
        Method::Delete => with_headers(agent.delete(url), bearer, user_agent).call(),
        Method::Post | Method::Put => {
            let request = if method == Method::Post {
                agent.post(url)
            } else {
                agent.put(url)
            };
            let request = with_headers(request, bearer, user_agent);
            match payload {
                Payload::Empty => request.send_empty(),
                Payload::Json(json) => request
                    .header("Content-Type", "application/json")
                    .send(json),
                Payload::Form(fields) => {
                    request.send_form(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                }
            }
        }
    };

    let mut response = result.map_err(|e| TallyError::Network(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TallyError::Network(format!("reading response body: {}", e)))?;

    Ok(Response { status, body })
}

//! Scripted in-memory transport
//!
//! Lets callers drive the store without a server: each `(method, path)` pair
//! has a queue of canned responses. Responses are consumed in order; once a
//! queue runs dry the last response served keeps being returned. Every
//! request is recorded together with the bearer token it carried.

use super::{Body, Method, Response, Transport};
use crate::error::{TallyError, TallyResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// A request as observed by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Body,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone)]
struct Scripted {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

type Hook = Box<dyn Fn(&RecordedRequest) + Send + Sync>;

/// Transport returning canned responses
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    last_served: Mutex<HashMap<(Method, String), Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
    bearer: Mutex<Option<String>>,
    hook: Mutex<Option<Hook>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method path`
    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.push(method, path, status, body.to_string(), None);
    }

    /// Queue a response that is delivered after `delay`
    pub fn respond_after(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: serde_json::Value,
        delay: Duration,
    ) {
        self.push(method, path, status, body.to_string(), Some(delay));
    }

    /// Queue a response with an empty body
    pub fn respond_empty(&self, method: Method, path: &str, status: u16) {
        self.push(method, path, status, String::new(), None);
    }

    fn push(&self, method: Method, path: &str, status: u16, body: String, delay: Option<Duration>) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Scripted {
                status,
                body,
                delay,
            });
    }

    /// Run `hook` synchronously whenever a request arrives, before responding
    pub fn set_hook(&self, hook: impl Fn(&RecordedRequest) + Send + Sync + 'static) {
        *self.hook.lock() = Some(Box::new(hook));
    }

    /// All requests seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests to `method path`
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn next_response(&self, method: Method, path: &str) -> Option<Scripted> {
        let key = (method, path.to_string());
        let next = self
            .routes
            .lock()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());

        let mut last_served = self.last_served.lock();
        match next {
            Some(scripted) => {
                last_served.insert(key, scripted.clone());
                Some(scripted)
            }
            None => last_served.get(&key).cloned(),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, method: Method, path: &str, body: Body) -> TallyResult<Response> {
        let recorded = RecordedRequest {
            method,
            path: path.to_string(),
            body,
            bearer: self.bearer(),
        };

        if let Some(hook) = self.hook.lock().as_ref() {
            hook(&recorded);
        }
        self.requests.lock().push(recorded);

        let Some(scripted) = self.next_response(method, path) else {
            return Err(TallyError::http(
                404,
                Some(format!("no scripted response for {} {}", method, path)),
            ));
        };

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        if (200..300).contains(&scripted.status) {
            Ok(Response {
                status: scripted.status,
                body: scripted.body,
            })
        } else {
            let body = Some(scripted.body).filter(|b| !b.is_empty());
            Err(TallyError::http(scripted.status, body))
        }
    }

    fn set_bearer(&self, token: Option<&str>) {
        *self.bearer.lock() = token.map(str::to_string);
    }

    fn bearer(&self) -> Option<String> {
        self.bearer.lock().clone()
    }
}

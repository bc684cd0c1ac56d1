//! Route table, access gate and navigation directives
//!
//! The gate only consults the [`AuthSignal`]; it never reads the credential
//! store itself. The store emits directives through a [`Navigator`]: home
//! after login, login after logout or session expiry.

use crate::session::AuthSignal;
use parking_lot::Mutex;
use tracing::debug;

/// Path of the login view
pub const LOGIN_PATH: &str = "/login";

/// Path of the home view
pub const HOME_PATH: &str = "/";

/// A reachable view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub requires_auth: bool,
}

/// Views known to the application
pub const ROUTES: &[Route] = &[
    Route {
        name: "login",
        path: LOGIN_PATH,
        requires_auth: false,
    },
    Route {
        name: "register",
        path: "/register",
        requires_auth: false,
    },
    Route {
        name: "home",
        path: HOME_PATH,
        requires_auth: true,
    },
    Route {
        name: "categories",
        path: "/categories",
        requires_auth: true,
    },
    Route {
        name: "card-management",
        path: "/cards",
        requires_auth: true,
    },
];

/// Look up a route by path
pub fn route(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.path == path)
}

/// Gate decision for a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

/// Allows or denies route entry based on the session
#[derive(Debug, Clone)]
pub struct NavigationGate {
    auth: AuthSignal,
}

impl NavigationGate {
    pub fn new(auth: AuthSignal) -> Self {
        Self { auth }
    }

    /// Decide whether `path` may be entered now
    ///
    /// Unknown paths are allowed; only routes flagged as protected are gated.
    pub fn check(&self, path: &str) -> Access {
        let protected = route(path).is_some_and(|r| r.requires_auth);
        if protected && !self.auth.is_authenticated() {
            debug!("Redirecting {} to {}", path, LOGIN_PATH);
            Access::Redirect(LOGIN_PATH)
        } else {
            Access::Allow
        }
    }
}

/// Receives navigation directives from the store
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that remembers every directive
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All directives in emission order
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    /// Most recent directive
    pub fn current(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        debug!("Navigate to {}", path);
        self.history.lock().push(path.to_string());
    }
}

//! Navigation targets and the navigator seam
//!
//! Guards and the interceptor never move the user themselves; they describe
//! where to go with a [`Redirect`] and hand it to a [`Navigator`].

use std::sync::Mutex;

use tracing::info;
use url::form_urlencoded;

/// Well-known routes of the front-end
pub mod routes {
    pub const LOGIN: &str = "/login";
    pub const DASHBOARD: &str = "/dashboard";
    pub const EVENTS: &str = "/eventos";
}

/// Query parameter carrying the originally requested URL
pub const RETURN_URL_PARAM: &str = "returnUrl";
/// Query parameter carrying the reason for a forced login
pub const REASON_PARAM: &str = "reason";
/// Query parameter carrying a user-facing message
pub const MESSAGE_PARAM: &str = "message";

/// Why the user was sent back to the login page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    SessionExpired,
}

impl LoginReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginReason::SessionExpired => "session-expired",
        }
    }
}

/// A navigation target: path plus ordered query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Redirect {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Plain login page
    pub fn login() -> Self {
        Self::new(routes::LOGIN)
    }

    /// Login page that sends the user back to `return_url` afterwards
    pub fn login_with_return(return_url: impl Into<String>) -> Self {
        Self::login().with_query(RETURN_URL_PARAM, return_url)
    }

    /// Login page after a forced logout
    pub fn login_with(return_url: impl Into<String>, reason: LoginReason) -> Self {
        Self::login_with_return(return_url).with_query(REASON_PARAM, reason.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as a relative URL with an encoded query string
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

/// Performs redirects requested by guards, logout and session expiry
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &Redirect);

    /// URL the user is currently looking at, used as a return target
    fn current_url(&self) -> String;
}

/// Navigator that keeps the current location and the list of redirects.
///
/// The CLI uses it as its location bar; tests use it to assert redirects.
#[derive(Debug)]
pub struct HistoryNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<Redirect>>,
}

impl HistoryNavigator {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(start.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Record that the user is now at `url` without counting it as a redirect
    pub fn visit(&self, url: impl Into<String>) {
        if let Ok(mut current) = self.current.lock() {
            *current = url.into();
        }
    }

    pub fn history(&self) -> Vec<Redirect> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Redirect> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, to: &Redirect) {
        let url = to.to_url();
        info!(target_url = %url, "navigating");
        if let Ok(mut current) = self.current.lock() {
            *current = url;
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(to.clone());
        }
    }

    fn current_url(&self) -> String {
        self.current
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|_| "/".to_string())
    }
}

//! Reactive session state
//!
//! [`SessionStore`] is the single owner of the signed-in user. It keeps the
//! persisted record behind a mutex and publishes the profile on a
//! `tokio::sync::watch` channel so observers see every login and logout.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::role::{roles_match, Role};
use crate::store::{SessionStorage, StoredSession};
use crate::token;

/// The signed-in user as cached at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    /// Raw role string as sent by the server, possibly `ROLE_` prefixed
    pub role: String,
}

impl UserProfile {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// A freshly established session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: UserProfile,
}

impl From<Session> for StoredSession {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token.filter(|t| !t.is_empty()),
            current_user: session.user,
        }
    }
}

#[derive(Debug)]
struct SessionState {
    storage: Box<dyn SessionStorage>,
    cached: Option<StoredSession>,
}

#[derive(Debug)]
pub struct SessionStore {
    state: Mutex<SessionState>,
    current: watch::Sender<Option<UserProfile>>,
}

impl SessionStore {
    /// Build the store and rehydrate it from `storage`.
    ///
    /// A stored profile is only published when its access token is still
    /// valid; anything unreadable is treated as "no session".
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        let cached = match storage.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "could not load stored session");
                None
            }
        };

        let profile = cached
            .as_ref()
            .filter(|s| token_is_valid(&s.access_token))
            .map(|s| s.current_user.clone());

        match &profile {
            Some(user) => info!(email = %user.email, "restored session"),
            None => debug!("no usable stored session"),
        }

        let (current, _) = watch::channel(profile);
        Self {
            state: Mutex::new(SessionState { storage, cached }),
            current,
        }
    }

    fn state(&self) -> Result<std::sync::MutexGuard<'_, SessionState>> {
        self.state
            .lock()
            .map_err(|_| ClientError::internal("session state lock poisoned"))
    }

    pub fn get_token(&self) -> Option<String> {
        self.state()
            .ok()?
            .cached
            .as_ref()
            .map(|s| s.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.state()
            .ok()?
            .cached
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn get_current_user(&self) -> Option<UserProfile> {
        self.current.borrow().clone()
    }

    /// Observe profile changes; the receiver starts with the current value
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.current.subscribe()
    }

    /// True while a decodable, unexpired access token is held.
    ///
    /// An expired or undecodable token is dropped on discovery, so the next
    /// call and every observer see the signed-out state.
    pub fn is_authenticated(&self) -> bool {
        let Some(access_token) = self.get_token() else {
            return false;
        };

        if token_is_valid(&access_token) {
            return true;
        }

        warn!("stored access token is expired or unreadable, clearing session");
        self.clear();
        false
    }

    /// Compare the cached profile's role with `required`, ignoring `ROLE_`
    pub fn has_role(&self, required: &str) -> bool {
        self.current
            .borrow()
            .as_ref()
            .map(|user| roles_match(&user.role, required))
            .unwrap_or(false)
    }

    /// Persist a new session and publish its profile
    pub fn start_session(&self, session: Session) -> Result<()> {
        let stored = StoredSession::from(session);
        let profile = stored.current_user.clone();
        {
            let mut state = self.state()?;
            state.storage.save(&stored)?;
            state.cached = Some(stored);
        }
        info!(email = %profile.email, role = %profile.role, "session started");
        self.current.send_replace(Some(profile));
        Ok(())
    }

    /// Swap in a refreshed access token, keeping the rest of the session
    pub fn replace_access_token(&self, access_token: &str) -> Result<()> {
        let mut state = self.state()?;
        let Some(mut stored) = state.cached.clone() else {
            return Err(ClientError::session_not_found());
        };
        stored.access_token = access_token.to_string();
        state.storage.save(&stored)?;
        state.cached = Some(stored);
        debug!("access token replaced");
        Ok(())
    }

    /// Drop every piece of session state. Never fails; storage errors are logged.
    pub fn clear(&self) {
        match self.state() {
            Ok(mut state) => {
                state.cached = None;
                if let Err(e) = state.storage.clear() {
                    warn!(error = %e, "failed to clear stored session");
                }
            }
            Err(e) => warn!(error = %e, "failed to clear session"),
        }
        self.current.send_replace(None);
        debug!("session cleared");
    }

    /// What the storage backend currently holds
    pub fn persisted(&self) -> Result<Option<StoredSession>> {
        self.state()?.storage.load()
    }
}

fn token_is_valid(access_token: &str) -> bool {
    token::is_expired(Some(access_token)) == Some(false)
}

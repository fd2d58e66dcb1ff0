//! Route guards
//!
//! [`AuthGuard`] gates routes on being signed in and, optionally, on a role.
//! [`EventOwnerGuard`] additionally requires that the signed-in user
//! organizes the event named by the route. Both answer with a
//! [`GuardDecision`]; acting on it is left to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use eventsports_protocol::common::Event;

use crate::error::Result;
use crate::navigation::{Navigator, Redirect, MESSAGE_PARAM};
use crate::role::Role;
use crate::session::SessionStore;

pub const EVENT_ACCESS_DENIED: &str =
    "Acesso negado: você não tem permissão para gerenciar este evento";
pub const EVENT_CHECK_FAILED: &str = "Erro ao verificar permissões do evento";

/// Route parameter naming the event in ownership-guarded routes
pub const EVENT_ID_PARAM: &str = "eventoId";

/// A navigation attempt as seen by a guard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequest {
    pub url: String,
    pub required_role: Option<String>,
    pub params: HashMap<String, String>,
}

impl RouteRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn require_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = Some(role.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny(Redirect),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Deny(redirect) => Some(redirect),
        }
    }

    /// Perform the redirect of a denial and report whether navigation may proceed
    pub fn resolve(self, navigator: &dyn Navigator) -> bool {
        match self {
            GuardDecision::Allow => true,
            GuardDecision::Deny(redirect) => {
                navigator.navigate(&redirect);
                false
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthGuard {
    session: Arc<SessionStore>,
    landing: String,
}

impl AuthGuard {
    pub fn new(session: Arc<SessionStore>, landing: impl Into<String>) -> Self {
        Self {
            session,
            landing: landing.into(),
        }
    }

    pub fn can_activate(&self, route: &RouteRequest) -> GuardDecision {
        if !self.session.is_authenticated() {
            debug!(url = %route.url, "not signed in, redirecting to login");
            return GuardDecision::Deny(Redirect::login_with_return(&route.url));
        }

        if !self.can_access_route(route.required_role.as_deref()) {
            warn!(url = %route.url, required = ?route.required_role, "role mismatch");
            return GuardDecision::Deny(Redirect::new(&self.landing));
        }

        GuardDecision::Allow
    }

    /// True when signed in and either no role is required or the role matches
    pub fn can_access_route(&self, required_role: Option<&str>) -> bool {
        if !self.session.is_authenticated() {
            return false;
        }
        required_role.map_or(true, |role| self.session.has_role(role))
    }
}

/// Resolves an event id to the event, including its organizer
#[async_trait]
pub trait EventLookup: Send + Sync {
    async fn fetch_event(&self, id: i64) -> Result<Event>;
}

pub struct EventOwnerGuard {
    session: Arc<SessionStore>,
    lookup: Arc<dyn EventLookup>,
    fallback: String,
}

impl EventOwnerGuard {
    pub fn new(
        session: Arc<SessionStore>,
        lookup: Arc<dyn EventLookup>,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            session,
            lookup,
            fallback: fallback.into(),
        }
    }

    /// Admins always pass. Everyone else must be the event's organizer.
    /// A failed lookup denies.
    pub async fn can_activate(&self, route: &RouteRequest) -> GuardDecision {
        if !self.session.is_authenticated() {
            return GuardDecision::Deny(Redirect::login_with_return(&route.url));
        }

        if self.session.has_role(Role::Admin.as_str()) {
            return GuardDecision::Allow;
        }

        let Some(event_id) = route
            .param(EVENT_ID_PARAM)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
        else {
            debug!(url = %route.url, "missing or malformed event id");
            return GuardDecision::Deny(Redirect::new(&self.fallback));
        };

        let Some(email) = self
            .session
            .get_current_user()
            .map(|u| u.email)
            .filter(|e| !e.is_empty())
        else {
            return GuardDecision::Deny(Redirect::new(&self.fallback));
        };

        match self.lookup.fetch_event(event_id).await {
            Ok(event) if event.organizador_email.as_deref() == Some(email.as_str()) => {
                GuardDecision::Allow
            }
            Ok(_) => {
                warn!(event_id, email = %email, "user does not organize this event");
                self.deny_with(EVENT_ACCESS_DENIED)
            }
            Err(e) => {
                warn!(event_id, error = %e, "event ownership check failed");
                self.deny_with(EVENT_CHECK_FAILED)
            }
        }
    }

    fn deny_with(&self, message: &str) -> GuardDecision {
        GuardDecision::Deny(Redirect::new(&self.fallback).with_query(MESSAGE_PARAM, message))
    }
}

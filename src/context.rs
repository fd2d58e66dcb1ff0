//! Composition root: one session manager per process, shared by reference

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::auth::AuthClient;
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::guard::{AuthGuard, EventLookup, EventOwnerGuard};
use crate::interceptor::AuthInterceptor;
use crate::navigation::Navigator;
use crate::notify::Notifier;
use crate::services::{
    AttachmentService, CategoryService, EventService, LeaderboardService, RegistrationService,
    TimelineService, WorkoutService,
};
use crate::session::SessionStore;
use crate::store::{FileSessionStorage, MemorySessionStorage, SessionStorage};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct ClientContext {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub api: ApiClient,
    pub auth: AuthClient,
}

impl ClientContext {
    /// Wire the real HTTP transport and the configured session storage
    pub fn new(
        config: ClientConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config)?);
        let storage: Box<dyn SessionStorage> = if config.persist_session {
            Box::new(FileSessionStorage::new(config.session_path()))
        } else {
            Box::new(MemorySessionStorage::new())
        };
        Ok(Self::with_parts(config, transport, storage, navigator, notifier))
    }

    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Box<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        debug!(base_url = %config.base_url, persist = config.persist_session, "building client");

        let session = Arc::new(SessionStore::new(storage));
        let interceptor = Arc::new(AuthInterceptor::new(
            &config,
            transport,
            Arc::clone(&session),
            Arc::clone(&navigator),
            Arc::clone(&notifier),
        ));
        let api = ApiClient::new(config.clone(), interceptor);
        let auth = AuthClient::new(api.clone(), Arc::clone(&session), Arc::clone(&navigator));

        Self {
            config,
            session,
            navigator,
            notifier,
            api,
            auth,
        }
    }

    /// Wait for a scheduled forced logout to finish.
    ///
    /// Short-lived processes call this before exiting so the session is
    /// actually cleared. Returns whether a forced logout was pending.
    pub async fn settle(&self) -> bool {
        let interceptor = self.api.interceptor();
        let forced = interceptor.termination_pending();
        let deadline = interceptor.expiry_redirect_delay() * 2 + Duration::from_millis(100);
        let started = Instant::now();
        while interceptor.termination_pending() && started.elapsed() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        forced
    }

    pub fn events(&self) -> EventService {
        EventService::new(self.api.clone())
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(self.api.clone())
    }

    pub fn leaderboard(&self) -> LeaderboardService {
        LeaderboardService::new(self.api.clone())
    }

    pub fn workouts(&self) -> WorkoutService {
        WorkoutService::new(self.api.clone())
    }

    pub fn timeline(&self) -> TimelineService {
        TimelineService::new(self.api.clone())
    }

    pub fn attachments(&self) -> AttachmentService {
        AttachmentService::new(self.api.clone())
    }

    pub fn registrations(&self) -> RegistrationService {
        RegistrationService::new(self.api.clone())
    }

    pub fn auth_guard(&self) -> AuthGuard {
        AuthGuard::new(Arc::clone(&self.session), &self.config.default_landing)
    }

    pub fn event_owner_guard(&self) -> EventOwnerGuard {
        let lookup: Arc<dyn EventLookup> = Arc::new(self.events());
        EventOwnerGuard::new(
            Arc::clone(&self.session),
            lookup,
            &self.config.events_fallback,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{RouteRequest, EVENT_ID_PARAM};
    use crate::tests::mocks::{MockReply, TestHarness};
    use crate::tests::utils::test_helpers::expired_token;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_settle_waits_for_forced_logout() {
        let harness = TestHarness::with_session(crate::session::Session {
            access_token: expired_token("ATLETA"),
            refresh_token: None,
            user: crate::tests::utils::test_helpers::sample_profile("ATLETA"),
        });
        harness
            .transport
            .on(Method::GET, "/eventos", MockReply::json(401, json!({})));

        assert!(harness.context.events().list().await.is_err());
        assert!(harness.interceptor.termination_pending());

        assert!(harness.context.settle().await);
        assert!(!harness.interceptor.termination_pending());
        assert!(harness.session.get_token().is_none());
        assert_eq!(harness.navigator.last().unwrap().path, "/login");
    }

    #[tokio::test]
    async fn test_settle_reports_nothing_for_rejected_login() {
        let harness = TestHarness::signed_out();
        harness.transport.on(
            Method::POST,
            "/auth/login",
            MockReply::json(401, json!({ "message": "Credenciais inválidas" })),
        );

        let err = harness
            .context
            .auth
            .login("ana@x.com", "senha-errada")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(!harness.context.settle().await);
        assert!(harness.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_owner_guard_uses_event_service() {
        let harness = TestHarness::signed_in_as("a@x.com", "ORGANIZADOR");
        harness.transport.on(
            Method::GET,
            "/eventos/3",
            MockReply::json(
                200,
                json!({ "id": 3, "nome": "Open", "status": "ABERTO", "organizadorEmail": "a@x.com" }),
            ),
        );

        let route = RouteRequest::new("/eventos/3/resultados").with_param(EVENT_ID_PARAM, "3");
        let decision = harness.context.event_owner_guard().can_activate(&route).await;
        assert!(decision.is_allowed());
        assert!(harness.context.auth_guard().can_activate(&route).is_allowed());
    }
}

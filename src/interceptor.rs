//! Credential attachment and failure policy for every API call
//!
//! [`AuthInterceptor`] sits between the typed client and the [`Transport`]:
//!
//! - attaches the stored access token as a bearer credential
//! - on 401 refreshes the token once and retries the request once
//! - collapses concurrent refreshes into a single call to `/auth/refresh`
//! - ends the session when the token is gone, expired or unrefreshable
//! - turns 403, 5xx and connectivity failures into user notices
//!
//! The error the caller receives is always the original one; notices and
//! redirects are side effects.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::Method;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use eventsports_protocol::api::{RefreshTokenRequest, RefreshTokenResponse};

use crate::config::{ClientConfig, Endpoints};
use crate::error::{ClientError, Result};
use crate::navigation::{LoginReason, Navigator, Redirect};
use crate::notify::{Notice, Notifier};
use crate::session::SessionStore;
use crate::token;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Refresh bookkeeping: whether a refresh is running and who waits for it
#[derive(Debug, Default)]
struct RefreshGate {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Option<String>>>,
}

enum RefreshTicket<'a> {
    Leader(LeaderGuard<'a>),
    Follower(oneshot::Receiver<Option<String>>),
}

/// Held by the request running the refresh.
///
/// Dropping it reopens the gate and drops the queued senders, so followers
/// wake with a closed channel even when the leader's future is cancelled
/// mid-refresh.
struct LeaderGuard<'a> {
    gate: &'a Mutex<RefreshGate>,
    released: bool,
}

impl LeaderGuard<'_> {
    fn release(&mut self) -> Vec<oneshot::Sender<Option<String>>> {
        if self.released {
            return Vec::new();
        }
        self.released = true;
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        gate.in_flight = false;
        std::mem::take(&mut gate.waiters)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        let abandoned = self.release();
        if !abandoned.is_empty() {
            debug!(waiting = abandoned.len(), "refresh abandoned, releasing waiters");
        }
    }
}

pub struct AuthInterceptor {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    refresh_url: String,
    expiry_redirect_delay: Duration,
    gate: Mutex<RefreshGate>,
    terminating: Arc<AtomicBool>,
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("refresh_url", &self.refresh_url)
            .field("expiry_redirect_delay", &self.expiry_redirect_delay)
            .finish_non_exhaustive()
    }
}

impl AuthInterceptor {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
            notifier,
            refresh_url: config.endpoint_url(Endpoints::AUTH_REFRESH),
            expiry_redirect_delay: config.expiry_redirect_delay(),
            gate: Mutex::new(RefreshGate::default()),
            terminating: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// A forced logout has been scheduled but not yet carried out
    pub fn termination_pending(&self) -> bool {
        self.terminating.load(Ordering::SeqCst)
    }

    pub fn expiry_redirect_delay(&self) -> Duration {
        self.expiry_redirect_delay
    }

    /// Send `request` under the full policy
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = self.attach_token(request);

        let response = match self.transport.send(request.clone()).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => response,
            Err(err) => return Err(self.on_transport_error(err)),
        };

        let original = response.to_error();
        match response.status {
            401 => self.on_unauthorized(request, original).await,
            403 => {
                if Endpoints::is_logout_endpoint(&request.url) {
                    debug!("403 on logout ignored");
                } else {
                    warn!(url = %request.url, "access denied");
                    self.notifier.notify(Notice::access_denied());
                }
                Err(original)
            }
            status => {
                error!(status, url = %request.url, error = %original, "request failed");
                self.notifier.notify(Notice::for_status(
                    status,
                    response.server_message().as_deref(),
                ));
                Err(original)
            }
        }
    }

    fn attach_token(&self, request: HttpRequest) -> HttpRequest {
        match self.session.get_token() {
            Some(access_token) => request.with_bearer(&access_token),
            None => request,
        }
    }

    fn on_transport_error(&self, err: ClientError) -> ClientError {
        if err.status() == Some(0) {
            error!(error = %err, "server unreachable");
            self.notifier.notify(Notice::connection_error());
        }
        err
    }

    async fn on_unauthorized(
        &self,
        request: HttpRequest,
        original: ClientError,
    ) -> Result<HttpResponse> {
        if Endpoints::is_auth_endpoint(&request.url) {
            return Err(original);
        }

        let current = self.session.get_token();
        if current.is_none() || token::is_expired(current.as_deref()) == Some(true) {
            warn!("401 with missing or expired token, ending session");
            self.terminate_session();
            return Err(original);
        }

        self.refresh_and_retry(request, original).await
    }

    async fn refresh_and_retry(
        &self,
        request: HttpRequest,
        original: ClientError,
    ) -> Result<HttpResponse> {
        let ticket = {
            let mut gate = self.lock_gate()?;
            if gate.in_flight {
                let (tx, rx) = oneshot::channel();
                gate.waiters.push(tx);
                RefreshTicket::Follower(rx)
            } else {
                gate.in_flight = true;
                RefreshTicket::Leader(LeaderGuard {
                    gate: &self.gate,
                    released: false,
                })
            }
        };

        match ticket {
            RefreshTicket::Leader(mut leader) => {
                let refreshed = self.refresh_access_token().await;
                let waiters = leader.release();

                match refreshed {
                    Ok(access_token) => {
                        for waiter in waiters {
                            let _ = waiter.send(Some(access_token.clone()));
                        }
                        self.retry(request, &access_token).await
                    }
                    Err(e) => {
                        warn!(error = %e, waiting = waiters.len(), "token refresh failed");
                        for waiter in waiters {
                            let _ = waiter.send(None);
                        }
                        self.terminate_session();
                        Err(original)
                    }
                }
            }
            RefreshTicket::Follower(rx) => match rx.await {
                Ok(Some(access_token)) => self.retry(request, &access_token).await,
                _ => Err(original),
            },
        }
    }

    fn lock_gate(&self) -> Result<std::sync::MutexGuard<'_, RefreshGate>> {
        self.gate
            .lock()
            .map_err(|_| ClientError::internal("refresh gate lock poisoned"))
    }

    /// Retry exactly once; the outcome is passed through without further policy
    async fn retry(&self, request: HttpRequest, access_token: &str) -> Result<HttpResponse> {
        let response = self
            .transport
            .send(request.with_bearer(access_token))
            .await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(response.to_error())
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Talks to the transport directly so the refresh call is never itself
    /// intercepted.
    pub async fn refresh_access_token(&self) -> Result<String> {
        let refresh_token = self
            .session
            .get_refresh_token()
            .ok_or_else(|| ClientError::refresh_failed("No refresh token available"))?;

        let body = serde_json::to_value(RefreshTokenRequest { refresh_token })?;
        let request = HttpRequest::new(Method::POST, &self.refresh_url).with_json(body);
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(ClientError::refresh_failed(format!(
                "Refresh rejected with status {}",
                response.status
            )));
        }

        let refreshed: RefreshTokenResponse = response.json()?;
        if refreshed.access_token.is_empty() {
            return Err(ClientError::refresh_failed("Refresh returned an empty token"));
        }

        self.session.replace_access_token(&refreshed.access_token)?;
        info!("access token refreshed");
        Ok(refreshed.access_token)
    }

    /// Notify now, then after the configured delay clear the session and
    /// send the user to login with a return URL.
    fn terminate_session(&self) {
        if self.terminating.swap(true, Ordering::SeqCst) {
            debug!("session termination already scheduled");
            return;
        }

        self.notifier.notify(Notice::session_expired());

        let session = Arc::clone(&self.session);
        let navigator = Arc::clone(&self.navigator);
        let terminating = Arc::clone(&self.terminating);
        let delay = self.expiry_redirect_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.clear();
            let redirect = Redirect::login_with(navigator.current_url(), LoginReason::SessionExpired);
            navigator.navigate(&redirect);
            terminating.store(false, Ordering::SeqCst);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{REASON_PARAM, RETURN_URL_PARAM};
    use crate::notify::{ACCESS_DENIED, CONNECTION_ERROR, SERVER_ERROR, SESSION_EXPIRED};
    use crate::tests::mocks::{MockReply, TestHarness};
    use crate::tests::utils::test_helpers::{expired_token, session_for, token_for, TEST_EMAIL};
    use serde_json::json;
    use tokio::time::timeout;

    fn get(harness: &TestHarness, path: &str) -> HttpRequest {
        HttpRequest::new(Method::GET, harness.config.endpoint_url(path))
    }

    async fn wait_for_termination() {
        tokio::time::sleep(Duration::from_millis(80)).await;
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let harness = TestHarness::signed_in("ORGANIZADOR");
        harness
            .transport
            .on(Method::GET, "/eventos", MockReply::json(200, json!([])));

        harness
            .interceptor
            .execute(get(&harness, "/eventos"))
            .await
            .unwrap();

        let sent = harness.transport.requests_to("/eventos");
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].bearer_token(),
            harness.session.get_token().as_deref()
        );
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let harness = TestHarness::signed_out();
        harness
            .transport
            .on(Method::GET, "/eventos", MockReply::json(200, json!([])));

        harness
            .interceptor
            .execute(get(&harness, "/eventos"))
            .await
            .unwrap();

        assert!(harness.transport.requests_to("/eventos")[0]
            .bearer_token()
            .is_none());
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let harness = TestHarness::signed_in("ORGANIZADOR");
        let old_token = harness.session.get_token().unwrap();
        let new_token = token_for(TEST_EMAIL, "ORGANIZADOR", 7_200);

        let accepted = new_token.clone();
        let protected = move |request: &HttpRequest| {
            if request.bearer_token() == Some(accepted.as_str()) {
                MockReply::json(200, json!({ "ok": true }))
            } else {
                MockReply::json(401, json!({ "message": "token expirado" }))
            }
        };
        harness
            .transport
            .on_fn(Method::GET, "/eventos/1", protected.clone());
        harness.transport.on_fn(Method::GET, "/eventos/2", protected);
        harness.transport.on_delayed(
            Method::POST,
            "/auth/refresh",
            Duration::from_millis(30),
            MockReply::json(200, json!({ "accessToken": new_token })),
        );

        let (first, second) = tokio::join!(
            harness.interceptor.execute(get(&harness, "/eventos/1")),
            harness.interceptor.execute(get(&harness, "/eventos/2")),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(harness.transport.count("/auth/refresh"), 1);

        let refresh = &harness.transport.requests_to("/auth/refresh")[0];
        assert_eq!(refresh.body, Some(json!({ "refreshToken": "refresh-1" })));

        for path in ["/eventos/1", "/eventos/2"] {
            let sent = harness.transport.requests_to(path);
            assert_eq!(sent.len(), 2);
            assert_eq!(sent[0].bearer_token(), Some(old_token.as_str()));
            assert_eq!(sent[1].bearer_token(), Some(new_token.as_str()));
        }
        assert_eq!(harness.session.get_token(), Some(new_token));
        assert!(harness.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_releases_every_waiter_with_its_own_error() {
        let harness = TestHarness::signed_in("ORGANIZADOR");
        harness.navigator.visit("/eventos/1/resultados");
        harness.transport.on(
            Method::GET,
            "/eventos/1",
            MockReply::json(401, json!({ "message": "evento 1 negado" })),
        );
        harness.transport.on(
            Method::GET,
            "/eventos/2",
            MockReply::json(401, json!({ "message": "evento 2 negado" })),
        );
        harness.transport.on(
            Method::GET,
            "/eventos/3",
            MockReply::json(401, json!({ "message": "evento 3 negado" })),
        );
        harness.transport.on_delayed(
            Method::POST,
            "/auth/refresh",
            Duration::from_millis(30),
            MockReply::json(401, json!({ "message": "refresh inválido" })),
        );

        let (first, second, third) = tokio::join!(
            harness.interceptor.execute(get(&harness, "/eventos/1")),
            harness.interceptor.execute(get(&harness, "/eventos/2")),
            harness.interceptor.execute(get(&harness, "/eventos/3")),
        );

        for (outcome, message) in [
            (first, "evento 1 negado"),
            (second, "evento 2 negado"),
            (third, "evento 3 negado"),
        ] {
            let err = outcome.unwrap_err();
            assert_eq!(err.status(), Some(401));
            assert!(err.to_string().contains(message));
        }
        assert_eq!(harness.transport.count("/auth/refresh"), 1);
        assert_eq!(harness.notifier.messages(), vec![SESSION_EXPIRED]);

        wait_for_termination().await;
        let history = harness.navigator.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].path, "/login");
        assert!(harness.session.get_token().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_refresh_reopens_gate() {
        let harness = TestHarness::signed_in("ORGANIZADOR");
        let new_token = token_for(TEST_EMAIL, "ORGANIZADOR", 7_200);

        let accepted = new_token.clone();
        let protected = move |request: &HttpRequest| {
            if request.bearer_token() == Some(accepted.as_str()) {
                MockReply::json(200, json!({ "ok": true }))
            } else {
                MockReply::json(401, json!({ "message": "token expirado" }))
            }
        };
        harness
            .transport
            .on_fn(Method::GET, "/eventos/1", protected.clone());
        harness.transport.on_fn(Method::GET, "/eventos/2", protected);
        harness.transport.on_delayed(
            Method::POST,
            "/auth/refresh",
            Duration::from_millis(200),
            MockReply::json(200, json!({ "accessToken": new_token })),
        );

        // The leader is cancelled mid-refresh while a second request waits on it.
        let (leader, follower) = tokio::join!(
            timeout(
                Duration::from_millis(50),
                harness.interceptor.execute(get(&harness, "/eventos/1")),
            ),
            timeout(
                Duration::from_secs(2),
                harness.interceptor.execute(get(&harness, "/eventos/2")),
            ),
        );
        assert!(leader.is_err());
        let waited = follower.expect("follower must not hang");
        assert_eq!(waited.unwrap_err().status(), Some(401));

        // A later 401 starts a fresh refresh instead of queueing forever.
        let later = timeout(
            Duration::from_secs(2),
            harness.interceptor.execute(get(&harness, "/eventos/1")),
        )
        .await
        .expect("request after a cancelled refresh must not hang");
        assert!(later.is_ok());
        assert_eq!(harness.transport.count("/auth/refresh"), 2);
        assert_eq!(harness.session.get_token(), Some(new_token));
    }

    #[tokio::test]
    async fn test_retry_failure_is_not_retried_again() {
        let harness = TestHarness::signed_in("ATLETA");
        harness.transport.on(
            Method::GET,
            "/eventos",
            MockReply::json(401, json!({ "message": "nope" })),
        );
        let new_token = token_for(TEST_EMAIL, "ATLETA", 7_200);
        harness.transport.on(
            Method::POST,
            "/auth/refresh",
            MockReply::json(200, json!({ "accessToken": new_token })),
        );

        let err = harness
            .interceptor
            .execute(get(&harness, "/eventos"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(harness.transport.count("/eventos"), 2);
        assert_eq!(harness.transport.count("/auth/refresh"), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_ends_session_with_original_error() {
        let harness = TestHarness::signed_in("ORGANIZADOR");
        harness.navigator.visit("/eventos/9/resultados");
        harness.transport.on(
            Method::GET,
            "/eventos/9",
            MockReply::json(401, json!({ "message": "token revogado" })),
        );
        harness.transport.on(
            Method::POST,
            "/auth/refresh",
            MockReply::json(401, json!({ "message": "refresh inválido" })),
        );

        let err = harness
            .interceptor
            .execute(get(&harness, "/eventos/9"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("token revogado"));
        assert_eq!(harness.notifier.messages(), vec![SESSION_EXPIRED]);

        wait_for_termination().await;
        assert!(harness.session.get_token().is_none());
        let redirect = harness.navigator.last().unwrap();
        assert_eq!(redirect.path, "/login");
        assert_eq!(
            redirect.query_value(RETURN_URL_PARAM),
            Some("/eventos/9/resultados")
        );
        assert_eq!(redirect.query_value(REASON_PARAM), Some("session-expired"));
    }

    #[tokio::test]
    async fn test_expired_token_terminates_without_refresh() {
        let harness = TestHarness::with_session(crate::session::Session {
            access_token: expired_token("ATLETA"),
            ..session_for(TEST_EMAIL, "ATLETA")
        });
        harness
            .transport
            .on(Method::GET, "/eventos", MockReply::json(401, json!({})));

        let err = harness
            .interceptor
            .execute(get(&harness, "/eventos"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(harness.transport.count("/auth/refresh"), 0);
        assert_eq!(harness.notifier.messages(), vec![SESSION_EXPIRED]);

        // Termination is delayed.
        assert!(harness.navigator.last().is_none());
        wait_for_termination().await;
        assert_eq!(harness.navigator.last().unwrap().path, "/login");
    }

    #[tokio::test]
    async fn test_missing_refresh_token_terminates() {
        let harness = TestHarness::with_session(crate::session::Session {
            refresh_token: None,
            ..session_for(TEST_EMAIL, "ATLETA")
        });
        harness
            .transport
            .on(Method::GET, "/eventos", MockReply::json(401, json!({})));

        assert!(harness
            .interceptor
            .execute(get(&harness, "/eventos"))
            .await
            .is_err());
        assert_eq!(harness.transport.count("/auth/refresh"), 0);
        wait_for_termination().await;
        assert!(!harness.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_auth_endpoint_401_passes_through() {
        let harness = TestHarness::signed_out();
        harness.transport.on(
            Method::POST,
            "/auth/login",
            MockReply::json(401, json!({ "message": "Credenciais inválidas" })),
        );

        let request = HttpRequest::new(Method::POST, harness.config.endpoint_url("/auth/login"))
            .with_json(json!({ "email": "a@x.com", "senha": "errada" }));
        let err = harness.interceptor.execute(request).await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(harness.notifier.notices().is_empty());
        wait_for_termination().await;
        assert!(harness.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_403_notifies_except_on_logout() {
        let harness = TestHarness::signed_in("ATLETA");
        harness
            .transport
            .on(Method::DELETE, "/eventos/3", MockReply::json(403, json!({})));
        harness
            .transport
            .on(Method::POST, "/auth/logout", MockReply::json(403, json!({})));

        let denied = harness
            .interceptor
            .execute(HttpRequest::new(
                Method::DELETE,
                harness.config.endpoint_url("/eventos/3"),
            ))
            .await
            .unwrap_err();
        assert_eq!(denied.status(), Some(403));
        let notices = harness.notifier.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, ACCESS_DENIED);

        let logout = harness
            .interceptor
            .execute(HttpRequest::new(
                Method::POST,
                harness.config.endpoint_url("/auth/logout"),
            ))
            .await
            .unwrap_err();
        assert_eq!(logout.status(), Some(403));
        assert!(harness.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_network_error_notifies_connectivity() {
        let harness = TestHarness::signed_in("ATLETA");
        harness
            .transport
            .on(Method::GET, "/eventos", MockReply::NetworkError);

        let err = harness
            .interceptor
            .execute(get(&harness, "/eventos"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(0));
        assert_eq!(harness.notifier.messages(), vec![CONNECTION_ERROR]);
    }

    #[tokio::test]
    async fn test_generic_failures_notify_and_propagate() {
        let harness = TestHarness::signed_in("ATLETA");
        harness.transport.on(
            Method::GET,
            "/eventos",
            MockReply::json(500, json!({ "message": "stack trace" })),
        );
        harness.transport.on(
            Method::POST,
            "/eventos",
            MockReply::json(400, json!({ "message": "Nome obrigatório" })),
        );

        let server = harness
            .interceptor
            .execute(get(&harness, "/eventos"))
            .await
            .unwrap_err();
        assert_eq!(server.status(), Some(500));

        let client = harness
            .interceptor
            .execute(HttpRequest::new(
                Method::POST,
                harness.config.endpoint_url("/eventos"),
            ))
            .await
            .unwrap_err();
        assert_eq!(client.status(), Some(400));

        assert_eq!(
            harness.notifier.messages(),
            vec![SERVER_ERROR.to_string(), "Nome obrigatório".to_string()]
        );
    }
}

//! Session manager: login, registration, logout and session queries

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};
use validator::Validate;

use eventsports_protocol::api::{LoginRequest, LoginResponse, LogoutRequest, RegisterRequest};
use eventsports_protocol::common::User;

use crate::client::ApiClient;
use crate::config::Endpoints;
use crate::error::{ClientError, Result};
use crate::navigation::{Navigator, Redirect};
use crate::role::Role;
use crate::session::{Session, SessionStore, UserProfile};
use crate::token::{self, TokenDebugInfo};

const FALLBACK_USER_NAME: &str = "Usuário";

/// Normalizes every accepted login payload into one [`Session`]
pub trait IntoSession {
    fn into_session(self) -> Session;
}

impl IntoSession for LoginResponse {
    fn into_session(self) -> Session {
        match self {
            LoginResponse::WithRefresh(r) => Session {
                access_token: r.access_token,
                refresh_token: r.refresh_token.filter(|t| !t.is_empty()),
                user: profile_from_user(r.usuario),
            },
            LoginResponse::Wrapped(r) => Session {
                access_token: r.token,
                refresh_token: None,
                user: profile_from_user(r.usuario),
            },
            LoginResponse::Flat(r) => Session {
                access_token: r.token,
                refresh_token: None,
                user: UserProfile {
                    id: r.user_id,
                    name: r.nome.unwrap_or_else(|| r.email.clone()),
                    email: r.email,
                    role: r.tipo_usuario.or(r.role).unwrap_or_default(),
                },
            },
        }
    }
}

fn profile_from_user(user: User) -> UserProfile {
    UserProfile {
        id: Some(user.id),
        name: user.nome,
        email: user.email,
        role: user.tipo_usuario,
    }
}

/// Diagnostic view of the current session, safe to print
#[derive(Debug, Clone, Serialize)]
pub struct AuthDebugInfo {
    pub is_authenticated: bool,
    pub current_user: Option<UserProfile>,
    pub token: TokenDebugInfo,
    pub has_refresh_token: bool,
}

/// Authentication client
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("api", &self.api)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            session,
            navigator,
        }
    }

    /// Sign in and start a session.
    ///
    /// On failure the current session is left untouched and the error is
    /// returned as-is; a 401 here means rejected credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response: LoginResponse = self.api.post(Endpoints::AUTH_LOGIN, &request).await?;
        let session = response.into_session();
        if session.access_token.is_empty() {
            return Err(ClientError::authentication("Login response carried no token"));
        }

        self.session.start_session(session.clone())?;
        info!(email = %session.user.email, "logged in");
        Ok(session)
    }

    /// Create an account. Only organizers and athletes may self-register.
    pub async fn register(&self, request: RegisterRequest) -> Result<serde_json::Value> {
        request.validate()?;
        match Role::parse(&request.user_type) {
            Some(Role::Organizer) | Some(Role::Athlete) => {}
            _ => {
                return Err(ClientError::validation_field(
                    format!("Tipo de usuário inválido: {}", request.user_type),
                    "tipoUsuario",
                ))
            }
        }

        let created = self.api.post(Endpoints::AUTH_REGISTER, &request).await?;
        info!(email = %request.email, "account registered");
        Ok(created)
    }

    /// Log out and go to the login page
    pub async fn logout(&self) {
        self.logout_to(Redirect::login()).await
    }

    /// Log out and go to `redirect`. Local state is always cleared.
    pub async fn logout_to(&self, redirect: Redirect) {
        self.notify_server_logout_ignoring_failure().await;
        self.session.clear();
        self.navigator.navigate(&redirect);
        info!("logged out");
    }

    /// Best effort: the local logout proceeds whatever the server says
    async fn notify_server_logout_ignoring_failure(&self) {
        if self.session.get_token().is_none() {
            return;
        }
        if let Err(e) = self
            .api
            .post::<_, serde_json::Value>(Endpoints::AUTH_LOGOUT, &LogoutRequest::default())
            .await
        {
            debug!(error = %e, "server logout failed, ignoring");
        }
    }

    /// Exchange the refresh token for a new access token
    pub async fn refresh(&self) -> Result<String> {
        self.api.interceptor().refresh_access_token().await
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn get_current_user(&self) -> Option<UserProfile> {
        self.session.get_current_user()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.session.subscribe()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.session.has_role(role)
    }

    pub fn get_token(&self) -> Option<String> {
        self.session.get_token()
    }

    pub fn current_user_name(&self) -> String {
        self.get_current_user()
            .map(|u| u.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| FALLBACK_USER_NAME.to_string())
    }

    pub fn current_user_email(&self) -> Option<String> {
        self.get_current_user().map(|u| u.email)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin.as_str())
    }

    pub fn is_organizer(&self) -> bool {
        self.has_role(Role::Organizer.as_str())
    }

    pub fn is_athlete(&self) -> bool {
        self.has_role(Role::Athlete.as_str())
    }

    /// Label for the current role, empty when signed out or unknown
    pub fn user_type_display(&self) -> String {
        self.get_current_user()
            .and_then(|u| u.role())
            .map(|r| r.display_name().to_string())
            .unwrap_or_default()
    }

    pub fn debug_info(&self) -> AuthDebugInfo {
        let access_token = self.session.get_token();
        AuthDebugInfo {
            is_authenticated: self.is_authenticated(),
            current_user: self.get_current_user(),
            token: token::debug_info(access_token.as_deref()),
            has_refresh_token: self.session.get_refresh_token().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::{MockReply, TestHarness};
    use crate::tests::utils::test_helpers::{expired_token, sample_profile, token_for};
    use reqwest::Method;
    use serde_json::json;

    fn login_reply(access_token: &str) -> MockReply {
        MockReply::json(
            200,
            json!({
                "accessToken": access_token,
                "refreshToken": "refresh-9",
                "usuario": {
                    "id": 7,
                    "nome": "Bruno Lima",
                    "email": "bruno@x.com",
                    "tipoUsuario": "ORGANIZADOR"
                }
            }),
        )
    }

    #[test]
    fn test_flat_response_normalization() {
        let response: LoginResponse = serde_json::from_value(json!({
            "token": "a.b.c",
            "tokenType": "Bearer",
            "expiresIn": 3600,
            "email": "carla@x.com",
            "nome": "Carla",
            "userId": 3,
            "role": "ROLE_ATLETA",
            "loginAt": "2024-05-01T10:00:00"
        }))
        .unwrap();

        let session = response.into_session();
        assert_eq!(session.access_token, "a.b.c");
        assert_eq!(session.refresh_token, None);
        assert_eq!(session.user.id, Some(3));
        assert_eq!(session.user.role, "ROLE_ATLETA");
    }

    #[test]
    fn test_wrapped_response_normalization() {
        let response: LoginResponse = serde_json::from_value(json!({
            "mensagem": "Login realizado",
            "token": "x.y.z",
            "usuario": { "id": 1, "nome": "Ana", "email": "ana@x.com", "tipoUsuario": "ADMIN" }
        }))
        .unwrap();

        let session = response.into_session();
        assert_eq!(session.access_token, "x.y.z");
        assert_eq!(session.user.name, "Ana");
        assert_eq!(session.user.role, "ADMIN");
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let harness = TestHarness::signed_out();
        let access_token = token_for("bruno@x.com", "ORGANIZADOR", 3_600);
        harness
            .transport
            .on(Method::POST, "/auth/login", login_reply(&access_token));
        let updates = harness.auth.subscribe();

        let session = harness.auth.login("bruno@x.com", "segredo123").await.unwrap();

        assert_eq!(session.refresh_token.as_deref(), Some("refresh-9"));
        let user = harness.auth.get_current_user().unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(user.name, "Bruno Lima");
        assert_eq!(user.email, "bruno@x.com");
        assert!(harness.auth.is_authenticated());
        assert!(harness.auth.is_organizer());
        assert_eq!(harness.auth.user_type_display(), "Organizador");
        assert!(updates.has_changed().unwrap());

        let sent = &harness.transport.requests_to("/auth/login")[0];
        assert_eq!(
            sent.body,
            Some(json!({ "email": "bruno@x.com", "senha": "segredo123" }))
        );
    }

    #[tokio::test]
    async fn test_login_validation_happens_before_network() {
        let harness = TestHarness::signed_out();

        assert!(harness.auth.login("not-an-email", "segredo123").await.is_err());
        assert!(harness.auth.login("bruno@x.com", "123").await.is_err());
        assert_eq!(harness.transport.count("/auth/login"), 0);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_existing_session() {
        let harness = TestHarness::signed_in("ATLETA");
        let before = harness.auth.get_token();
        harness.transport.on(
            Method::POST,
            "/auth/login",
            MockReply::json(401, json!({ "message": "Credenciais inválidas" })),
        );

        let err = harness.auth.login("ana@x.com", "errada123").await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(harness.auth.get_token(), before);
        assert!(harness.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_logout_twice_is_safe() {
        let harness = TestHarness::signed_in("ATLETA");
        harness
            .transport
            .on(Method::POST, "/auth/logout", MockReply::json(500, json!({})));

        harness.auth.logout().await;
        harness.auth.logout().await;

        assert!(harness.session.persisted().unwrap().is_none());
        assert!(harness.auth.get_current_user().is_none());
        assert!(!harness.auth.is_authenticated());
        assert_eq!(harness.transport.count("/auth/logout"), 1);
        let history = harness.navigator.history();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.path == "/login"));
    }

    #[tokio::test]
    async fn test_logout_survives_unreachable_server() {
        let harness = TestHarness::signed_in("ORGANIZADOR");
        harness
            .transport
            .on(Method::POST, "/auth/logout", MockReply::NetworkError);

        harness.auth.logout_to(Redirect::new("/")).await;

        assert!(harness.session.get_token().is_none());
        assert_eq!(harness.navigator.current_url(), "/");
    }

    #[tokio::test]
    async fn test_expired_session_self_heals() {
        let harness = TestHarness::with_session(Session {
            access_token: expired_token("ATLETA"),
            refresh_token: None,
            user: sample_profile("ATLETA"),
        });
        let updates = harness.auth.subscribe();

        assert!(!harness.auth.is_authenticated());
        assert!(harness.auth.get_token().is_none());
        assert!(updates.borrow().is_none());
        assert_eq!(harness.auth.current_user_name(), "Usuário");
    }

    #[tokio::test]
    async fn test_register_rejects_admin_self_signup() {
        let harness = TestHarness::signed_out();
        let request = RegisterRequest {
            name: "Dani".to_string(),
            email: "dani@x.com".to_string(),
            password: "segredo123".to_string(),
            user_type: "ADMIN".to_string(),
        };

        assert!(harness.auth.register(request).await.is_err());
        assert_eq!(harness.transport.count("/auth/register"), 0);
    }

    #[tokio::test]
    async fn test_register_posts_wire_names() {
        let harness = TestHarness::signed_out();
        harness.transport.on(
            Method::POST,
            "/auth/register",
            MockReply::json(201, json!({ "id": 11 })),
        );

        let created = harness
            .auth
            .register(RegisterRequest {
                name: "Dani".to_string(),
                email: "dani@x.com".to_string(),
                password: "segredo123".to_string(),
                user_type: "ATLETA".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created["id"], 11);
        let sent = &harness.transport.requests_to("/auth/register")[0];
        assert_eq!(sent.body.as_ref().unwrap()["tipoUsuario"], "ATLETA");
    }

    #[tokio::test]
    async fn test_debug_info_masks_token() {
        let harness = TestHarness::signed_in("ADMIN");
        let info = harness.auth.debug_info();

        assert!(info.is_authenticated);
        assert!(info.has_refresh_token);
        let masked = info.token.masked_token.unwrap();
        assert!(masked.starts_with("***"));
        assert_eq!(masked.len(), 13);
        assert!(harness.auth.is_admin());
    }
}

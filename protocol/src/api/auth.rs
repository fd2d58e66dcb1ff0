//! Authentication API DTOs
//!
//! This module contains data transfer objects for the `/auth` endpoints:
//! login, registration, token refresh and logout.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::common::{TokenClaims, User};

// ============================================================================
// Login DTOs
// ============================================================================

/// Credential login request for POST /auth/login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email, length(max = 150))]
    pub email: String,
    /// Password, sent under the backend's field name
    #[serde(rename = "senha")]
    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

/// Login response as returned by the backend.
///
/// Backend revisions disagree on the shape of this payload, so every known
/// variant is accepted here and normalized by the client right after login.
/// Variants are tried in declaration order.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    /// `{accessToken, refreshToken, usuario}`
    WithRefresh(RefreshingLoginResponse),
    /// `{mensagem, token, usuario}`
    Wrapped(WrappedLoginResponse),
    /// `{token, tokenType, expiresIn, email, nome, userId, tipoUsuario, loginAt}`
    Flat(FlatLoginResponse),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshingLoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub usuario: User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedLoginResponse {
    #[serde(default)]
    pub mensagem: Option<String>,
    pub token: String,
    pub usuario: User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatLoginResponse {
    pub token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub tipo_usuario: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub login_at: Option<String>,
}

// ============================================================================
// Registration DTOs
// ============================================================================

/// Self-service account creation for POST /auth/register
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    /// Only `ORGANIZADOR` or `ATLETA` can self-register
    #[serde(rename = "tipoUsuario")]
    pub user_type: String,
}

// ============================================================================
// Token Refresh DTOs
// ============================================================================

/// Refresh access token request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
}

/// Empty body posted to /auth/logout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_with_refresh_variant() {
        let raw = json!({
            "accessToken": "a.b.c",
            "refreshToken": "rt-1",
            "usuario": {"id": 1, "nome": "Ana", "email": "ana@x.com", "tipoUsuario": "ATLETA"}
        });
        let parsed: LoginResponse = serde_json::from_value(raw).unwrap();
        assert!(matches!(parsed, LoginResponse::WithRefresh(_)));
    }

    #[test]
    fn test_login_response_wrapped_variant() {
        let raw = json!({
            "mensagem": "Login realizado com sucesso",
            "token": "a.b.c",
            "usuario": {"id": 2, "nome": "Bia", "email": "bia@x.com", "tipoUsuario": "ORGANIZADOR"}
        });
        let parsed: LoginResponse = serde_json::from_value(raw).unwrap();
        assert!(matches!(parsed, LoginResponse::Wrapped(_)));
    }

    #[test]
    fn test_login_response_flat_variant() {
        let raw = json!({
            "token": "a.b.c",
            "tokenType": "Bearer",
            "expiresIn": 86400,
            "email": "admin@x.com",
            "nome": "Admin",
            "userId": 3,
            "tipoUsuario": "ADMIN",
            "loginAt": "2024-05-01T10:00:00"
        });
        let parsed: LoginResponse = serde_json::from_value(raw).unwrap();
        match parsed {
            LoginResponse::Flat(flat) => {
                assert_eq!(flat.user_id, Some(3));
                assert_eq!(flat.tipo_usuario.as_deref(), Some("ADMIN"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "joao@exemplo.com".to_string(),
            password: "minhasenha123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = LoginRequest {
            email: "joao@exemplo.com".to_string(),
            password: "123".to_string(),
        };
        assert!(short.validate().is_err());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "minhasenha123".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_login_request_wire_names() {
        let req = LoginRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"email": "a@x.com", "senha": "secret1"}));
    }
}

//! Test utilities and helpers for unit tests
//!
//! This module provides common testing utilities including:
//! - Unsigned token builders
//! - Sample profiles and sessions
//! - A configuration pointing at a fake API

#[cfg(test)]
pub mod test_helpers {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use crate::config::ClientConfig;
    use crate::session::{Session, UserProfile};
    use crate::token::now_millis;

    pub const TEST_BASE_URL: &str = "http://api.test/api";
    pub const TEST_EMAIL: &str = "ana@x.com";

    /// Create a temporary directory for testing
    pub fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    /// Build an unsigned `header.payload.signature` token carrying `claims`
    pub fn make_token(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.test-signature", header, payload)
    }

    /// Token for `email` with `role` that expires `offset_secs` from now
    pub fn token_for(email: &str, role: &str, offset_secs: i64) -> String {
        let now_secs = now_millis() / 1000;
        make_token(json!({
            "sub": email,
            "email": email,
            "role": role,
            "iat": now_secs,
            "exp": now_secs + offset_secs,
        }))
    }

    /// One hour of validity left
    pub fn valid_token(role: &str) -> String {
        token_for(TEST_EMAIL, role, 3_600)
    }

    /// Expired an hour ago
    pub fn expired_token(role: &str) -> String {
        token_for(TEST_EMAIL, role, -3_600)
    }

    pub fn sample_profile(role: &str) -> UserProfile {
        profile_for(TEST_EMAIL, role)
    }

    pub fn profile_for(email: &str, role: &str) -> UserProfile {
        UserProfile {
            id: Some(1),
            name: "Ana Souza".to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    /// Valid session for `email` with `role`
    pub fn session_for(email: &str, role: &str) -> Session {
        Session {
            access_token: token_for(email, role, 3_600),
            refresh_token: Some("refresh-1".to_string()),
            user: profile_for(email, role),
        }
    }

    /// Configuration aimed at the fake API with a short expiry redirect delay
    pub fn test_config() -> ClientConfig {
        ClientConfig {
            base_url: TEST_BASE_URL.to_string(),
            persist_session: false,
            expiry_redirect_delay_ms: 20,
            ..ClientConfig::default()
        }
    }
}

//! Access token inspection
//!
//! Decodes the payload segment of a compact `header.payload.signature` token
//! without verifying the signature; verification is the server's job. Every
//! function here accepts a possibly-missing token and answers with
//! `Option`/`bool` instead of an error.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::role::roles_match;

pub use eventsports_protocol::common::TokenClaims;

const MS_PER_MINUTE: i64 = 60_000;
const NEAR_EXPIRATION_MINUTES: i64 = 5;

/// Current wall-clock time in milliseconds since the epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Decode the payload segment of `token`.
///
/// Returns `None` for a missing or empty token, a segment count other than
/// three, invalid base64url or a payload that is not a JSON object.
pub fn decode(token: Option<&str>) -> Option<TokenClaims> {
    let token = token.filter(|t| !t.is_empty())?;

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!(segments = parts.len(), "token rejected: wrong segment count");
        return None;
    }

    let bytes = decode_segment(parts[1])?;
    match serde_json::from_slice::<TokenClaims>(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!(error = %e, "token rejected: payload is not a claims object");
            None
        }
    }
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .map_err(|e| debug!(error = %e, "token rejected: invalid base64url payload"))
        .ok()
}

/// Whether the token is expired at `now_ms`.
///
/// `None` when the token cannot be decoded or has no `exp` claim. The
/// boundary instant `now_ms == exp * 1000` counts as expired.
pub fn is_expired_at(token: Option<&str>, now_ms: i64) -> Option<bool> {
    let exp = decode(token)?.exp?;
    Some(now_ms >= exp.saturating_mul(1000))
}

pub fn is_expired(token: Option<&str>) -> Option<bool> {
    is_expired_at(token, now_millis())
}

/// Whole minutes left before expiry, floored and never negative
pub fn minutes_remaining_at(token: Option<&str>, now_ms: i64) -> Option<i64> {
    let exp = decode(token)?.exp?;
    let left = exp.saturating_mul(1000).saturating_sub(now_ms);
    Some(left.div_euclid(MS_PER_MINUTE).max(0))
}

pub fn minutes_remaining(token: Option<&str>) -> Option<i64> {
    minutes_remaining_at(token, now_millis())
}

/// True when the token's role claim matches `required_role`, ignoring a
/// `ROLE_` prefix on either side.
pub fn has_role(token: Option<&str>, required_role: &str) -> bool {
    let Some(claims) = decode(token) else {
        return false;
    };
    let Some(role) = claims.role_claim() else {
        debug!("token carries no role claim");
        return false;
    };
    roles_match(role, required_role)
}

/// Identity fields embedded in a token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenUserInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub tipo_usuario: Option<String>,
}

pub fn user_info(token: Option<&str>) -> Option<TokenUserInfo> {
    decode(token).map(|claims| TokenUserInfo {
        id: claims.sub,
        name: claims.name,
        email: claims.email,
        role: claims.role,
        tipo_usuario: claims.tipo_usuario,
    })
}

/// Still valid but with fewer than five minutes left
pub fn is_near_expiration_at(token: Option<&str>, now_ms: i64) -> bool {
    matches!(
        minutes_remaining_at(token, now_ms),
        Some(m) if m > 0 && m < NEAR_EXPIRATION_MINUTES
    )
}

pub fn is_near_expiration(token: Option<&str>) -> bool {
    is_near_expiration_at(token, now_millis())
}

/// Human readable expiry, e.g. `Expira em 1h 5min`
pub fn format_expiration_at(token: Option<&str>, now_ms: i64) -> String {
    let Some(exp) = decode(token).and_then(|c| c.exp) else {
        return "Token inválido".to_string();
    };

    let left = exp.saturating_mul(1000).saturating_sub(now_ms);
    if left <= 0 {
        return "Token expirado".to_string();
    }

    let minutes = left / MS_PER_MINUTE;
    let hours = minutes / 60;
    if hours > 0 {
        format!("Expira em {}h {}min", hours, minutes % 60)
    } else {
        format!("Expira em {} minutos", minutes)
    }
}

pub fn format_expiration(token: Option<&str>) -> String {
    format_expiration_at(token, now_millis())
}

/// Show only the tail of a credential
pub fn mask_token(token: &str) -> String {
    let tail: String = token
        .chars()
        .rev()
        .take(10)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{}", tail)
}

/// Diagnostic snapshot of a token, safe to log
#[derive(Debug, Clone, Serialize)]
pub struct TokenDebugInfo {
    pub is_valid: bool,
    pub is_expired: Option<bool>,
    pub claims: Option<TokenClaims>,
    pub user_info: Option<TokenUserInfo>,
    pub minutes_remaining: Option<i64>,
    pub masked_token: Option<String>,
}

pub fn debug_info(token: Option<&str>) -> TokenDebugInfo {
    let now = now_millis();
    let claims = decode(token);
    TokenDebugInfo {
        is_valid: claims.is_some(),
        is_expired: is_expired_at(token, now),
        user_info: user_info(token),
        claims,
        minutes_remaining: minutes_remaining_at(token, now),
        masked_token: token.filter(|t| !t.is_empty()).map(mask_token),
    }
}

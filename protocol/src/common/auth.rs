//! Authentication-related common types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims carried in the payload segment of an access token.
///
/// Every field is optional: the client only inspects what is present and
/// never trusts these values for anything the server has to enforce.
///
/// Any JSON object deserializes. Known claims are read leniently (a numeric
/// `sub`, a fractional `exp`, a role list); a claim of an unusable type is
/// kept in `extra` instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenClaims {
    /// Subject (user ID as string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Alternate role claim used by some backend revisions
    #[serde(rename = "tipoUsuario", skip_serializing_if = "Option::is_none")]
    pub tipo_usuario: Option<String>,
    /// Expiration time (Unix timestamp, seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued at time (Unix timestamp, seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Claims this client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for TokenClaims {
    fn from(mut map: Map<String, Value>) -> Self {
        let sub = take_claim(&mut map, "sub", text_claim);
        let email = take_claim(&mut map, "email", text_claim);
        let name = take_claim(&mut map, "name", text_claim);
        let role = take_claim(&mut map, "role", role_claim);
        let tipo_usuario = take_claim(&mut map, "tipoUsuario", role_claim);
        let exp = take_claim(&mut map, "exp", timestamp_claim);
        let iat = take_claim(&mut map, "iat", timestamp_claim);
        let iss = take_claim(&mut map, "iss", text_claim);
        Self {
            sub,
            email,
            name,
            role,
            tipo_usuario,
            exp,
            iat,
            iss,
            extra: map,
        }
    }
}

impl<'de> Deserialize<'de> for TokenClaims {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(Self::from)
    }
}

/// Remove `key` when `read` understands its value; otherwise leave it in place
fn take_claim<T>(
    map: &mut Map<String, Value>,
    key: &str,
    read: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = read(map.get(key)?)?;
    map.remove(key);
    Some(value)
}

fn text_claim(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A role may arrive as a list; the first textual entry wins
fn role_claim(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }),
        other => text_claim(other),
    }
}

/// Seconds since the epoch; fractions are truncated toward the past
fn timestamp_claim(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.floor() as i64))
        }
        _ => None,
    }
}

impl TokenClaims {
    /// Role claim, preferring `role` over `tipoUsuario`
    pub fn role_claim(&self) -> Option<&str> {
        self.role
            .as_deref()
            .filter(|r| !r.is_empty())
            .or_else(|| self.tipo_usuario.as_deref().filter(|r| !r.is_empty()))
    }
}

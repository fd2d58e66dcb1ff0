//! User roles and prefix-insensitive role comparison

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Conventional prefix some backends put in front of role names
pub const ROLE_PREFIX: &str = "ROLE_";

/// Strip a leading `ROLE_` so `ROLE_ADMIN` and `ADMIN` compare equal.
pub fn normalize_role(role: &str) -> &str {
    role.strip_prefix(ROLE_PREFIX).unwrap_or(role)
}

/// Case-sensitive comparison of two role strings after prefix stripping
pub fn roles_match(actual: &str, required: &str) -> bool {
    normalize_role(actual) == normalize_role(required)
}

/// Closed set of account categories known to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "ORGANIZADOR")]
    Organizer,
    #[serde(rename = "ATLETA")]
    Athlete,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Organizer, Role::Athlete];

    /// Wire name without prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Organizer => "ORGANIZADOR",
            Role::Athlete => "ATLETA",
        }
    }

    /// Parse a raw role claim, accepting the `ROLE_` prefix
    pub fn parse(raw: &str) -> Option<Role> {
        let normalized = normalize_role(raw);
        Role::ALL.into_iter().find(|r| r.as_str() == normalized)
    }

    /// Label shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Organizer => "Organizador",
            Role::Athlete => "Atleta",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| ClientError::invalid_input(format!("Unknown role: {}", s)))
    }
}

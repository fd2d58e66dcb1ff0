//! Unified error handling for the event-registration client and CLI
//!
//! This module provides a single coded error type with:
//! - Unique error codes for debugging and support requests
//! - HTTP status classification used by the request interceptor
//! - Convenient constructor methods
//! - Automatic conversions from common error types

use std::fmt;
use thiserror::Error;

/// Unified Result type for all client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error codes for client operations
///
/// Each error has a unique code in the format `EXXX` where:
/// - E1XX: Session, authentication and authorization errors
/// - E2XX: Network and API errors
/// - E3XX: Storage and I/O errors
/// - E4XX: Configuration errors
/// - E5XX: Validation and input errors
/// - E8XX: UI and interaction errors
/// - E9XX: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Session / auth (E1XX)
    /// E101: Authentication failed
    AuthenticationFailed,
    /// E102: Authorization denied (HTTP 403)
    AuthorizationDenied,
    /// E104: Credentials rejected by the server (HTTP 401)
    Unauthorized,
    /// E105: No active session
    SessionNotFound,
    /// E106: Token refresh failed
    RefreshFailed,

    // Network (E2XX)
    /// E201: HTTP request failed
    HttpError,
    /// E202: Connection timeout
    ConnectionTimeout,
    /// E203: Server unreachable
    ConnectionRefused,
    /// E205: API returned error response
    ApiError,
    /// E206: Invalid API response format
    InvalidResponse,

    // Storage / IO (E3XX)
    /// E301: File not found
    FileNotFound,
    /// E302: File read error
    FileReadError,
    /// E303: File write error
    FileWriteError,

    // Configuration (E4XX)
    /// E401: Configuration error
    ConfigError,
    /// E402: Invalid endpoint URL
    InvalidEndpoint,

    // Validation (E5XX)
    /// E501: Invalid input
    InvalidInput,
    /// E502: Validation failed
    ValidationFailed,

    // UI (E8XX)
    /// E801: Dialog error
    DialogError,

    // Internal (E9XX)
    /// E901: Internal error
    InternalError,
    /// E902: Serialization error
    SerializationError,
    /// E903: Resource not found
    ResourceNotFound,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::AuthenticationFailed => 101,
            ErrorCode::AuthorizationDenied => 102,
            ErrorCode::Unauthorized => 104,
            ErrorCode::SessionNotFound => 105,
            ErrorCode::RefreshFailed => 106,

            ErrorCode::HttpError => 201,
            ErrorCode::ConnectionTimeout => 202,
            ErrorCode::ConnectionRefused => 203,
            ErrorCode::ApiError => 205,
            ErrorCode::InvalidResponse => 206,

            ErrorCode::FileNotFound => 301,
            ErrorCode::FileReadError => 302,
            ErrorCode::FileWriteError => 303,

            ErrorCode::ConfigError => 401,
            ErrorCode::InvalidEndpoint => 402,

            ErrorCode::InvalidInput => 501,
            ErrorCode::ValidationFailed => 502,

            ErrorCode::DialogError => 801,

            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
            ErrorCode::ResourceNotFound => 903,
        }
    }

    /// Get the string code (e.g., "E101")
    pub fn as_str(&self) -> String {
        format!("E{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.code())
    }
}

/// Main error type for all client operations
#[derive(Error, Debug)]
pub enum ClientError {
    // ==================== Session / Auth Errors (E1XX) ====================
    /// Local authentication failure (no session, no refresh token, ...)
    #[error("[{code}] Authentication failed: {message}")]
    Authentication { code: ErrorCode, message: String },

    /// Server rejected the credential (HTTP 401)
    #[error("[{code}] Unauthorized: {message}")]
    Unauthorized { code: ErrorCode, message: String },

    /// Server denied access to the resource (HTTP 403)
    #[error("[{code}] Authorization denied: {message}")]
    Authorization { code: ErrorCode, message: String },

    // ==================== Network Errors (E2XX) ====================
    /// Server unreachable (status 0)
    #[error("[{code}] Network error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// API error with status code
    #[error("[{code}] API error ({status}): {message}")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    // ==================== Storage Errors (E3XX) ====================
    /// File or IO error
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ==================== Configuration Errors (E4XX) ====================
    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    // ==================== Validation Errors (E5XX) ====================
    #[error("[{code}] Validation error: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        field: Option<String>,
    },

    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    // ==================== UI Errors (E8XX) ====================
    #[error("[{code}] UI error: {message}")]
    Ui { code: ErrorCode, message: String },

    // ==================== Internal Errors (E9XX) ====================
    #[error("[{code}] Not found: {resource}")]
    NotFound { code: ErrorCode, resource: String },

    #[error("[{code}] Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

// ==================== Constructor Methods ====================

impl ClientError {
    // --- Session / auth ---

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            code: ErrorCode::AuthenticationFailed,
            message: message.into(),
        }
    }

    pub fn session_not_found() -> Self {
        Self::Authentication {
            code: ErrorCode::SessionNotFound,
            message: "No active session. Please log in.".to_string(),
        }
    }

    pub fn refresh_failed(message: impl Into<String>) -> Self {
        Self::Authentication {
            code: ErrorCode::RefreshFailed,
            message: message.into(),
        }
    }

    /// HTTP 401 from the server
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: ErrorCode::Unauthorized,
            message: message.into(),
        }
    }

    /// HTTP 403 from the server
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            code: ErrorCode::AuthorizationDenied,
            message: message.into(),
        }
    }

    // --- Network ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            code: ErrorCode::ConnectionRefused,
            message: message.into(),
            source: None,
        }
    }

    pub fn network_from_reqwest(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else {
            ErrorCode::HttpError
        };

        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::ApiError,
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::InvalidResponse,
            status,
            message: message.into(),
        }
    }

    // --- Storage ---

    pub fn io_from_error(context: impl Into<String>, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileWriteError,
            _ => ErrorCode::FileReadError,
        };

        Self::Io {
            code,
            context: context.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    // --- Configuration ---

    pub fn config_from_error(err: config::ConfigError) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: err.to_string(),
            source: Some(err),
        }
    }

    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::InvalidEndpoint,
            message: message.into(),
            source: None,
        }
    }

    // --- Validation ---

    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    // --- UI ---

    // --- Internal ---

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::ResourceNotFound,
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    // --- Utility Methods ---

    /// Build the error matching a failed HTTP response
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            0 => Self::network(message),
            401 => Self::unauthorized(message),
            403 => Self::authorization(message),
            404 => Self::Api {
                code: ErrorCode::ResourceNotFound,
                status,
                message: message.into(),
            },
            _ => Self::api(status, message),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Authentication { code, .. } => *code,
            Self::Unauthorized { code, .. } => *code,
            Self::Authorization { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Api { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            Self::Ui { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// HTTP status this error stands for; `Some(0)` when the server was unreachable
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Authorization { .. } => Some(403),
            Self::Network { .. } => Some(0),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Unauthorized { .. } | Self::Authorization { .. }
        )
    }
}

// ==================== From Implementations ====================

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::io_from_error("IO operation", err)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::network_from_reqwest(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::config_from_error(err)
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err.field_errors().keys().next().map(|f| f.to_string());
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: err.to_string(),
            field,
        }
    }
}

impl From<dialoguer::Error> for ClientError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Ui {
            code: ErrorCode::DialogError,
            message: format!("Dialog error: {}", err),
        }
    }
}

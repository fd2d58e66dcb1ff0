//! User-facing notices raised by the HTTP policy and session expiry

use std::sync::Mutex;
use std::time::Duration;

use tracing::{error, info, warn};

pub const ACCESS_DENIED: &str = "Acesso negado - Você não tem permissão para esta ação";
pub const CONNECTION_ERROR: &str = "Erro de conexão - Verifique sua internet e tente novamente";
pub const SERVER_ERROR: &str = "Erro interno do servidor - Tente novamente mais tarde";
pub const REQUEST_ERROR: &str = "Erro na solicitação";
pub const GENERIC_ERROR: &str = "Erro no servidor";
pub const SESSION_EXPIRED: &str = "Sua sessão expirou - Faça login novamente";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            level,
            message: message.into(),
            duration,
        }
    }

    pub fn access_denied() -> Self {
        Self::new(NoticeLevel::Error, ACCESS_DENIED, Duration::from_secs(5))
    }

    pub fn connection_error() -> Self {
        Self::new(NoticeLevel::Error, CONNECTION_ERROR, Duration::from_secs(5))
    }

    pub fn session_expired() -> Self {
        Self::new(NoticeLevel::Warning, SESSION_EXPIRED, Duration::from_secs(5))
    }

    /// Notice for any other failed status.
    ///
    /// 5xx gets a fixed message, 4xx prefers the server's own message.
    pub fn for_status(status: u16, server_message: Option<&str>) -> Self {
        let message = match status {
            500.. => SERVER_ERROR.to_string(),
            400..=499 => server_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(REQUEST_ERROR)
                .to_string(),
            _ => GENERIC_ERROR.to_string(),
        };
        Self::new(NoticeLevel::Error, message, Duration::from_secs(5))
    }
}

/// Displays notices to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sends notices to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(message = %notice.message, "notice"),
            NoticeLevel::Warning => warn!(message = %notice.message, "notice"),
            NoticeLevel::Error => error!(message = %notice.message, "notice"),
        }
    }
}

/// Keeps every notice so callers can inspect or drain them later
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

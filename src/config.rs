//! Configuration management for the inscricao CLI and client library

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::error::{ClientError, Result};
use crate::navigation::routes;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const ENV_PREFIX: &str = "EVENTSPORTS";

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eventsports")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eventsports")
}

pub fn default_session_path() -> PathBuf {
    default_storage_dir().join("session.json")
}

/// Backend endpoint paths, relative to `base_url`
pub struct Endpoints;

impl Endpoints {
    pub const AUTH_LOGIN: &'static str = "/auth/login";
    pub const AUTH_REGISTER: &'static str = "/auth/register";
    pub const AUTH_REFRESH: &'static str = "/auth/refresh";
    pub const AUTH_LOGOUT: &'static str = "/auth/logout";

    pub const EVENTS: &'static str = "/eventos";

    pub fn event(id: i64) -> String {
        format!("/eventos/{}", id)
    }

    pub fn categories_by_event(event_id: i64) -> String {
        format!("/categorias/evento/{}", event_id)
    }

    pub fn category(id: i64) -> String {
        format!("/categorias/{}", id)
    }

    pub fn leaderboard(event_id: i64, category_id: i64) -> String {
        format!("/leaderboard/evento/{}/categoria/{}", event_id, category_id)
    }

    pub fn ranking(event_id: i64, category_id: i64) -> String {
        format!(
            "/leaderboards/evento/{}/categoria/{}/ranking",
            event_id, category_id
        )
    }

    pub fn workouts_by_event(event_id: i64) -> String {
        format!("/workouts/evento/{}", event_id)
    }

    pub fn workout_results(workout_id: i64, category_id: i64) -> String {
        format!(
            "/workouts/{}/resultados?categoriaId={}",
            workout_id, category_id
        )
    }

    pub fn workout_result_create(workout_id: i64) -> String {
        format!("/workouts/{}/resultados", workout_id)
    }

    pub fn team_result(workout_id: i64, team_id: i64) -> String {
        format!("/workouts/{}/resultados/equipe/{}", workout_id, team_id)
    }

    pub fn athlete_result(workout_id: i64, athlete_id: i64) -> String {
        format!("/workouts/{}/resultados/atleta/{}", workout_id, athlete_id)
    }

    pub fn workout_status(workout_id: i64, category_id: i64) -> String {
        format!(
            "/workouts/{}/resultados/status?categoriaId={}",
            workout_id, category_id
        )
    }

    pub fn results_initialized(workout_id: i64, category_id: i64) -> String {
        format!(
            "/workouts/{}/resultados/verificar-inicializados?categoriaId={}",
            workout_id, category_id
        )
    }

    pub fn timeline_by_event(event_id: i64) -> String {
        format!("/timeline/evento/{}", event_id)
    }

    pub fn attachments_by_event(event_id: i64) -> String {
        format!("/anexos/evento/{}", event_id)
    }

    pub fn attachment_download(id: i64) -> String {
        format!("/anexos/{}/download", id)
    }

    pub fn participants_by_category(event_id: i64, category_id: i64) -> String {
        format!("/atletas/evento/{}/categoria/{}", event_id, category_id)
    }

    pub fn registrations_by_category(category_id: i64) -> String {
        format!("/inscricoes/categoria/{}", category_id)
    }

    pub fn registrations_by_event(event_id: i64) -> String {
        format!("/inscricoes/evento/{}", event_id)
    }

    /// Endpoints whose 401 is the caller's business, never a refresh trigger
    pub fn is_auth_endpoint(url: &str) -> bool {
        let path = strip_query(url);
        [Self::AUTH_LOGIN, Self::AUTH_REGISTER, Self::AUTH_LOGOUT]
            .iter()
            .any(|endpoint| path.ends_with(endpoint))
    }

    pub fn is_logout_endpoint(url: &str) -> bool {
        strip_query(url).ends_with(Self::AUTH_LOGOUT)
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub persist_session: bool,
    #[serde(default = "default_expiry_redirect_delay_ms")]
    pub expiry_redirect_delay_ms: u64,
    #[serde(default = "default_landing")]
    pub default_landing: String,
    #[serde(default = "default_events_fallback")]
    pub events_fallback: String,
    #[serde(default = "default_true")]
    pub use_proxy: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_expiry_redirect_delay_ms() -> u64 {
    1000
}

fn default_landing() -> String {
    routes::DASHBOARD.to_string()
}

fn default_events_fallback() -> String {
    routes::EVENTS.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: default_timeout(),
            verbose: false,
            session_file: None,
            persist_session: true,
            expiry_redirect_delay_ms: default_expiry_redirect_delay_ms(),
            default_landing: default_landing(),
            events_fallback: default_events_fallback(),
            use_proxy: true,
        }
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<u64>,
    verbose: Option<bool>,
    session_file: Option<PathBuf>,
    persist_session: Option<bool>,
    expiry_redirect_delay_ms: Option<u64>,
    config_file: Option<PathBuf>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn session_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn persist_session(mut self, persist: bool) -> Self {
        self.persist_session = Some(persist);
        self
    }

    pub fn expiry_redirect_delay_ms(mut self, delay: u64) -> Self {
        self.expiry_redirect_delay_ms = Some(delay);
        self
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_file_and_env(self.config_file.as_deref())?;

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }
        if let Some(session_file) = self.session_file {
            config.session_file = Some(session_file);
        }
        if let Some(persist) = self.persist_session {
            config.persist_session = persist;
        }
        if let Some(delay) = self.expiry_redirect_delay_ms {
            config.expiry_redirect_delay_ms = delay;
        }

        config.use_proxy =
            !config.base_url.contains("localhost") && !config.base_url.contains("127.0.0.1");

        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Layer defaults, an optional config file and `EVENTSPORTS_*` variables
    pub fn from_file_and_env<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout", defaults.timeout)?
            .set_default("verbose", defaults.verbose)?
            .set_default("persist_session", defaults.persist_session)?
            .set_default("expiry_redirect_delay_ms", defaults.expiry_redirect_delay_ms)?
            .set_default("default_landing", defaults.default_landing)?
            .set_default("events_fallback", defaults.events_fallback)?
            .set_default("use_proxy", defaults.use_proxy)?;

        if let Some(config_path) = config_file {
            if config_path.as_ref().exists() {
                builder = builder.add_source(File::from(config_path.as_ref()));
            }
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::invalid_input("Base URL cannot be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::invalid_endpoint(format!(
                "Base URL must start with http:// or https://: {}",
                self.base_url
            )));
        }
        if self.timeout == 0 {
            return Err(ClientError::validation_field(
                "Timeout must be greater than zero",
                "timeout",
            ));
        }
        Ok(())
    }

    /// Join base URL and endpoint with exactly one slash
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(default_session_path)
    }

    pub fn expiry_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.expiry_redirect_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

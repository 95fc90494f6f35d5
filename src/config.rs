use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_MIRROR_TIMEOUT_SECS: u64 = 10;
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Realtime stock-mirror store configuration.
///
/// The mirror receives a copy of every product's stock level for low-latency
/// display; it is best-effort and never part of the relational transaction.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
    /// Whether stock changes are pushed to the mirror store at all
    #[serde(default = "default_true_bool")]
    pub enabled: bool,

    /// Base URL of the realtime database (e.g. "https://project-id.firebaseio.com")
    #[serde(default)]
    pub database_url: String,

    /// Optional auth token appended to mirror requests
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Outbound request timeout (seconds)
    #[serde(default = "default_mirror_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_url: String::new(),
            auth_token: None,
            timeout_secs: DEFAULT_MIRROR_TIMEOUT_SECS,
        }
    }
}

/// Generative-text completion service configuration.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    /// API key for the completion service
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the completion service
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,

    /// Model identifier submitted with each completion request
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Outbound request timeout (seconds)
    #[serde(default = "default_completion_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_COMPLETION_BASE_URL.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            timeout_secs: DEFAULT_COMPLETION_TIMEOUT_SECS,
        }
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback
    #[serde(default = "default_false_bool")]
    pub cors_allow_any_origin: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// Request timeout applied to the whole HTTP stack (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Event channel capacity for async event processing
    #[serde(default = "default_event_channel_capacity")]
    #[validate(custom = "validate_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Realtime stock-mirror store
    #[serde(default)]
    #[validate]
    pub mirror: MirrorConfig,

    /// Generative-text completion service
    #[serde(default)]
    #[validate]
    pub completion: CompletionConfig,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_true_bool() -> bool {
    true
}
fn default_false_bool() -> bool {
    false
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_event_channel_capacity() -> usize {
    1024
}
fn default_mirror_timeout_secs() -> u64 {
    DEFAULT_MIRROR_TIMEOUT_SECS
}
fn default_completion_timeout_secs() -> u64 {
    DEFAULT_COMPLETION_TIMEOUT_SECS
}
fn default_completion_base_url() -> String {
    DEFAULT_COMPLETION_BASE_URL.to_string()
}
fn default_completion_model() -> String {
    DEFAULT_COMPLETION_MODEL.to_string()
}

fn validate_event_channel_capacity(capacity: usize) -> Result<(), ValidationError> {
    if capacity == 0 {
        let mut err = ValidationError::new("event_channel_capacity");
        err.message = Some("event_channel_capacity must be greater than 0".into());
        return Err(err);
    }
    Ok(())
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Checks constraints that span fields and can't be expressed as
    /// single-field validators.
    pub fn validate_additional_constraints(&self) -> Result<(), ConfigValidationError> {
        if !self.should_allow_permissive_cors() && self.cors_allowed_origins.is_none() {
            return Err(ConfigValidationError::MissingCorsOrigins);
        }
        if self.mirror.enabled && self.mirror.database_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingMirrorUrl);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("CORS origins must be configured outside development (set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true)")]
    MissingCorsOrigins,
    #[error("Mirror store is enabled but APP__MIRROR__DATABASE_URL is not set")]
    MissingMirrorUrl,
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Constraint(#[from] ConfigValidationError),
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("counterpoint_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Default config (config/default.toml)
/// 2. Environment-specific config (config/{env}.toml)
/// 3. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let builder = Config::builder()
        .set_default("database_url", "sqlite://counterpoint.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false));

    let config = builder
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration validation failed: {}", e);
        AppConfigError::Constraint(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 8080,
            environment: "production".into(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            event_channel_capacity: default_event_channel_capacity(),
            mirror: MirrorConfig {
                database_url: "https://example.firebaseio.com".into(),
                ..MirrorConfig::default()
            },
            completion: CompletionConfig::default(),
        }
    }

    #[test]
    fn non_dev_requires_cors_origins() {
        let cfg = base_config();
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn non_dev_with_origins_passes() {
        let mut cfg = base_config();
        cfg.cors_allowed_origins = Some("https://example.com".into());
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn development_allows_permissive_by_default() {
        let mut cfg = base_config();
        cfg.environment = "development".into();
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn enabled_mirror_requires_url() {
        let mut cfg = base_config();
        cfg.cors_allow_any_origin = true;
        cfg.mirror.database_url = String::new();
        assert!(matches!(
            cfg.validate_additional_constraints(),
            Err(ConfigValidationError::MissingMirrorUrl)
        ));
    }

    #[test]
    fn disabled_mirror_needs_no_url() {
        let mut cfg = base_config();
        cfg.cors_allow_any_origin = true;
        cfg.mirror.enabled = false;
        cfg.mirror.database_url = String::new();
        assert!(cfg.validate_additional_constraints().is_ok());
    }
}

//! Configuration for the dnscontroller server and CLI.
//!
//! Values are layered: built-in defaults, then `config.toml` (the platform
//! config dir, or an explicit path), then `DNSCONTROLLER_*` environment
//! variables. Nested keys use a double underscore in the environment, so
//! `db.uri` is `DNSCONTROLLER_DB__URI`. The CLI applies its flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DNSCONTROLLER_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Address the API server binds.
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub db: DbConfig,

    #[serde(default)]
    pub debug: DebugConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where the CLI's record commands send their requests.
    #[serde(default)]
    pub client: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            db: DbConfig::default(),
            debug: DebugConfig::default(),
            logging: LoggingConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DbConfig {
    #[serde(default = "default_db_uri")]
    pub uri: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            uri: default_db_uri(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DebugConfig {
    /// Log every SQL statement.
    #[serde(default)]
    pub sql: bool,

    /// Log every HTTP request at INFO.
    #[serde(default)]
    pub http: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Force debug-level logging, and both debug toggles.
    #[serde(default)]
    pub debug: bool,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_client_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:14000".into()
}
fn default_db_uri() -> String {
    "sqlite://dnscontroller.db".into()
}
fn default_client_url() -> String {
    "http://127.0.0.1:14000".into()
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// SQL statement logging, on when either `debug.sql` or `logging.debug` is.
    pub fn debug_sql(&self) -> bool {
        self.debug.sql || self.logging.debug
    }

    /// Verbose request logging, on when either `debug.http` or `logging.debug` is.
    pub fn debug_http(&self) -> bool {
        self.debug.http || self.logging.debug
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "listen".into(),
                reason: "must not be empty".into(),
            });
        }

        if self.db.uri.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "db.uri".into(),
                reason: "must not be empty".into(),
            });
        }

        url::Url::parse(&self.client.url).map_err(|e| ConfigError::Validation {
            field: "client.url".into(),
            reason: format!("invalid URL {:?}: {e}", self.client.url),
        })?;

        if self.client.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "client.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("sh", "hollow", "dnscontroller").map_or_else(
        || PathBuf::from(".dnscontroller").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// The layered figment for `path` (or the default config path). Exposed so
/// callers can merge their own overrides before extracting.
pub fn figment(path: Option<&Path>) -> Figment {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load and validate the config. A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config: Config = figment(path).extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (or the default path),
/// creating parent directories. Returns the path written.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}

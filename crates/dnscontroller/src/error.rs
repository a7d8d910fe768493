//! CLI error types with miette diagnostics.
//!
//! Maps client, store and config failures into user-facing errors with
//! actionable help text and a distinct exit code per kind.

use miette::Diagnostic;
use thiserror::Error;

use dnscontroller_config::ConfigError;
use dnscontroller_core::{CoreError, StoreError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to dnscontroller at {url}")]
    #[diagnostic(
        code(dnscontroller::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Start one with: dnscontroller serve\n\
             Or point at another with: --server <URL>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: dnscontroller_api::Error,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(dnscontroller::not_found),
        help("Create it with: dnscontroller records create {identifier_args}")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        identifier_args: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(dnscontroller::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
        detail: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}: {error}")]
    #[diagnostic(code(dnscontroller::rejected))]
    Rejected { message: String, error: String },

    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(dnscontroller::api_error))]
    Api { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dnscontroller::validation))]
    Validation { field: String, reason: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Could not open database {uri}")]
    #[diagnostic(
        code(dnscontroller::database),
        help("Check db.uri in the config file, or pass --db-uri.")
    )]
    Database {
        uri: String,
        #[source]
        source: StoreError,
    },

    #[error("Server failed on {listen}")]
    #[diagnostic(code(dnscontroller::serve))]
    Serve {
        listen: String,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(dnscontroller::config),
        help("Run: dnscontroller config path  to see which file is read.")
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(dnscontroller::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(dnscontroller::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not render output: {0}")]
    Render(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.into())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::Validation {
            field: "answer".into(),
            reason: err.to_string(),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::Rejected { .. } | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate a client failure for the record `name/record_type`.
    pub fn from_api(
        err: dnscontroller_api::Error,
        server: &str,
        name: &str,
        record_type: &str,
    ) -> Self {
        use dnscontroller_api::Error as ApiError;

        if err.is_connect() {
            return Self::ConnectionFailed {
                url: server.to_owned(),
                source: err,
            };
        }

        match err {
            ApiError::Api { status: 404, .. } => Self::NotFound {
                resource_type: "record".into(),
                identifier: format!("{name}/{record_type}"),
                identifier_args: format!("{name} {record_type}"),
            },
            ApiError::Api {
                status: 409, error, ..
            } => Self::Conflict {
                resource_type: "record or answer".into(),
                identifier: format!("{name}/{record_type}"),
                detail: error,
            },
            ApiError::Api {
                status: 400,
                message,
                error,
            } => Self::Rejected { message, error },
            ApiError::Api {
                status,
                message,
                error,
            } => Self::Api {
                status,
                message: if error.is_empty() {
                    message
                } else {
                    format!("{message}: {error}")
                },
            },
            other => Self::ConnectionFailed {
                url: server.to_owned(),
                source: other,
            },
        }
    }
}

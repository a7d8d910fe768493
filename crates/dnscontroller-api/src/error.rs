use thiserror::Error;

/// Top-level error type for the `dnscontroller-api` crate.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success response from the server, with its `{message, error}`
    /// body when it sent one.
    #[error("API error (HTTP {status}): {message}: {error}")]
    Api {
        status: u16,
        message: String,
        error: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the server reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the request collided with an existing record or answer.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Api { status: 409, .. })
    }

    /// Returns `true` if the server rejected the request as malformed.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::Api { status: 400, .. })
    }

    /// Returns `true` if the server could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect() || e.is_timeout())
    }
}

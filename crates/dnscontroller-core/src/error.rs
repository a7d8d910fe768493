// ── Core error types ──
//
// Sentinel error kinds for the entity layer. Validation failures are raised
// before the store is touched; store failures keep "not found" and
// "duplicate key" distinguishable so the upsert paths can branch on them.

use thiserror::Error;

/// A value failed an entity invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no record name")]
    NoRecordName,

    #[error("no record type")]
    NoRecordType,

    #[error("unsupported record type: {0}")]
    UnsupportedType(String),

    #[error("no answer target")]
    NoAnswerTarget,

    #[error("no answer type")]
    NoAnswerType,

    #[error("no answer details provided for answer with has_details set")]
    NoAnswerDetail,

    #[error("answer details provided for answer without has_details set")]
    UnexpectedAnswerDetail,

    #[error("more than one detail provided for answer")]
    MultipleAnswerDetails,

    #[error("no detail uuid set")]
    NoDetailId,

    #[error("no detail answer_id set")]
    NoDetailAnswerId,
}

/// Failure reported by the persistence substrate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Request payload was not valid JSON or did not match the expected shape.
    #[error("invalid payload: {message}")]
    Parse { message: String },
}

impl CoreError {
    /// Returns `true` if a lookup matched no rows.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound { .. }))
    }

    /// Returns `true` if an insert collided with an existing natural key.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Store(StoreError::Duplicate { .. }))
    }

    /// Returns `true` for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Parse { .. })
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

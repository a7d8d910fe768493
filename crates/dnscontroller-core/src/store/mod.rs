//! Persistence substrate for records, answers and answer details.
//!
//! The entity layer only ever sees the row-level primitives on [`Store`].
//! [`Database`] is the process-wide handle (a connection pool) and can open
//! a scoped [`Transaction`], which is itself a `Store` so entity operations
//! run unchanged inside it.

mod queries;
mod sqlite;

pub use sqlite::{SqliteStore, SqliteTransaction};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

// ── Persisted shapes ────────────────────────────────────────────────

/// Row in the `records` table.
///
/// `id` is `None` for a row that has not been stored yet; the store assigns
/// one on insert.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RecordRow {
    pub id: Option<String>,
    pub record: String,
    pub record_type: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row in the `answers` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AnswerRow {
    pub id: Option<String>,
    pub target: String,
    #[sqlx(rename = "type")]
    pub answer_type: String,
    pub ttl: i64,
    pub has_details: bool,
    pub owner_id: String,
    pub record_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row in the `answer_details` table. SRV fields are nullable in storage.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DetailRow {
    pub id: Option<String>,
    pub answer_id: String,
    pub port: Option<i64>,
    pub priority: Option<i64>,
    pub weight: Option<i64>,
    pub protocol: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Natural key of an answer. Every column is an exact-match predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnswerKey {
    pub target: String,
    pub answer_type: String,
    pub record_id: String,
    pub owner_id: String,
}

impl std::fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} (record {}, owner {})",
            self.target, self.answer_type, self.record_id, self.owner_id
        )
    }
}

// ── Traits ──────────────────────────────────────────────────────────

/// Query, insert and delete primitives over the three tables.
///
/// Lookups that match nothing return [`StoreError::NotFound`]; inserts that
/// collide with a natural key return [`StoreError::Duplicate`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_record(&self, name: &str, record_type: &str) -> Result<RecordRow>;

    async fn insert_record(&self, row: RecordRow) -> Result<RecordRow>;

    async fn delete_record(&self, id: &str) -> Result<()>;

    async fn answers_for_record(&self, record_id: &str) -> Result<Vec<AnswerRow>>;

    async fn find_answer(&self, key: &AnswerKey) -> Result<AnswerRow>;

    async fn insert_answer(&self, row: AnswerRow) -> Result<AnswerRow>;

    async fn delete_answer(&self, id: &str) -> Result<()>;

    async fn details_for_answer(&self, answer_id: &str) -> Result<Vec<DetailRow>>;

    async fn find_detail(&self, answer_id: &str) -> Result<DetailRow>;

    async fn insert_detail(&self, row: DetailRow) -> Result<DetailRow>;

    async fn delete_detail(&self, id: &str) -> Result<()>;
}

/// The shared, thread-safe store handle.
#[async_trait]
pub trait Database: Store {
    /// Open a transaction. Dropping it without [`Transaction::commit`] rolls
    /// back every write made through it.
    async fn begin(&self) -> Result<Box<dyn Transaction>>;

    /// Round-trip to the backend.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait Transaction: Store {
    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

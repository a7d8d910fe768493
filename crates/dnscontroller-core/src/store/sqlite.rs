//! SQLite storage backend.
//!
//! WAL journal mode for concurrent reads, foreign keys enforced, and a
//! UNIQUE constraint on each table's natural key so concurrent creates of
//! the same record or answer cannot produce duplicate rows.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, Sqlite, SqliteConnection, SqlitePool};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use super::{
    AnswerKey, AnswerRow, Database, DetailRow, RecordRow, Result, Store, Transaction, queries,
};
use crate::error::StoreError;

fn connect_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

/// Pooled SQLite store. Cheap to share behind an `Arc`.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `uri`, e.g.
    /// `sqlite://dnscontroller.db`, and bootstrap the schema.
    ///
    /// `log_statements` turns on sqlx's per-statement debug logging.
    pub async fn open(uri: &str, log_statements: bool) -> Result<Self> {
        let mut options = SqliteConnectOptions::from_str(uri)
            .map_err(connect_error)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        if !log_statements {
            options = options.disable_statement_logging();
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await
            .map_err(connect_error)?;

        let store = Self { pool };
        store.create_tables().await?;
        info!(uri, "SQLite store opened");
        Ok(store)
    }

    /// A private in-memory database.
    ///
    /// Every connection to `:memory:` gets its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(connect_error)?
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(connect_error)?;

        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_tables(&self) -> Result<()> {
        for statement in queries::SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(connect_error)?;
        }
        Ok(())
    }
}

/// An open SQLite transaction. Rolls back on drop unless committed.
pub struct SqliteTransaction {
    tx: Mutex<Option<sqlx::Transaction<'static, Sqlite>>>,
}

fn finished() -> StoreError {
    StoreError::Database("transaction already finished".into())
}

// ── Connection plumbing ─────────────────────────────────────────────

mod sealed {
    use super::{Conn, Result};

    /// Hands out the connection a statement should run on.
    #[async_trait::async_trait]
    pub trait Connector: Send + Sync {
        async fn conn(&self) -> Result<Conn<'_>>;
    }
}

use sealed::Connector;

pub enum Conn<'a> {
    Pooled(PoolConnection<Sqlite>),
    Tx(MutexGuard<'a, Option<sqlx::Transaction<'static, Sqlite>>>),
}

impl Conn<'_> {
    fn get(&mut self) -> Result<&mut SqliteConnection> {
        match self {
            Self::Pooled(conn) => Ok(&mut **conn),
            Self::Tx(guard) => guard.as_deref_mut().ok_or_else(finished),
        }
    }
}

#[async_trait]
impl Connector for SqliteStore {
    async fn conn(&self) -> Result<Conn<'_>> {
        let conn = self.pool.acquire().await.map_err(connect_error)?;
        Ok(Conn::Pooled(conn))
    }
}

#[async_trait]
impl Connector for SqliteTransaction {
    async fn conn(&self) -> Result<Conn<'_>> {
        Ok(Conn::Tx(self.tx.lock().await))
    }
}

#[async_trait]
impl<T: Connector> Store for T {
    async fn find_record(&self, name: &str, record_type: &str) -> Result<RecordRow> {
        let mut conn = self.conn().await?;
        queries::find_record(conn.get()?, name, record_type).await
    }

    async fn insert_record(&self, row: RecordRow) -> Result<RecordRow> {
        let mut conn = self.conn().await?;
        queries::insert_record(conn.get()?, row).await
    }

    async fn delete_record(&self, id: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        queries::delete_record(conn.get()?, id).await
    }

    async fn answers_for_record(&self, record_id: &str) -> Result<Vec<AnswerRow>> {
        let mut conn = self.conn().await?;
        queries::answers_for_record(conn.get()?, record_id).await
    }

    async fn find_answer(&self, key: &AnswerKey) -> Result<AnswerRow> {
        let mut conn = self.conn().await?;
        queries::find_answer(conn.get()?, key).await
    }

    async fn insert_answer(&self, row: AnswerRow) -> Result<AnswerRow> {
        let mut conn = self.conn().await?;
        queries::insert_answer(conn.get()?, row).await
    }

    async fn delete_answer(&self, id: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        queries::delete_answer(conn.get()?, id).await
    }

    async fn details_for_answer(&self, answer_id: &str) -> Result<Vec<DetailRow>> {
        let mut conn = self.conn().await?;
        queries::details_for_answer(conn.get()?, answer_id).await
    }

    async fn find_detail(&self, answer_id: &str) -> Result<DetailRow> {
        let mut conn = self.conn().await?;
        queries::find_detail(conn.get()?, answer_id).await
    }

    async fn insert_detail(&self, row: DetailRow) -> Result<DetailRow> {
        let mut conn = self.conn().await?;
        queries::insert_detail(conn.get()?, row).await
    }

    async fn delete_detail(&self, id: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        queries::delete_detail(conn.get()?, id).await
    }
}

#[async_trait]
impl Database for SqliteStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>> {
        let tx = self.pool.begin().await.map_err(connect_error)?;
        Ok(Box::new(SqliteTransaction {
            tx: Mutex::new(Some(tx)),
        }))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(connect_error)?;
        Ok(())
    }
}

#[async_trait]
impl Transaction for SqliteTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        let tx = self.tx.into_inner().ok_or_else(finished)?;
        tx.commit().await.map_err(connect_error)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let tx = self.tx.into_inner().ok_or_else(finished)?;
        tx.rollback().await.map_err(connect_error)
    }
}

// ── SQL for the SQLite backend ──
//
// Every function takes a bare connection so the same statements run against
// a pooled connection or an open transaction.

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::{AnswerKey, AnswerRow, DetailRow, RecordRow, Result};
use crate::error::StoreError;

pub(super) const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS records (
        id          TEXT PRIMARY KEY NOT NULL,
        record      TEXT NOT NULL,
        record_type TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        UNIQUE (record, record_type)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS answers (
        id          TEXT PRIMARY KEY NOT NULL,
        record_id   TEXT NOT NULL REFERENCES records (id) ON DELETE CASCADE,
        owner_id    TEXT NOT NULL,
        target      TEXT NOT NULL,
        type        TEXT NOT NULL,
        ttl         INTEGER NOT NULL DEFAULT 3600,
        has_details INTEGER NOT NULL DEFAULT 0,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        UNIQUE (target, type, record_id, owner_id)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_answers_record ON answers (record_id)",
    r"
    CREATE TABLE IF NOT EXISTS answer_details (
        id         TEXT PRIMARY KEY NOT NULL,
        answer_id  TEXT NOT NULL UNIQUE REFERENCES answers (id) ON DELETE CASCADE,
        port       INTEGER,
        priority   INTEGER,
        weight     INTEGER,
        protocol   TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
];

const RECORD_COLUMNS: &str = "id, record, record_type, created_at, updated_at";
const ANSWER_COLUMNS: &str =
    "id, target, type, ttl, has_details, owner_id, record_id, created_at, updated_at";
const DETAIL_COLUMNS: &str =
    "id, answer_id, port, priority, weight, protocol, created_at, updated_at";

// ── Error mapping ───────────────────────────────────────────────────

fn read_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

fn write_error(entity: &'static str, key: String) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate { entity, key }
        }
        _ => StoreError::Database(err.to_string()),
    }
}

fn assign_id(id: Option<String>) -> String {
    id.unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn deleted(entity: &'static str, id: &str, rows: u64) -> Result<()> {
    if rows == 0 {
        return Err(StoreError::NotFound {
            entity,
            key: id.to_owned(),
        });
    }
    Ok(())
}

// ── Records ─────────────────────────────────────────────────────────

pub(super) async fn find_record(
    conn: &mut SqliteConnection,
    name: &str,
    record_type: &str,
) -> Result<RecordRow> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE record = ? AND record_type = ?");
    sqlx::query_as::<_, RecordRow>(&sql)
        .bind(name)
        .bind(record_type)
        .fetch_optional(conn)
        .await
        .map_err(read_error)?
        .ok_or_else(|| StoreError::NotFound {
            entity: "record",
            key: format!("{name}/{record_type}"),
        })
}

pub(super) async fn insert_record(conn: &mut SqliteConnection, row: RecordRow) -> Result<RecordRow> {
    let now = Utc::now();
    let key = format!("{}/{}", row.record, row.record_type);
    let sql = format!(
        "INSERT INTO records ({RECORD_COLUMNS}) VALUES (?, ?, ?, ?, ?) RETURNING {RECORD_COLUMNS}"
    );
    sqlx::query_as::<_, RecordRow>(&sql)
        .bind(assign_id(row.id))
        .bind(row.record)
        .bind(row.record_type)
        .bind(row.created_at.unwrap_or(now))
        .bind(row.updated_at.unwrap_or(now))
        .fetch_one(conn)
        .await
        .map_err(write_error("record", key))
}

pub(super) async fn delete_record(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM records WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await
        .map_err(read_error)?;
    deleted("record", id, result.rows_affected())
}

// ── Answers ─────────────────────────────────────────────────────────

pub(super) async fn answers_for_record(
    conn: &mut SqliteConnection,
    record_id: &str,
) -> Result<Vec<AnswerRow>> {
    let sql = format!("SELECT {ANSWER_COLUMNS} FROM answers WHERE record_id = ? ORDER BY created_at, id");
    sqlx::query_as::<_, AnswerRow>(&sql)
        .bind(record_id)
        .fetch_all(conn)
        .await
        .map_err(read_error)
}

pub(super) async fn find_answer(conn: &mut SqliteConnection, key: &AnswerKey) -> Result<AnswerRow> {
    let sql = format!(
        "SELECT {ANSWER_COLUMNS} FROM answers \
         WHERE record_id = ? AND owner_id = ? AND target = ? AND type = ?"
    );
    sqlx::query_as::<_, AnswerRow>(&sql)
        .bind(&key.record_id)
        .bind(&key.owner_id)
        .bind(&key.target)
        .bind(&key.answer_type)
        .fetch_optional(conn)
        .await
        .map_err(read_error)?
        .ok_or_else(|| StoreError::NotFound {
            entity: "answer",
            key: key.to_string(),
        })
}

pub(super) async fn insert_answer(conn: &mut SqliteConnection, row: AnswerRow) -> Result<AnswerRow> {
    let now = Utc::now();
    let key = AnswerKey {
        target: row.target.clone(),
        answer_type: row.answer_type.clone(),
        record_id: row.record_id.clone(),
        owner_id: row.owner_id.clone(),
    };
    let sql = format!(
        "INSERT INTO answers ({ANSWER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING {ANSWER_COLUMNS}"
    );
    sqlx::query_as::<_, AnswerRow>(&sql)
        .bind(assign_id(row.id))
        .bind(row.target)
        .bind(row.answer_type)
        .bind(row.ttl)
        .bind(row.has_details)
        .bind(row.owner_id)
        .bind(row.record_id)
        .bind(row.created_at.unwrap_or(now))
        .bind(row.updated_at.unwrap_or(now))
        .fetch_one(conn)
        .await
        .map_err(write_error("answer", key.to_string()))
}

pub(super) async fn delete_answer(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM answers WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await
        .map_err(read_error)?;
    deleted("answer", id, result.rows_affected())
}

// ── Answer details ──────────────────────────────────────────────────

pub(super) async fn details_for_answer(
    conn: &mut SqliteConnection,
    answer_id: &str,
) -> Result<Vec<DetailRow>> {
    let sql = format!("SELECT {DETAIL_COLUMNS} FROM answer_details WHERE answer_id = ?");
    sqlx::query_as::<_, DetailRow>(&sql)
        .bind(answer_id)
        .fetch_all(conn)
        .await
        .map_err(read_error)
}

pub(super) async fn find_detail(conn: &mut SqliteConnection, answer_id: &str) -> Result<DetailRow> {
    let sql = format!("SELECT {DETAIL_COLUMNS} FROM answer_details WHERE answer_id = ?");
    sqlx::query_as::<_, DetailRow>(&sql)
        .bind(answer_id)
        .fetch_optional(conn)
        .await
        .map_err(read_error)?
        .ok_or_else(|| StoreError::NotFound {
            entity: "answer detail",
            key: answer_id.to_owned(),
        })
}

pub(super) async fn insert_detail(conn: &mut SqliteConnection, row: DetailRow) -> Result<DetailRow> {
    let now = Utc::now();
    let id = assign_id(row.id);
    let key = format!("{id} (answer {})", row.answer_id);
    let sql = format!(
        "INSERT INTO answer_details ({DETAIL_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING {DETAIL_COLUMNS}"
    );
    sqlx::query_as::<_, DetailRow>(&sql)
        .bind(id)
        .bind(row.answer_id)
        .bind(row.port)
        .bind(row.priority)
        .bind(row.weight)
        .bind(row.protocol)
        .bind(row.created_at.unwrap_or(now))
        .bind(row.updated_at.unwrap_or(now))
        .fetch_one(conn)
        .await
        .map_err(write_error("answer detail", key))
}

pub(super) async fn delete_detail(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM answer_details WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await
        .map_err(read_error)?;
    deleted("answer detail", id, result.rows_affected())
}

// ── Record endpoints ──

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::{Span, debug};

use dnscontroller_core::{OpContext, Record, parse_answers};

use crate::AppState;
use crate::error::{ApiError, Context};

const INVALID_RECORD: &str = "invalid record format";
const INVALID_ANSWERS: &str = "invalid answers format";

#[derive(Debug, Serialize)]
pub struct Deleted {
    message: &'static str,
}

fn record_from_path((name, record_type): &(String, String)) -> Result<Record, ApiError> {
    Record::new(name, record_type).context(INVALID_RECORD)
}

/// `GET /api/v1/records/{name}/{type}`
pub async fn get_record(
    State(state): State<AppState>,
    Path(params): Path<(String, String)>,
) -> Result<Json<Record>, ApiError> {
    let ctx = OpContext::new(state.db.as_ref(), Span::current());
    let record = record_from_path(&params)?;

    let found = record.find(&ctx).await.context("failed to find record")?;
    Ok(Json(found))
}

/// `POST /api/v1/records/{name}/{type}`
pub async fn create_record(
    State(state): State<AppState>,
    Path(params): Path<(String, String)>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let ctx = OpContext::new(state.db.as_ref(), Span::current());
    let record = record_from_path(&params)?;

    let created = record.create(&ctx).await.context(INVALID_RECORD)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `DELETE /api/v1/records/{name}/{type}`
pub async fn delete_record(
    State(state): State<AppState>,
    Path(params): Path<(String, String)>,
) -> Result<Json<Deleted>, ApiError> {
    let ctx = OpContext::new(state.db.as_ref(), Span::current());
    let record = record_from_path(&params)?;

    record.delete(&ctx).await.context("failed to delete record")?;
    Ok(Json(Deleted {
        message: "resource deleted",
    }))
}

/// `POST /api/v1/records/{name}/{type}/answers`
///
/// Body is a JSON array of answers. Each one is attached to the record named
/// in the path, whatever `record_id` it carried, and the whole batch is
/// stored or none of it is. Responds with the record as reloaded afterwards.
pub async fn create_record_answers(
    State(state): State<AppState>,
    Path(params): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let ctx = OpContext::new(state.db.as_ref(), Span::current());
    let record = record_from_path(&params)?;

    let found = record.find(&ctx).await.context(INVALID_RECORD)?;
    let answers = parse_answers(&body).context(INVALID_ANSWERS)?;
    debug!(record = %found.path(), count = answers.len(), "parsed answers for record");

    let updated = found
        .create_answers(&ctx, answers)
        .await
        .context("failed to write answers to datastore")?;

    Ok((StatusCode::CREATED, Json(updated)))
}

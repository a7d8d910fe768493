//! HTTP API for dnscontroller.
//!
//! Exposes records and their answers under [`V1_URI`]:
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/v1/records/{name}/{type}` | record with nested answers |
//! | POST | `/api/v1/records/{name}/{type}` | create the record |
//! | DELETE | `/api/v1/records/{name}/{type}` | delete the record and its answers |
//! | POST | `/api/v1/records/{name}/{type}/answers` | add a batch of answers |
//!
//! plus `/healthz/liveness` and `/healthz/readiness`. Every request runs in
//! its own tracing span, and handlers hand that span to the entity layer.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use dnscontroller_core::Database;

pub use error::{ApiError, ErrorResponse};

// ── Routes ──────────────────────────────────────────────────────────

/// Path prefix for all v1 endpoints.
pub const V1_URI: &str = "/api/v1";
/// Collection of records.
pub const RECORDS_BASE_URI: &str = "/records";
/// A single record, addressed by name and type.
pub const RECORDS_NAME_TYPE_URI: &str = "/records/{name}/{type}";
/// The answers of a single record.
pub const RECORD_ANSWERS_URI: &str = "/records/{name}/{type}/answers";

pub const LIVENESS_URI: &str = "/healthz/liveness";
pub const READINESS_URI: &str = "/healthz/readiness";

/// Full path of a record endpoint. Name and type are inserted as given.
pub fn record_path(name: &str, record_type: &str) -> String {
    format!("{V1_URI}{RECORDS_BASE_URI}/{name}/{record_type}")
}

// ── State ───────────────────────────────────────────────────────────

/// Shared by every handler. The store is a pool and safe to use from
/// concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

/// Options for [`serve`].
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Socket address to bind, e.g. `0.0.0.0:14000`.
    pub listen: String,
    /// Log every request and response at INFO instead of DEBUG.
    pub debug_http: bool,
}

// ── Router ──────────────────────────────────────────────────────────

fn v1_routes() -> Router<AppState> {
    use handlers::records;

    Router::new()
        .route(
            RECORDS_NAME_TYPE_URI,
            get(records::get_record)
                .post(records::create_record)
                .delete(records::delete_record),
        )
        .route(RECORD_ANSWERS_URI, post(records::create_record_answers))
}

/// Build the complete router over `state`.
pub fn router(state: AppState, debug_http: bool) -> Router {
    let level = if debug_http { Level::INFO } else { Level::DEBUG };

    Router::new()
        .nest(V1_URI, v1_routes())
        .route(LIVENESS_URI, get(handlers::health::liveness))
        .route(READINESS_URI, get(handlers::health::readiness))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

                    tracing::info_span!(
                        "http-request",
                        method = %request.method(),
                        uri = %request.uri(),
                        matched_path,
                    )
                })
                .on_request(DefaultOnRequest::new().level(level))
                .on_response(DefaultOnResponse::new().level(level)),
        )
        .with_state(state)
}

/// Bind `options.listen` and serve until Ctrl-C.
pub async fn serve(state: AppState, options: &ServeOptions) -> std::io::Result<()> {
    let listener = TcpListener::bind(options.listen.as_str()).await?;
    info!(address = %listener.local_addr()?, "starting dnscontroller api server");

    axum::serve(listener, router(state, options.debug_http))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

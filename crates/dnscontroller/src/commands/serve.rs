//! `serve`: open the store and run the HTTP API until interrupted.

use std::sync::Arc;

use tracing::debug;

use dnscontroller_config::Config;
use dnscontroller_core::SqliteStore;
use dnscontroller_server::{AppState, ServeOptions};

use crate::error::CliError;

pub async fn handle(cfg: &Config) -> Result<(), CliError> {
    let store = SqliteStore::open(&cfg.db.uri, cfg.debug_sql())
        .await
        .map_err(|source| CliError::Database {
            uri: cfg.db.uri.clone(),
            source,
        })?;

    let options = ServeOptions {
        listen: cfg.listen.clone(),
        debug_http: cfg.debug_http(),
    };

    debug!(
        listen = %options.listen,
        debug_sql = cfg.debug_sql(),
        debug_http = options.debug_http,
        "resolved serve options"
    );

    dnscontroller_server::serve(AppState::new(Arc::new(store)), &options)
        .await
        .map_err(|source| CliError::Serve {
            listen: options.listen.clone(),
            source,
        })
}

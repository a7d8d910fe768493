// Client for the dnscontroller v1 HTTP API.
//
// Record names and types are placed into the URL as path segments, so any
// characters that need escaping are escaped by `url`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use dnscontroller_core::{Answer, Record};

use crate::error::Error;

const USER_AGENT: &str = concat!("dnscontroller/", env!("CARGO_PKG_VERSION"));

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Async client for one dnscontroller server.
#[derive(Debug, Clone)]
pub struct DnsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DnsClient {
    /// Build a client for `base_url` (e.g. `http://127.0.0.1:14000`) with the
    /// given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let path = base_url.path().trim_end_matches('/').to_owned();
        base_url.set_path(&path);
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn record_url(&self, name: &str, record_type: &str) -> Url {
        self.url(&["api", "v1", "records", name, record_type])
    }

    // ── Records ──────────────────────────────────────────────────────

    pub async fn get_record(&self, name: &str, record_type: &str) -> Result<Record, Error> {
        self.get(self.record_url(name, record_type)).await
    }

    pub async fn create_record(&self, name: &str, record_type: &str) -> Result<Record, Error> {
        self.post(self.record_url(name, record_type), None::<&()>).await
    }

    pub async fn delete_record(&self, name: &str, record_type: &str) -> Result<(), Error> {
        let url = self.record_url(name, record_type);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_response::<Value>(resp).await.map(|_| ())
    }

    // ── Answers ──────────────────────────────────────────────────────

    /// Add `answers` to the record and return it with its answers reloaded.
    /// The server stores all of them or none.
    pub async fn create_answers(
        &self,
        name: &str,
        record_type: &str,
        answers: &[Answer],
    ) -> Result<Record, Error> {
        let url = self.url(&["api", "v1", "records", name, record_type, "answers"]);
        self.post(url, Some(&answers)).await
    }

    // ── Health ───────────────────────────────────────────────────────

    /// `true` when the server reports that its store is reachable.
    pub async fn ready(&self) -> Result<bool, Error> {
        let url = self.url(&["healthz", "readiness"]);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Ok(resp.status().is_success())
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let mut req = self.http.post(url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorBody>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                error: err.error.unwrap_or_default(),
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: status.to_string(),
                error: raw,
            }
        }
    }
}

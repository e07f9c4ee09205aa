//! Table source contracts, HTTP fetch and CSV parsing for Noticeboard.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use noticeboard_core::Record;
use thiserror::Error;
use tracing::{info, info_span, Instrument};

pub const CRATE_NAME: &str = "noticeboard-source";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv header has no `title` column")]
    MissingTitleColumn,
    #[error("{0}")]
    Unavailable(String),
}

/// Parse CSV text with a header row into records. Rows may be shorter or
/// longer than the header; missing cells are absent, surplus cells dropped.
pub fn parse_table(bytes: &[u8]) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "title") {
        return Err(LoadError::MissingTitleColumn);
    }

    let mut out = Vec::new();
    for row in reader.records() {
        let row = row?;
        out.push(Record::from_fields(headers.iter().zip(row.iter())));
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: HttpClientConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(config.timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder.build().context("building reqwest client")?;
        Ok(Self { client })
    }

    /// Single GET; failures are returned to the caller, never retried.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let span = info_span!("http_fetch", url);
        async {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(LoadError::HttpStatus {
                    status: status.as_u16(),
                    url: resp.url().to_string(),
                });
            }
            let body = resp.bytes().await?.to_vec();
            info!(bytes = body.len(), %status, "fetched table");
            Ok(body)
        }
        .instrument(span)
        .await
    }
}

/// Capability that yields the full record set of one table.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn location(&self) -> String;

    async fn fetch_table(&self) -> Result<Vec<Record>, LoadError>;
}

#[derive(Debug, Clone)]
pub struct RemoteCsvSource {
    url: String,
    fetcher: HttpFetcher,
}

impl RemoteCsvSource {
    pub fn new(url: impl Into<String>, fetcher: HttpFetcher) -> Self {
        Self {
            url: url.into(),
            fetcher,
        }
    }
}

#[async_trait]
impl TableSource for RemoteCsvSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch_table(&self) -> Result<Vec<Record>, LoadError> {
        let body = self.fetcher.fetch_bytes(&self.url).await?;
        parse_table(&body)
    }
}

#[derive(Debug, Clone)]
pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TableSource for FileCsvSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_table(&self) -> Result<Vec<Record>, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_table(&bytes)
    }
}

/// In-memory source returning a fixed outcome on every fetch.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    outcome: Result<Vec<Record>, String>,
}

impl FixtureSource {
    pub fn records(records: Vec<Record>) -> Self {
        Self {
            outcome: Ok(records),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

#[async_trait]
impl TableSource for FixtureSource {
    fn location(&self) -> String {
        "fixture".to_string()
    }

    async fn fetch_table(&self) -> Result<Vec<Record>, LoadError> {
        self.outcome.clone().map_err(LoadError::Unavailable)
    }
}

/// Pick a source for `location`: `http(s)://` URLs are fetched remotely,
/// anything else (optionally prefixed `file://`) is read from disk.
pub fn source_for_location(
    location: &str,
    http: HttpClientConfig,
) -> anyhow::Result<Arc<dyn TableSource>> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        let fetcher = HttpFetcher::new(http)?;
        return Ok(Arc::new(RemoteCsvSource::new(location, fetcher)));
    }
    let path = location.strip_prefix("file://").unwrap_or(location);
    anyhow::ensure!(!path.is_empty(), "no csv location configured");
    Ok(Arc::new(FileCsvSource::new(path)))
}

//! Data sources that yield the transaction list the dashboard works on.
//!
//! The backend exposes a single read endpoint returning a JSON array of
//! transaction rows. The same payload can also be read from a file, which is
//! handy for demos and offline use.

use std::{future::Future, path::PathBuf};

use serde::Deserialize;

use crate::{
    Error,
    transaction::{RawNumber, RawTransaction, TransactionRecord},
};

/// The result of a successful fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSnapshot {
    /// Every transaction returned by the source.
    pub records: Vec<TransactionRecord>,
    /// The pre-aggregated total the backend attaches to the first row.
    pub total_transactions: Option<f64>,
}

impl TransactionSnapshot {
    /// Convert raw backend rows into records, reading the summary total from the first row.
    pub fn from_raw(rows: Vec<RawTransaction>) -> Self {
        let total_transactions = rows
            .first()
            .and_then(|row| row.total_transactions.as_ref())
            .and_then(RawNumber::value);

        Self {
            records: rows.into_iter().map(TransactionRecord::from).collect(),
            total_transactions,
        }
    }
}

/// Parse the body of the backend read endpoint.
///
/// Rows that are not JSON objects are skipped with a warning, the rest are
/// kept even if some of their fields are unreadable.
///
/// # Errors
/// Returns [Error::MalformedData] if `text` is not a JSON array.
pub fn parse_snapshot(text: &str) -> Result<TransactionSnapshot, Error> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(text).map_err(|error| Error::MalformedData(error.to_string()))?;

    let rows = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            RawTransaction::deserialize(value)
                .inspect_err(|error| {
                    tracing::warn!("skipping transaction row {index}: {error}");
                })
                .ok()
        })
        .collect();

    Ok(TransactionSnapshot::from_raw(rows))
}

/// Something that can produce the full transaction list.
pub trait DataSource {
    /// Fetch every transaction.
    ///
    /// # Errors
    /// Returns [Error::DataFetch] if the source cannot be reached and
    /// [Error::MalformedData] if it returns something other than a list of transactions.
    fn fetch(&self) -> impl Future<Output = Result<TransactionSnapshot, Error>> + Send;
}

/// Reads transactions from the backend's HTTP read endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Create a source that reads from `url`, e.g. "http://localhost:5000/transactions".
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_owned(),
        }
    }
}

impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<TransactionSnapshot, Error> {
        tracing::debug!("fetching transactions from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| Error::DataFetch(error.to_string()))?;

        let text = response
            .text()
            .await
            .map_err(|error| Error::DataFetch(error.to_string()))?;

        parse_snapshot(&text)
    }
}

/// Reads transactions from a JSON file in the same format as the backend endpoint.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source that reads from the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for JsonFileSource {
    async fn fetch(&self) -> Result<TransactionSnapshot, Error> {
        tracing::debug!("reading transactions from {}", self.path.display());

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| Error::DataFetch(format!("{}: {error}", self.path.display())))?;

        parse_snapshot(&text)
    }
}

/// A data source chosen at runtime from a URL or a file path.
#[derive(Debug, Clone)]
pub enum Source {
    /// An http(s) URL.
    Http(HttpSource),
    /// Anything else is treated as a file path.
    File(JsonFileSource),
}

impl Source {
    /// Pick [HttpSource] for http(s) URLs and [JsonFileSource] otherwise.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Http(HttpSource::new(location))
        } else {
            Source::File(JsonFileSource::new(location))
        }
    }
}

impl DataSource for Source {
    async fn fetch(&self) -> Result<TransactionSnapshot, Error> {
        match self {
            Source::Http(source) => source.fetch().await,
            Source::File(source) => source.fetch().await,
        }
    }
}

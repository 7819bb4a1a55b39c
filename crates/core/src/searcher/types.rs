//! Types for the torrent search system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Bytes per GiB, used for display.
const BYTES_PER_GIB: f64 = 1_073_741_824.0;

/// One request against the index: a search term, an uploader, or both.
///
/// `None` is the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    pub username: Option<String>,
    pub term: Option<String>,
}

impl Query {
    pub fn new(username: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            term: Some(term.into()),
        }
    }

    /// Query every upload of `username`.
    pub fn by_user(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            term: None,
        }
    }

    /// Query `term` regardless of uploader.
    pub fn by_term(term: impl Into<String>) -> Self {
        Self {
            username: None,
            term: Some(term.into()),
        }
    }

    /// The `q` parameter sent to the index.
    pub fn api_query(&self) -> String {
        match (&self.term, &self.username) {
            (Some(term), _) => term.clone(),
            (None, Some(user)) => format!("user:{user}"),
            (None, None) => String::new(),
        }
    }

    /// Whether a result uploaded by `uploader` belongs to this query.
    pub fn matches_uploader(&self, uploader: &str) -> bool {
        match &self.username {
            Some(user) => user.eq_ignore_ascii_case(uploader),
            None => true,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user={} term={}",
            self.username.as_deref().unwrap_or("*"),
            self.term.as_deref().unwrap_or("*")
        )
    }
}

/// A single torrent listing returned by the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentRecord {
    /// Index-side identifier.
    pub id: String,
    pub name: String,
    /// Info hash (lowercase hex) - used for deduplication.
    /// Empty string if unknown.
    pub info_hash: String,
    pub size_bytes: u64,
    /// Unix timestamp (seconds) of the upload.
    pub upload_timestamp: i64,
    pub seeders: u32,
    pub leechers: u32,
    /// Uploader account name.
    pub username: String,
    /// Uploader status as reported by the index (e.g. "vip", "trusted").
    pub status: String,
    /// Page on the proxy describing this torrent.
    pub detail_url: String,
}

impl TorrentRecord {
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.upload_timestamp, 0)
    }

    pub fn size_gib(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_GIB
    }
}

/// Detail page of torrent `id` on the proxy at `proxy_base_url`.
pub fn detail_url(proxy_base_url: &str, id: &str) -> String {
    format!(
        "{}/description.php?id={}",
        proxy_base_url.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

/// A query that failed while the rest of the search carried on.
#[derive(Debug, Clone)]
pub struct QueryFailure {
    pub query: Query,
    pub error: String,
}

/// Merged result of running every query of a search.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Records from all successful queries, duplicate info_hash suppressed.
    pub records: Vec<TorrentRecord>,
    /// Queries that failed.
    pub failures: Vec<QueryFailure>,
    /// How long the search took in milliseconds.
    pub duration_ms: u64,
}

/// Errors that can occur during search operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Torrent index connection failed: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to parse torrent index response: {0}")]
    Parse(String),

    #[error("Invalid search: {0}")]
    Validation(String),

    #[error("All {} queries failed", .0.len())]
    AllQueriesFailed(Vec<QueryFailure>),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for torrent index backends.
#[async_trait]
pub trait IndexSearcher: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Run one query. Detail URLs of the returned records point at
    /// `proxy_base_url`.
    async fn fetch(
        &self,
        proxy_base_url: &str,
        query: &Query,
    ) -> Result<Vec<TorrentRecord>, SearchError>;

    /// Links mentioned in the description of torrent `id`.
    async fn description_links(&self, id: &str) -> Result<Vec<String>, SearchError>;
}

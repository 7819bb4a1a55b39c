//! Mock index searcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::searcher::{detail_url, IndexSearcher, Query, SearchError, TorrentRecord};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// The query that was fetched.
    pub query: Query,
    /// Proxy the detail URLs were built against.
    pub proxy_base_url: String,
    /// When the fetch was made.
    pub timestamp: Instant,
}

/// Mock implementation of the IndexSearcher trait.
///
/// Provides controllable behavior for testing:
/// - Return configured records per query
/// - Fail individual queries
/// - Track fetches for assertions
///
/// # Example
///
/// ```rust,ignore
/// use piratesearch_core::testing::{MockSearcher, fixtures};
///
/// let searcher = MockSearcher::new();
/// searcher
///     .set_results_for(&Query::new("Alice", "linux"), vec![fixtures::record("a", "h1")])
///     .await;
///
/// let records = searcher.fetch("https://tpb.example", &Query::new("Alice", "linux")).await?;
/// assert_eq!(records.len(), 1);
/// assert_eq!(searcher.search_count().await, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockSearcher {
    /// Records returned for specific queries.
    results: Arc<RwLock<HashMap<Query, Vec<TorrentRecord>>>>,
    /// Records returned for every other query, filtered by uploader.
    fallback: Arc<RwLock<Vec<TorrentRecord>>>,
    /// Queries that fail.
    failures: Arc<RwLock<HashMap<Query, SearchError>>>,
    /// Description links by torrent id.
    links: Arc<RwLock<HashMap<String, Vec<String>>>>,
    /// Recorded fetches.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `records` whenever `query` is fetched.
    pub async fn set_results_for(&self, query: &Query, records: Vec<TorrentRecord>) {
        self.results.write().await.insert(query.clone(), records);
    }

    /// Records served to queries without explicit results. A query with a
    /// username only sees records uploaded by that user.
    pub async fn set_fallback_results(&self, records: Vec<TorrentRecord>) {
        *self.fallback.write().await = records;
    }

    /// Make every fetch of `query` fail with `error`.
    pub async fn fail_query(&self, query: &Query, error: SearchError) {
        self.failures.write().await.insert(query.clone(), error);
    }

    pub async fn set_description_links(&self, id: &str, links: Vec<String>) {
        self.links.write().await.insert(id.to_string(), links);
    }

    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }
}

#[async_trait]
impl IndexSearcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(
        &self,
        proxy_base_url: &str,
        query: &Query,
    ) -> Result<Vec<TorrentRecord>, SearchError> {
        self.searches.write().await.push(RecordedSearch {
            query: query.clone(),
            proxy_base_url: proxy_base_url.to_string(),
            timestamp: Instant::now(),
        });

        if let Some(error) = self.failures.read().await.get(query) {
            return Err(error.clone());
        }

        let records = match self.results.read().await.get(query) {
            Some(records) => records.clone(),
            None => self
                .fallback
                .read()
                .await
                .iter()
                .filter(|r| query.matches_uploader(&r.username))
                .cloned()
                .collect(),
        };

        Ok(records
            .into_iter()
            .map(|mut record| {
                record.detail_url = detail_url(proxy_base_url, &record.id);
                record
            })
            .collect())
    }

    async fn description_links(&self, id: &str) -> Result<Vec<String>, SearchError> {
        Ok(self.links.read().await.get(id).cloned().unwrap_or_default())
    }
}

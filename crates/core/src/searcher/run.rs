//! Running every query of a search and merging the results.

use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, warn};

use super::dedup::merge_results;
use super::{IndexSearcher, Query, QueryFailure, SearchError, SearchOutcome};

/// Run `queries` concurrently (at most `concurrency` in flight) and merge the
/// results in query order.
///
/// A failing query is recorded in [`SearchOutcome::failures`] and the rest of
/// the search carries on. The search only fails when every query failed.
pub async fn run_search(
    searcher: &dyn IndexSearcher,
    proxy_base_url: &str,
    queries: &[Query],
    concurrency: usize,
) -> Result<SearchOutcome, SearchError> {
    let start = Instant::now();

    debug!(
        backend = searcher.name(),
        queries = queries.len(),
        concurrency,
        "Starting search"
    );

    let results: Vec<_> = stream::iter(queries)
        .map(|query| async move { (query, searcher.fetch(proxy_base_url, query).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut batches = Vec::new();
    let mut failures = Vec::new();
    for (query, result) in results {
        match result {
            Ok(records) => batches.push(records),
            Err(e) => {
                warn!(query = %query, error = %e, "Query failed");
                failures.push(QueryFailure {
                    query: query.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if batches.is_empty() && !failures.is_empty() {
        return Err(SearchError::AllQueriesFailed(failures));
    }

    let records = merge_results(batches);
    let duration_ms = start.elapsed().as_millis() as u64;

    debug!(
        results = records.len(),
        failed = failures.len(),
        duration_ms,
        "Search complete"
    );

    Ok(SearchOutcome {
        records,
        failures,
        duration_ms,
    })
}

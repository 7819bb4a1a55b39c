//! Dead-link filtering of search results.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::searcher::TorrentRecord;

use super::LinkProber;

/// Records split by whether their detail page answered.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Reachable records, in input order.
    pub kept: Vec<TorrentRecord>,
    /// Records whose detail page timed out, errored or returned non-2xx.
    pub dropped: Vec<TorrentRecord>,
}

/// Probe every record's detail page (at most `concurrency` at once) and drop
/// the unreachable ones. A failed probe only removes its own record.
pub async fn filter_dead_links(
    prober: &dyn LinkProber,
    records: Vec<TorrentRecord>,
    concurrency: usize,
) -> FilterOutcome {
    let total = records.len();
    let probed: Vec<(TorrentRecord, bool)> = stream::iter(records)
        .map(|record| async move {
            let alive = prober.probe(&record.detail_url).await;
            (record, alive)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut outcome = FilterOutcome::default();
    for (record, alive) in probed {
        if alive {
            outcome.kept.push(record);
        } else {
            warn!(name = %record.name, url = %record.detail_url, "Dropping dead link");
            outcome.dropped.push(record);
        }
    }

    debug!(
        total,
        kept = outcome.kept.len(),
        dropped = outcome.dropped.len(),
        "Dead-link filter complete"
    );
    outcome
}

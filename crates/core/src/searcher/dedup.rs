//! Deduplication of torrent search results by info_hash.

use std::collections::HashSet;

use super::TorrentRecord;

/// Merge per-query result batches into one result set.
///
/// Batches are concatenated in order and the first record seen for each
/// info_hash (compared case-insensitively) wins. Records without an
/// info_hash can't be deduplicated and are all kept.
pub fn merge_results<I>(batches: I) -> Vec<TorrentRecord>
where
    I: IntoIterator<Item = Vec<TorrentRecord>>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for record in batches.into_iter().flatten() {
        if record.info_hash.is_empty() || seen.insert(record.info_hash.to_lowercase()) {
            merged.push(record);
        }
    }

    merged
}

//! Torrent search abstraction.
//!
//! This module provides an `IndexSearcher` trait for querying a torrent index
//! (apibay and compatible proxies), the expansion of a saved search into
//! queries, and the concurrent fan-out that merges their results.

mod apibay;
mod dedup;
mod query;
mod run;
mod types;

pub use apibay::{extract_links, parse_search_response, ApibaySearcher};
pub use dedup::merge_results;
pub use query::build_queries;
pub use run::run_search;
pub use types::*;

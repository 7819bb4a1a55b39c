//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the index, the link prober
//! and the console, so sessions can be driven end to end without network
//! access or a terminal.
//!
//! # Example
//!
//! ```rust,ignore
//! use piratesearch_core::testing::{fixtures, MockProber, MockSearcher, ScriptedConsole};
//!
//! let searcher = MockSearcher::new();
//! searcher.set_fallback_results(vec![fixtures::record("a", "h1")]).await;
//!
//! let prober = MockProber::reachable();
//! let console = ScriptedConsole::new(["tpb.example", "alice", "linux", "n", "n", "n"]);
//! ```

mod mock_prober;
mod mock_searcher;
mod scripted_console;

pub use mock_prober::MockProber;
pub use mock_searcher::{MockSearcher, RecordedSearch};
pub use scripted_console::{ConsoleEvent, ScriptedConsole};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::dataset::SearchConfig;
    use crate::searcher::{detail_url, TorrentRecord};

    /// Proxy used by fixture records and configs.
    pub const PROXY_URL: &str = "https://tpb.example";

    /// Create a test record with reasonable defaults. The id is `name`.
    pub fn record(name: &str, info_hash: &str) -> TorrentRecord {
        TorrentRecord {
            id: name.to_string(),
            name: name.to_string(),
            info_hash: info_hash.to_string(),
            size_bytes: 1024 * 1024 * 1024, // 1 GiB
            upload_timestamp: 1_700_000_000,
            seeders: 10,
            leechers: 2,
            username: "Alice".to_string(),
            status: "trusted".to_string(),
            detail_url: detail_url(PROXY_URL, name),
        }
    }

    /// Create a test record uploaded by `username`.
    pub fn uploaded_by(name: &str, info_hash: &str, username: &str) -> TorrentRecord {
        let mut record = record(name, info_hash);
        record.username = username.to_string();
        record
    }

    /// Create a search configuration pointing at [`PROXY_URL`].
    pub fn search_config(usernames: &[&str], search_terms: &[&str]) -> SearchConfig {
        SearchConfig::new(
            PROXY_URL,
            usernames.iter().copied(),
            search_terms.iter().copied(),
        )
    }
}

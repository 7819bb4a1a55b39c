//! Reachability checks for proxy sites and torrent detail pages.

mod filter;
mod http;
mod url;

pub use filter::{filter_dead_links, FilterOutcome};
pub use http::HttpProber;
pub use url::normalize_proxy_url;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while preparing a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid URL: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for liveness probes.
#[async_trait]
pub trait LinkProber: Send + Sync {
    /// True if `url` answered with a 2xx status within the probe timeout.
    async fn probe(&self, url: &str) -> bool;
}

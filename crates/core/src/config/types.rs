use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub datasets: DatasetsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Torrent index API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL serving `q.php` and `t.php` (e.g., "https://apibay.org")
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://apibay.org".to_string()
}

fn default_timeout() -> u32 {
    10
}

/// Search fan-out configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Queries in flight at once
    #[serde(default = "default_fetch_concurrency")]
    pub concurrency: usize,
    /// Entries kept per API response
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_fetch_concurrency(),
            max_results: default_max_results(),
        }
    }
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_max_results() -> usize {
    100
}

/// Liveness probing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Detail pages probed at once by the dead-link filter
    #[serde(default = "default_probe_concurrency")]
    pub concurrency: usize,
    /// How many replacement proxy URLs the user may try before giving up
    #[serde(default = "default_max_url_attempts")]
    pub max_url_attempts: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            concurrency: default_probe_concurrency(),
            max_url_attempts: default_max_url_attempts(),
        }
    }
}

fn default_probe_concurrency() -> usize {
    16
}

fn default_max_url_attempts() -> u32 {
    3
}

/// Saved dataset location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetsConfig {
    #[serde(default = "default_datasets_dir")]
    pub dir: PathBuf,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            dir: default_datasets_dir(),
        }
    }
}

fn default_datasets_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Result display configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Number of leading results whose description links are fetched (0 disables)
    #[serde(default = "default_link_limit")]
    pub link_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            link_limit: default_link_limit(),
        }
    }
}

fn default_link_limit() -> usize {
    100
}

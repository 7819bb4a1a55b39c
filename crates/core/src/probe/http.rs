//! reqwest-backed prober.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::ProbeConfig;

use super::{LinkProber, ProbeError};

/// Probes URLs with a single GET bounded by the configured timeout.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| ProbeError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                debug!(url, status = %response.status(), ok, "Probe answered");
                ok
            }
            Err(e) => {
                debug!(url, error = %e, timeout = e.is_timeout(), "Probe failed");
                false
            }
        }
    }
}

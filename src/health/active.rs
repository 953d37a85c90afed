//! Active health checking.
//!
//! # Responsibilities
//! - Probe a node's status endpoint within a bounded timeout
//! - Decide success from the `ok` flag of the status payload

use std::time::Duration;
use serde::Deserialize;
use tokio::time;
use url::Url;
use crate::cluster::types::{ClusterError, ClusterResult};

/// Status path probed when none is configured.
pub const DEFAULT_PROBE_PATH: &str = "/_cluster/nodes/_local";

/// Minimal shape of a status payload. Anything without a boolean `ok` fails.
#[derive(Debug, Deserialize)]
struct ProbeStatus {
    ok: bool,
}

/// Issues probe requests on a client reserved for probing.
///
/// The probe client carries its own timeout so that a hung node can never
/// hold up a probe cycle longer than `timeout`. Request traffic uses a
/// different client without one.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    path: String,
    timeout: Duration,
}

impl Prober {
    /// Create a prober for the default status path.
    pub fn new(timeout: Duration) -> ClusterResult<Self> {
        Self::with_path(timeout, DEFAULT_PROBE_PATH)
    }

    /// Create a prober for a custom status path.
    pub fn with_path(timeout: Duration, path: impl Into<String>) -> ClusterResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent("search-cluster-probe")
            .build()
            .map_err(ClusterError::Client)?;

        Ok(Self {
            client,
            path: path.into(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Probe `endpoint`, returning true only for an `{"ok": true}` answer
    /// received within the timeout.
    pub async fn check(&self, endpoint: &Url) -> bool {
        let mut url = endpoint.clone();
        url.set_path(&self.path);

        let fetch = async {
            let response = self.client.get(url.clone()).send().await?;
            response.bytes().await
        };

        let body = match time::timeout(self.timeout, fetch).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "Probe failed: transport error");
                return false;
            }
            Err(_) => {
                tracing::warn!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "Probe failed: timeout");
                return false;
            }
        };

        match serde_json::from_slice::<ProbeStatus>(&body) {
            Ok(status) if status.ok => true,
            Ok(_) => {
                tracing::warn!(url = %url, "Probe failed: ok=false");
                false
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Probe failed: malformed status");
                false
            }
        }
    }
}

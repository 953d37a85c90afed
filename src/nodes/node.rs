//! Node abstraction.
//!
//! # Responsibilities
//! - Represent a single search endpoint
//! - Own the node's health behind a read/write lock
//! - Probe the node and fold the outcome into its health
//! - Execute request descriptors and decode the JSON reply

use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::Url;
use crate::cluster::types::{ClusterError, ClusterResult};
use crate::health::{Health, Prober};
use crate::observability::metrics;
use crate::request::Fireable;

/// A single search host.
#[derive(Debug)]
pub struct Node {
    endpoint: Url,
    health: RwLock<Health>,
    /// Long-lived request client. No timeout: callers own deadline policy.
    client: reqwest::Client,
    prober: Prober,
}

impl Node {
    /// Create a node with its own transports. The endpoint must be of the form
    /// `scheme://host:port`, e.g. `http://es001:9200`.
    pub fn new(endpoint: &str, probe_timeout: Duration) -> ClusterResult<Self> {
        let endpoint = Self::parse_endpoint(endpoint)?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(ClusterError::Client)?;
        Ok(Self::with_transport(endpoint, client, Prober::new(probe_timeout)?))
    }

    /// Create a node sharing already-built transports with other nodes.
    pub fn with_transport(endpoint: Url, client: reqwest::Client, prober: Prober) -> Self {
        Self {
            endpoint,
            health: RwLock::new(Health::default()),
            client,
            prober,
        }
    }

    /// Parse and check a `scheme://host:port` endpoint.
    pub fn parse_endpoint(endpoint: &str) -> ClusterResult<Url> {
        let invalid = |reason: String| ClusterError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(invalid("missing host".to_string())),
        }
        Ok(url)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Current health. Never blocks on network I/O.
    pub fn health(&self) -> Health {
        *self.health.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Probe the node's status endpoint. Does not touch health.
    pub async fn probe(&self) -> bool {
        self.prober.check(&self.endpoint).await
    }

    /// Probe, then improve or degrade health under the write lock.
    ///
    /// Returns the health after the update.
    pub async fn probe_and_update(&self) -> Health {
        let success = self.probe().await;

        let (previous, current) = {
            let mut health = self.health.write().unwrap_or_else(PoisonError::into_inner);
            let previous = *health;
            *health = if success { previous.improve() } else { previous.degrade() };
            (previous, *health)
        };

        if previous != current {
            tracing::info!(
                endpoint = %self.endpoint,
                from = %previous,
                to = %current,
                "Node health changed"
            );
        }
        metrics::record_node_health(self.endpoint.as_str(), current);
        current
    }

    /// Send `request` to this node and decode the reply body into `T`.
    ///
    /// No timeout is applied here. If the search service times out it says so
    /// in its reply; if it hangs, the caller's own deadline applies.
    pub async fn execute<R, T>(&self, request: &R) -> ClusterResult<T>
    where
        R: Fireable + ?Sized,
        T: DeserializeOwned,
    {
        let mut url = self.endpoint.clone();
        url.set_path(&request.path());
        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let body = request.body().map_err(ClusterError::Encode)?;

        let mut builder = self.client.request(request.method(), url);
        if !body.is_empty() {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| self.transport_error(source))?;

        let buf = response
            .bytes()
            .await
            .map_err(|source| self.transport_error(source))?;

        serde_json::from_slice(&buf).map_err(|source| ClusterError::Decode {
            endpoint: self.endpoint.to_string(),
            source,
        })
    }

    fn transport_error(&self, source: reqwest::Error) -> ClusterError {
        ClusterError::Transport {
            endpoint: self.endpoint.to_string(),
            source,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_health(&self, health: Health) {
        *self.health.write().unwrap_or_else(PoisonError::into_inner) = health;
    }
}

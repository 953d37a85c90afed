//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::health::active::DEFAULT_PROBE_PATH;

/// Root configuration for a cluster handle.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClusterConfig {
    /// Node endpoints, each `scheme://host:port`.
    pub endpoints: Vec<String>,

    /// Health probe settings.
    pub probe: ProbeConfig,

    /// Request dispatch settings.
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Time between probe cycles in milliseconds.
    pub interval_ms: u64,

    /// Time each probe may take in milliseconds.
    pub timeout_ms: u64,

    /// Status path probed on every node.
    pub path: String,
}

impl ProbeConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            timeout_ms: 3_000,
            path: DEFAULT_PROBE_PATH.to_string(),
        }
    }
}

/// Dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Requests that may queue per intake before callers wait (backpressure).
    pub intake_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            intake_capacity: 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

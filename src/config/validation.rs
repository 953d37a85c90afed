//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every endpoint parses as `scheme://host:port`
//! - Validate value ranges (interval and timeout > 0, timeout < interval)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClusterConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use crate::config::schema::ClusterConfig;
use crate::nodes::Node;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("endpoint '{endpoint}' is invalid: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("probe.interval_ms must be greater than 0")]
    ZeroProbeInterval,

    #[error("probe.timeout_ms must be greater than 0")]
    ZeroProbeTimeout,

    #[error("probe.timeout_ms ({timeout_ms}) must be shorter than probe.interval_ms ({interval_ms})")]
    ProbeTimeoutTooLong { timeout_ms: u64, interval_ms: u64 },

    #[error("probe.path '{0}' must start with '/'")]
    InvalidProbePath(String),

    #[error("dispatch.intake_capacity must be greater than 0")]
    ZeroIntakeCapacity,
}

pub fn validate_config(config: &ClusterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoints.is_empty() {
        errors.push(ValidationError::NoEndpoints);
    }
    for endpoint in &config.endpoints {
        if let Err(e) = Node::parse_endpoint(endpoint) {
            errors.push(ValidationError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            });
        }
    }

    let probe = &config.probe;
    if probe.interval_ms == 0 {
        errors.push(ValidationError::ZeroProbeInterval);
    }
    if probe.timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if probe.interval_ms > 0 && probe.timeout_ms >= probe.interval_ms {
        errors.push(ValidationError::ProbeTimeoutTooLong {
            timeout_ms: probe.timeout_ms,
            interval_ms: probe.interval_ms,
        });
    }
    if !probe.path.starts_with('/') {
        errors.push(ValidationError::InvalidProbePath(probe.path.clone()));
    }

    if config.dispatch.intake_capacity == 0 {
        errors.push(ValidationError::ZeroIntakeCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Error definitions shared by nodes and the dispatcher.

use thiserror::Error;

/// Errors returned to the caller whose request triggered them.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// No Green or Yellow node existed when the request was dispatched.
    #[error("no healthy nodes available")]
    NoHealthyNode,

    /// The chosen node could not be reached, or the connection broke mid-response.
    #[error("transport error talking to {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not valid JSON for the expected shape.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request descriptor could not produce its body.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// An endpoint was not of the form `scheme://host:port`.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The HTTP transport could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The cluster's control loop has stopped.
    #[error("cluster has been shut down")]
    Shutdown,
}

/// Result type for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Nodes, probes and the control loop produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (node health gauges, request and probe counters)
//! ```

pub mod logging;
pub mod metrics;

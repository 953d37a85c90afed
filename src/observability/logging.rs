//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for applications embedding the cluster
//! - Take the log level from config, let `RUST_LOG` override it
//!
//! # Design Decisions
//! - The library itself only emits `tracing` events; installing a
//!   subscriber is opt-in

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::config::ObservabilityConfig;

/// Install a fmt subscriber. Returns false if one was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("search_cluster={}", config.log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

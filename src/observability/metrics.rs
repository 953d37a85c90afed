//! Metrics collection.
//!
//! # Metrics
//! - `search_cluster_node_health` (gauge): per node, 2=Green, 1=Yellow, 0=Red
//! - `search_cluster_requests_total` (counter): by request kind and outcome
//! - `search_cluster_probe_cycles_total` (counter): probe cycles started
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the embedding application
//!   installs whichever exporter it uses, without one these are no-ops

use crate::health::Health;

pub fn record_node_health(endpoint: &str, health: Health) {
    metrics::gauge!("search_cluster_node_health", "node" => endpoint.to_string()).set(health.gauge_value());
}

pub fn record_request(kind: &'static str, outcome: &'static str) {
    metrics::counter!("search_cluster_requests_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_probe_cycle() {
    metrics::counter!("search_cluster_probe_cycles_total").increment(1);
}

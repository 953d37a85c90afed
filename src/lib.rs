//! Client-side access layer for a clustered HTTP search service.
//!
//! A [`Cluster`] hides a fixed set of search nodes behind one handle. It
//! probes every node on an interval, rates each one Green, Yellow or Red, and
//! sends every request to a randomly chosen node of the best available tier.
//!
//! ```text
//!   caller ──search()──▶ intake ──▶ ┌──────────────────────┐
//!                                   │     control loop     │◀── probe ticker
//!   caller ◀──reply──── worker ◀─── │ select_best (no I/O) │◀── shutdown
//!              │                    └──────────────────────┘
//!              ▼                              │ spawn
//!         Node::execute ◀─────────────────────┘
//! ```

// Core
pub mod cluster;
pub mod health;
pub mod nodes;

// Requests
pub mod query;
pub mod request;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use cluster::{Cluster, ClusterError, ClusterResult};
pub use config::ClusterConfig;
pub use health::Health;
pub use nodes::{Node, NodeSet};
pub use request::{
    BulkRequest, BulkResponse, CreateRequest, DeleteRequest, Fireable, IndexParams, IndexRequest,
    IndexResponse, MultiSearchRequest, MultiSearchResponse, SearchRequest, SearchResponse, UpdateRequest,
};

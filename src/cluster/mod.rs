//! Cluster dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Cluster::search / multi_search
//!     → bundle.rs (request + private reply channel)
//!     → dispatcher.rs control loop (one event at a time)
//!         → NodeSet::select_best
//!         → spawned worker: Node::execute → Bundle::reply
//!     → caller awaits its reply channel
//!
//! Probe ticker (same loop)
//!     → spawned NodeSet::probe_all
//! ```
//!
//! # Design Decisions
//! - The loop never performs network I/O, so it always services the next event promptly
//! - No retries: a failed request reports straight back to its caller
//! - Shutdown is a handshake; `shutdown()` returns only after the loop exits

pub(crate) mod bundle;
pub mod dispatcher;
pub mod types;

pub use dispatcher::Cluster;
pub use types::{ClusterError, ClusterResult};

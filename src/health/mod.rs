//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe ticker (cluster control loop)
//!     → NodeSet::probe_all
//!     → active.rs (GET probe path, bounded by probe timeout)
//!     → state.rs (improve on success, degrade on failure)
//! ```
//!
//! # Design Decisions
//! - Probe failures are never surfaced to callers, only folded into health
//! - Health is per-node and only mutated by probe outcomes

pub mod active;
pub mod state;

pub use active::Prober;
pub use state::Health;

//! Node management subsystem.
//!
//! # Data Flow
//! ```text
//! Request bundle received by the control loop
//!     → set.rs (select_best over cached health)
//!         - Green bucket, uniform random pick
//!         - else Yellow bucket, uniform random pick
//!         - else NoHealthyNode
//!     → node.rs (execute on the chosen node, decode JSON reply)
//! ```
//!
//! # Design Decisions
//! - Membership is fixed once the cluster is built
//! - Selection never touches the network, only read locks
//! - Red nodes stay in the set but are never selected

pub mod node;
pub mod set;

pub use node::Node;
pub use set::NodeSet;

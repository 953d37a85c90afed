//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClusterConfig (validated, immutable)
//!     → Cluster::from_config
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ClusterConfig;
pub use schema::DispatchConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProbeConfig;
pub use validation::{validate_config, ValidationError};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routes file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every route compiled once)
//!     → RouterConfig (validated, immutable)
//!     → loader::build_routes → Vec<ApiRoute>
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Method names are kept as strings so unknown verbs are reported by
//!   validation with the route they belong to

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{build_routes, load_config, ConfigError};
pub use schema::{MethodsConfig, ObservabilityConfig, ParameterConfig, RouteConfig, RouterConfig};

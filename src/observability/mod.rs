//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing (match / build)
//!     → tracing events (debug: outcomes, trace: no-match reasons)
//!     → metrics.rs (outcome counters via the `metrics` facade)
//!
//! Binary startup:
//!     → logging.rs installs the tracing subscriber
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing subscribers and recorders is the
//!   host's choice
//! - Counters are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route construction (once):
//!     path template + placeholder table
//!     → pattern.rs (parse, emit anchored regex + capture order)
//!     → ApiRoute (immutable, shareable)
//!
//! Incoming request:
//!     → matcher.rs (regex match, format.rs, method.rs)
//!     → ActionInvocation or no match
//!
//! Reverse lookup:
//!     handler + action + parameters
//!     → builder.rs (fill template, drop unresolved optional groups)
//!     → URL or no match
//! ```
//!
//! # Design Decisions
//! - One route at a time; iterating candidate routes is the caller's job
//! - Templates compile once, at construction
//! - No-match is `None`; only configuration errors are `Err`

pub mod builder;
pub mod format;
pub mod invocation;
pub mod matcher;
pub mod method;
pub mod pattern;
pub mod placeholder;
pub mod request;
pub mod route;

pub use format::{Format, FormatTable};
pub use invocation::{ActionInvocation, Parameters};
pub use method::{ActionTable, Method};
pub use pattern::CompiledPattern;
pub use placeholder::{Placeholder, PlaceholderTable};
pub use request::{IncomingRequest, RequestParts};
pub use route::{ApiRoute, ApiRouteBuilder, MatchObserver};

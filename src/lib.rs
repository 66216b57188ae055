//! Bidirectional API route patterns.
//!
//! A route is a path template such as `/users/<id>[/<format>]` plus a
//! verb → action table. It matches requests into [`ActionInvocation`]s and
//! builds URLs back from an action and its parameters.

pub mod config;
pub mod error;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use error::{RouteError, RouteResult};
pub use routing::{ActionInvocation, ApiRoute, IncomingRequest, Method, Parameters, RequestParts};

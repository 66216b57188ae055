//! Route configuration errors.
//!
//! Only structural problems found while building a route end up here.
//! A request that does not fit a route is not an error: matching and URL
//! construction report that as `None`.

use thiserror::Error;

/// Errors raised while constructing or compiling a route definition.
#[derive(Debug, Error)]
pub enum RouteError {
    /// An optional group was opened with `[` but never closed.
    #[error("unclosed optional group opened at byte {position} in '{template}'")]
    UnclosedGroup { template: String, position: usize },

    /// A `]` appeared without a matching `[`.
    #[error("unexpected ']' at byte {position} in '{template}'")]
    UnexpectedGroupClose { template: String, position: usize },

    /// The same placeholder name appears twice in one template.
    #[error("placeholder <{name}> appears more than once in '{template}'")]
    DuplicatePlaceholder { template: String, name: String },

    /// A placeholder requirement is not a valid regular expression.
    #[error("invalid requirement for placeholder <{name}>: {source}")]
    InvalidRequirement {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The assembled match expression was rejected by the regex engine.
    #[error("template '{template}' compiles to an invalid expression: {source}")]
    Pattern {
        template: String,
        #[source]
        source: regex::Error,
    },

    /// A requirement opened a capturing group that could not be rewritten.
    #[error("template '{template}' has {groups} capture groups but {entries} capture entries")]
    CaptureMismatch {
        template: String,
        groups: usize,
        entries: usize,
    },

    /// Method name outside POST, GET, PUT, DELETE, OPTIONS, PATCH.
    #[error("unknown HTTP method '{0}'")]
    UnknownMethod(String),

    /// A pinned format that the route's format table does not define.
    #[error("unknown format '{0}'")]
    UnknownFormat(String),
}

/// Result type for route construction.
pub type RouteResult<T> = Result<T, RouteError>;

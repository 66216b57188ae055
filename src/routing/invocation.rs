//! Result of a successful match.

use std::collections::BTreeMap;

use serde::Serialize;

/// Key under which the resolved action is stored in the parameters.
pub const ACTION_KEY: &str = "action";

/// Route parameters. `None` values are carried but never rendered into URLs.
pub type Parameters = BTreeMap<String, Option<String>>;

/// A matched request, ready for dispatch by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionInvocation {
    /// Logical target of the route.
    pub handler: Option<String>,
    /// Resolved, upper-cased verb.
    pub method: String,
    pub action: String,
    /// Query parameters, path placeholders and `action`.
    pub parameters: Parameters,
    /// Negotiated response format.
    pub format: String,
    pub post: BTreeMap<String, String>,
    pub files: Vec<String>,
    pub secured: bool,
}

impl ActionInvocation {
    /// Parameter value by name, if present and non-null.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).and_then(|v| v.as_deref())
    }
}

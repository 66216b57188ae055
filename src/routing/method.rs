//! HTTP verb to action resolution.
//!
//! # Override precedence
//! 1. `X-HTTP-Method-Override` header, if non-empty
//! 2. `__apiRouteMethod` query parameter, if the route has an action for it
//! 3. The transport verb
//!
//! The resolved verb is always upper-cased.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::routing::request::IncomingRequest;

/// Header that overrides the transport verb.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// Query parameter that overrides the transport verb.
pub const METHOD_OVERRIDE_QUERY: &str = "__apiRouteMethod";

/// The verbs a route can map to actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Post,
    Get,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Post,
        Method::Get,
        Method::Put,
        Method::Delete,
        Method::Options,
        Method::Patch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }

    /// Action name used when a verb is enabled without an explicit action.
    pub fn default_action(self) -> &'static str {
        match self {
            Method::Post => "create",
            Method::Get => "read",
            Method::Put => "update",
            Method::Delete => "delete",
            Method::Options => "options",
            Method::Patch => "patch",
        }
    }

    /// Reverse lookup in the default action table.
    pub fn for_default_action(action: &str) -> Option<Method> {
        Self::ALL.into_iter().find(|m| m.default_action() == action)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RouteError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| RouteError::UnknownMethod(s.to_string()))
    }
}

/// Action name per verb. Verbs without an entry are unsupported by the route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTable {
    actions: [Option<String>; 6],
}

impl ActionTable {
    /// A table with no verb enabled.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every verb enabled with its default action.
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();
        for method in Method::ALL {
            table.enable(method);
        }
        table
    }

    /// Enable `method` with its default action.
    pub fn enable(&mut self, method: Method) {
        self.set(method, method.default_action());
    }

    pub fn set(&mut self, method: Method, action: impl Into<String>) {
        self.actions[method.index()] = Some(action.into());
    }

    /// Set `action`, locating the verb through the default action table
    /// when `method` is `None`. Returns `false` if no verb could be found.
    pub fn set_action(&mut self, action: &str, method: Option<Method>) -> bool {
        match method.or_else(|| Method::for_default_action(action)) {
            Some(method) => {
                self.set(method, action);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, method: Method) -> Option<&str> {
        self.actions[method.index()].as_deref()
    }

    /// Action for an upper-cased verb string. Unknown verbs have none.
    pub fn action_for(&self, verb: &str) -> Option<&str> {
        verb.parse::<Method>().ok().and_then(|m| self.get(m))
    }

    /// Verbs with a configured action, in table order.
    pub fn methods(&self) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| self.get(*m).is_some())
            .collect()
    }

    pub fn contains_action(&self, action: &str) -> bool {
        self.actions.iter().flatten().any(|a| a == action)
    }
}

/// Determine the effective verb for `request` against `actions`.
pub fn resolve_verb<R: IncomingRequest + ?Sized>(request: &R, actions: &ActionTable) -> String {
    if let Some(header) = request.header(METHOD_OVERRIDE_HEADER) {
        let header = header.trim();
        if !header.is_empty() {
            return header.to_ascii_uppercase();
        }
    }

    if let Some(verb) = request.query().get(METHOD_OVERRIDE_QUERY) {
        let verb = verb.trim().to_ascii_uppercase();
        if actions.action_for(&verb).is_some() {
            return verb;
        }
    }

    request.method().to_ascii_uppercase()
}

//! Shared utilities for integration tests.

use api_route::{ActionInvocation, ApiRoute, Method, Parameters};

/// `/articles/<id>[/<slug>]` with numeric ids, GET → read.
pub fn articles_route() -> ApiRoute {
    ApiRoute::builder("/articles/<id>[/<slug>]")
        .handler("Articles")
        .requirement("id", r"\d+")
        .requirement("slug", r"[\w-]+")
        .action(Method::Get, "read")
        .build()
        .unwrap()
}

/// Parameters from string pairs.
#[allow(dead_code)]
pub fn params(pairs: &[(&str, &str)]) -> Parameters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Some(v.to_string())))
        .collect()
}

/// Non-null parameters of an invocation as sorted pairs.
#[allow(dead_code)]
pub fn values(invocation: &ActionInvocation) -> Vec<(String, String)> {
    invocation
        .parameters
        .iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k.clone(), v)))
        .collect()
}

#[allow(dead_code)]
pub fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

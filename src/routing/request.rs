//! Inbound request abstraction.
//!
//! The matcher only reads requests; constructing them is the host's job.
//! `RequestParts` is a plain owned implementation, and any
//! `axum::http::Request<B>` can be matched directly.

use std::collections::BTreeMap;

use axum::http::{header, Request};

/// What the matcher needs to know about an incoming request.
pub trait IncomingRequest {
    /// URL path, without query string.
    fn path(&self) -> &str;

    /// Transport verb as sent by the client.
    fn method(&self) -> &str;

    /// Header value by case-insensitive name.
    fn header(&self, name: &str) -> Option<&str>;

    /// Decoded query parameters.
    fn query(&self) -> BTreeMap<String, String>;

    /// Decoded body parameters.
    fn post(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Opaque references to uploaded files.
    fn files(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether the request arrived over a secure transport.
    fn is_secured(&self) -> bool {
        false
    }

    /// Value of the `Accept` header, empty when absent.
    fn accept(&self) -> &str {
        self.header(header::ACCEPT.as_str()).unwrap_or_default()
    }
}

/// Owned request description.
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
    pub method: String,
    pub path: String,
    /// Header names are stored lower-cased.
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub post: BTreeMap<String, String>,
    pub files: Vec<String>,
    pub secured: bool,
}

impl RequestParts {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_post(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.post.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, reference: impl Into<String>) -> Self {
        self.files.push(reference.into());
        self
    }

    pub fn secured(mut self, secured: bool) -> Self {
        self.secured = secured;
        self
    }
}

impl IncomingRequest for RequestParts {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn query(&self) -> BTreeMap<String, String> {
        self.query.clone()
    }

    fn post(&self) -> BTreeMap<String, String> {
        self.post.clone()
    }

    fn files(&self) -> Vec<String> {
        self.files.clone()
    }

    fn is_secured(&self) -> bool {
        self.secured
    }
}

/// Parse a raw query string into a map; later duplicates win.
pub fn parse_query(query: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

impl<B> IncomingRequest for Request<B> {
    fn path(&self) -> &str {
        self.uri().path()
    }

    fn method(&self) -> &str {
        self.method().as_str()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|h| h.to_str().ok())
    }

    fn query(&self) -> BTreeMap<String, String> {
        self.uri().query().map(parse_query).unwrap_or_default()
    }

    fn is_secured(&self) -> bool {
        self.uri().scheme_str() == Some("https")
    }
}

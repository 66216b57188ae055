//! Reverse URL construction.
//!
//! Placeholders are filled from the supplied parameters. An optional group
//! that still holds an unfilled placeholder is dropped entirely, innermost
//! groups first; any other group keeps its content. An unfilled placeholder
//! outside every optional group means the route cannot produce a URL.
//! Parameters the path did not consume become the query string.

use std::collections::BTreeSet;

use crate::observability::metrics;
use crate::routing::invocation::{ActionInvocation, Parameters, ACTION_KEY};
use crate::routing::pattern::Node;
use crate::routing::route::ApiRoute;

impl ApiRoute {
    /// Build a URL for `action` on `handler`, or `None` if this route
    /// cannot produce one.
    ///
    /// The template's leading `/` is dropped so the result can be appended
    /// to a base URL ending in `/`.
    pub fn build_url(
        &self,
        handler: Option<&str>,
        action: &str,
        parameters: &Parameters,
        base_url: &str,
    ) -> Option<String> {
        let url = self.try_build(handler, action, parameters, base_url);
        metrics::record_build(self.path(), url.is_some());
        match &url {
            Some(url) => tracing::debug!(route = %self.path(), action, url = %url, "Built URL"),
            None => tracing::trace!(route = %self.path(), action, "Route cannot build URL"),
        }
        url
    }

    /// Build a URL from a previously matched invocation.
    pub fn construct_url(&self, invocation: &ActionInvocation, base_url: &str) -> Option<String> {
        self.build_url(
            invocation.handler.as_deref(),
            &invocation.action,
            &invocation.parameters,
            base_url,
        )
    }

    fn try_build(
        &self,
        handler: Option<&str>,
        action: &str,
        parameters: &Parameters,
        base_url: &str,
    ) -> Option<String> {
        if self.handler() != handler || !self.actions().contains_action(action) {
            return None;
        }

        let nodes = self.compiled().nodes();
        let mut consumed = BTreeSet::new();
        let rendered = render(nodes, parameters, &mut consumed);
        if rendered.unresolved {
            return None;
        }

        let leading = match nodes.first() {
            Some(Node::Literal(text)) => text.len() - text.trim_start_matches('/').len(),
            _ => 0,
        };
        let path = &rendered.text[leading..];

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (name, value) in parameters {
            if name == ACTION_KEY || consumed.contains(name.as_str()) {
                continue;
            }
            if let Some(value) = value {
                query.append_pair(name, value);
                has_query = true;
            }
        }

        let mut url = format!("{}{}", base_url, path);
        if has_query {
            url.push('?');
            url.push_str(&query.finish());
        }
        Some(url)
    }
}

struct Rendered {
    text: String,
    /// A placeholder at this level (not inside a dropped group) had no value.
    unresolved: bool,
}

fn render<'a>(nodes: &'a [Node], parameters: &Parameters, consumed: &mut BTreeSet<&'a str>) -> Rendered {
    let mut text = String::new();
    let mut unresolved = false;

    for node in nodes {
        match node {
            Node::Literal(literal) => text.push_str(literal),
            Node::Placeholder(name) => match parameters.get(name) {
                Some(Some(value)) => {
                    text.push_str(value);
                    consumed.insert(name.as_str());
                }
                _ => unresolved = true,
            },
            Node::Optional(children) => {
                let inner = render(children, parameters, consumed);
                if !inner.unresolved {
                    text.push_str(&inner.text);
                }
            }
        }
    }

    Rendered { text, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::method::Method;

    fn articles() -> ApiRoute {
        ApiRoute::builder("/articles/<id>[/<slug>]")
            .handler("Articles")
            .requirement("id", r"\d+")
            .action(Method::Get, "read")
            .build()
            .unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    #[test]
    fn test_optional_segment_dropped() {
        let url = articles().build_url(Some("Articles"), "read", &params(&[("id", "42")]), "");
        assert_eq!(url.as_deref(), Some("articles/42"));
    }

    #[test]
    fn test_optional_segment_kept() {
        let url = articles().build_url(
            Some("Articles"),
            "read",
            &params(&[("id", "42"), ("slug", "my-title")]),
            "",
        );
        assert_eq!(url.as_deref(), Some("articles/42/my-title"));
    }

    #[test]
    fn test_missing_required_placeholder() {
        let url = articles().build_url(Some("Articles"), "read", &params(&[("slug", "x")]), "");
        assert_eq!(url, None);
    }

    #[test]
    fn test_wrong_handler_or_action() {
        let route = articles();
        let p = params(&[("id", "1")]);
        assert_eq!(route.build_url(Some("Users"), "read", &p, ""), None);
        assert_eq!(route.build_url(None, "read", &p, ""), None);
        assert_eq!(route.build_url(Some("Articles"), "delete", &p, ""), None);
    }

    #[test]
    fn test_leftover_parameters_become_query() {
        let mut p = params(&[("id", "7"), ("q", "a b&c"), ("action", "read")]);
        p.insert("empty".into(), None);
        let url = articles().build_url(Some("Articles"), "read", &p, "https://api.example.com/");
        assert_eq!(url.as_deref(), Some("https://api.example.com/articles/7?q=a+b%26c"));
    }

    #[test]
    fn test_nested_groups_innermost_first() {
        let route = ApiRoute::builder("/files/<dir>[/<name>[.<ext>]]")
            .handler("Files")
            .build()
            .unwrap();
        let build = |pairs: &[(&str, &str)]| route.build_url(Some("Files"), "read", &params(pairs), "/");

        assert_eq!(build(&[("dir", "docs")]).as_deref(), Some("/files/docs"));
        assert_eq!(build(&[("dir", "docs"), ("name", "a")]).as_deref(), Some("/files/docs/a"));
        assert_eq!(
            build(&[("dir", "docs"), ("name", "a"), ("ext", "txt")]).as_deref(),
            Some("/files/docs/a.txt")
        );
        // The outer group is dropped, but `ext` was still consumed by the template.
        assert_eq!(build(&[("dir", "docs"), ("ext", "txt")]).as_deref(), Some("/files/docs"));
    }

    #[test]
    fn test_literal_route_is_exact_inverse() {
        let route = ApiRoute::new("/status/health", None).unwrap();
        assert_eq!(
            route.build_url(None, "read", &Parameters::new(), "").as_deref(),
            Some("status/health")
        );
    }

    #[test]
    fn test_construct_url_from_invocation() {
        use crate::routing::request::RequestParts;

        let route = articles();
        let inv = route
            .match_request(&RequestParts::new("GET", "/articles/5/intro").with_query("page", "2"))
            .unwrap();
        assert_eq!(
            route.construct_url(&inv, "/").as_deref(),
            Some("/articles/5/intro?page=2")
        );
    }
}

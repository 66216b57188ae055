//! Request matching.
//!
//! # Responsibilities
//! - Reject disabled routes
//! - Match the path against the compiled expression (anchored, case-sensitive)
//! - Negotiate the response format and resolve the verb to an action
//! - Extract placeholder values by capture order
//! - Reject matches where a required placeholder came back empty
//!
//! # Design Decisions
//! - Not matching is `None`, never an error
//! - All per-request state lives on the stack of `match_request`
//! - Observers run synchronously after the invocation is built

use crate::observability::metrics::{self, MatchOutcome};
use crate::routing::invocation::{ActionInvocation, Parameters, ACTION_KEY};
use crate::routing::method::resolve_verb;
use crate::routing::request::IncomingRequest;
use crate::routing::route::ApiRoute;

impl ApiRoute {
    /// Match `request` against this route.
    pub fn match_request<R: IncomingRequest + ?Sized>(&self, request: &R) -> Option<ActionInvocation> {
        match self.try_match(request) {
            Ok(invocation) => {
                metrics::record_match(self.path(), MatchOutcome::Matched);
                tracing::debug!(
                    route = %self.path(),
                    method = %invocation.method,
                    action = %invocation.action,
                    "Route matched"
                );
                self.notify(&invocation);
                Some(invocation)
            }
            Err(outcome) => {
                metrics::record_match(self.path(), outcome);
                tracing::trace!(route = %self.path(), path = request.path(), reason = outcome.as_str(), "Route did not match");
                None
            }
        }
    }

    fn try_match<R: IncomingRequest + ?Sized>(&self, request: &R) -> Result<ActionInvocation, MatchOutcome> {
        if !self.is_enabled() {
            return Err(MatchOutcome::Disabled);
        }

        let compiled = self.compiled();
        let captures = compiled
            .regex()
            .captures(request.path())
            .ok_or(MatchOutcome::PathMismatch)?;

        let format = self.formats().negotiate(request.accept(), self.pinned_format());
        let method = resolve_verb(request, self.actions());
        let action = self
            .actions()
            .action_for(&method)
            .ok_or(MatchOutcome::UnsupportedMethod)?
            .to_string();

        let mut parameters: Parameters = request
            .query()
            .into_iter()
            .map(|(name, value)| (name, Some(value)))
            .collect();
        parameters.insert(ACTION_KEY.to_string(), Some(action.clone()));

        for (index, name) in compiled.capture_order().iter().enumerate() {
            // Optional groups only keep the numbering aligned.
            let Some(name) = name else { continue };

            let value = captures
                .get(index + 1)
                .map(|m| m.as_str())
                .filter(|v| !v.is_empty());

            match value {
                Some(value) => {
                    parameters.insert(name.clone(), Some(value.to_string()));
                }
                None if compiled.is_required(name) => {
                    tracing::trace!(route = %self.path(), placeholder = %name, "Required placeholder is empty");
                    return Err(MatchOutcome::MissingParameter);
                }
                None => match self.placeholders().default_for(name) {
                    Some(default) => {
                        parameters.insert(name.clone(), Some(default.to_string()));
                    }
                    None => {
                        parameters.remove(name);
                    }
                },
            }
        }

        Ok(ActionInvocation {
            handler: self.handler().map(str::to_string),
            method,
            action,
            parameters,
            format,
            post: request.post(),
            files: request.files(),
            secured: request.is_secured(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::method::{Method, METHOD_OVERRIDE_HEADER};
    use crate::routing::request::RequestParts;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn articles() -> ApiRoute {
        ApiRoute::builder("/articles/<id>[/<slug>]")
            .handler("Articles")
            .requirement("id", r"\d+")
            .action(Method::Get, "read")
            .build()
            .unwrap()
    }

    fn params(invocation: &ActionInvocation) -> Vec<(&str, &str)> {
        invocation
            .parameters
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
            .collect()
    }

    #[test]
    fn test_required_only() {
        let inv = articles().match_request(&RequestParts::new("GET", "/articles/42")).unwrap();
        assert_eq!(params(&inv), vec![("action", "read"), ("id", "42")]);
        assert_eq!(inv.handler.as_deref(), Some("Articles"));
        assert_eq!(inv.method, "GET");
        assert_eq!(inv.format, "json");
    }

    #[test]
    fn test_optional_segment_present() {
        let inv = articles()
            .match_request(&RequestParts::new("get", "/articles/42/my_title"))
            .unwrap();
        assert_eq!(params(&inv), vec![("action", "read"), ("id", "42"), ("slug", "my_title")]);
    }

    #[test]
    fn test_requirement_mismatch() {
        assert!(articles().match_request(&RequestParts::new("GET", "/articles/abc")).is_none());
    }

    #[test]
    fn test_unsupported_verb() {
        assert!(articles().match_request(&RequestParts::new("POST", "/articles/42")).is_none());
    }

    #[test]
    fn test_disabled_route() {
        let mut route = articles();
        route.set_enabled(false);
        assert!(route.match_request(&RequestParts::new("GET", "/articles/42")).is_none());
    }

    #[test]
    fn test_path_is_case_sensitive_and_anchored() {
        let route = articles();
        assert!(route.match_request(&RequestParts::new("GET", "/Articles/42")).is_none());
        assert!(route.match_request(&RequestParts::new("GET", "/api/articles/42")).is_none());
        assert!(route.match_request(&RequestParts::new("GET", "/articles/42/")).is_none());
    }

    #[test]
    fn test_query_seeds_parameters_and_path_wins() {
        let req = RequestParts::new("GET", "/articles/42")
            .with_query("page", "3")
            .with_query("id", "999")
            .with_query("action", "hijack");
        let inv = articles().match_request(&req).unwrap();
        assert_eq!(params(&inv), vec![("action", "read"), ("id", "42"), ("page", "3")]);
    }

    #[test]
    fn test_required_default_placeholder_empty_fails() {
        let route = ApiRoute::builder("/list/<page>")
            .default_value("page", "1")
            .build()
            .unwrap();
        assert!(route.match_request(&RequestParts::new("GET", "/list/")).is_none());
        let inv = route.match_request(&RequestParts::new("GET", "/list/5")).unwrap();
        assert_eq!(inv.parameter("page"), Some("5"));
    }

    #[test]
    fn test_optional_default_filled() {
        let route = ApiRoute::builder("/report[.<format>]")
            .default_value("format", "csv")
            .build()
            .unwrap();
        let inv = route.match_request(&RequestParts::new("GET", "/report")).unwrap();
        assert_eq!(inv.parameter("format"), Some("csv"));
        let inv = route.match_request(&RequestParts::new("GET", "/report.pdf")).unwrap();
        assert_eq!(inv.parameter("format"), Some("pdf"));
    }

    #[test]
    fn test_absent_optional_clears_query_value() {
        let req = RequestParts::new("GET", "/articles/42").with_query("slug", "from-query");
        let inv = articles().match_request(&req).unwrap();
        assert_eq!(inv.parameter("slug"), None);
    }

    #[test]
    fn test_method_override_header() {
        let route = ApiRoute::new("/things/<id>", None).unwrap();
        let req = RequestParts::new("POST", "/things/1").with_header(METHOD_OVERRIDE_HEADER, "DELETE");
        let inv = route.match_request(&req).unwrap();
        assert_eq!(inv.method, "DELETE");
        assert_eq!(inv.action, "delete");
    }

    #[test]
    fn test_format_negotiation_is_per_request() {
        let route = articles();
        let xml = RequestParts::new("GET", "/articles/1").with_header("Accept", "application/xml");
        let plain = RequestParts::new("GET", "/articles/1");
        assert_eq!(route.match_request(&xml).unwrap().format, "xml");
        assert_eq!(route.match_request(&plain).unwrap().format, "json");
    }

    #[test]
    fn test_passthrough_fields() {
        let req = RequestParts::new("GET", "/articles/1")
            .with_post("title", "Hello")
            .with_file("upload-1")
            .secured(true);
        let inv = articles().match_request(&req).unwrap();
        assert_eq!(inv.post.get("title").map(String::as_str), Some("Hello"));
        assert_eq!(inv.files, vec!["upload-1".to_string()]);
        assert!(inv.secured);
    }

    #[test]
    fn test_observers_run_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let first = calls.clone();
        let second = calls.clone();

        let mut route = articles();
        route.on_match(move |_: &ApiRoute, inv: &ActionInvocation| {
            first.lock().unwrap().push(format!("first:{}", inv.action));
        });
        route.on_match(move |r: &ApiRoute, _: &ActionInvocation| {
            second.lock().unwrap().push(format!("second:{}", r.path()));
        });

        route.match_request(&RequestParts::new("GET", "/articles/1")).unwrap();
        assert!(route.match_request(&RequestParts::new("GET", "/nope")).is_none());

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["first:read".to_string(), "second:/articles/<id>[/<slug>]".to_string()]
        );
    }

    #[test]
    fn test_observer_from_builder() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let route = ApiRoute::builder("/ping")
            .on_match(move |_: &ApiRoute, _: &ActionInvocation| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        route.match_request(&RequestParts::new("GET", "/ping")).unwrap();
        route.match_request(&RequestParts::new("OPTIONS", "/ping")).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}

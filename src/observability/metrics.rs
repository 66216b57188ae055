//! Route outcome counters.
//!
//! # Metrics
//! - `api_route_match_total` (counter): match attempts by route, outcome
//! - `api_route_build_total` (counter): URL builds by route, outcome

/// Why a match attempt ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    Disabled,
    PathMismatch,
    UnsupportedMethod,
    MissingParameter,
}

impl MatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchOutcome::Matched => "matched",
            MatchOutcome::Disabled => "disabled",
            MatchOutcome::PathMismatch => "path_mismatch",
            MatchOutcome::UnsupportedMethod => "unsupported_method",
            MatchOutcome::MissingParameter => "missing_parameter",
        }
    }
}

pub fn record_match(route: &str, outcome: MatchOutcome) {
    ::metrics::counter!(
        "api_route_match_total",
        "route" => route.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_build(route: &str, built: bool) {
    let outcome = if built { "built" } else { "no_match" };
    ::metrics::counter!(
        "api_route_build_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routing::format::Format;

/// Root configuration: a base URL and the routes to try in order.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix for built URLs (e.g., "https://api.example.com/").
    pub base_url: String,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Route definitions.
    pub routes: Vec<RouteConfig>,
}

/// One route definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path template, e.g. "/users/<id>[/<format>]".
    pub path: String,

    /// Logical handler the route dispatches to.
    #[serde(default)]
    pub presenter: Option<String>,

    /// Enabled verbs. Empty enables every verb with its default action.
    #[serde(default)]
    pub methods: MethodsConfig,

    /// Per-placeholder requirement and default.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterConfig>,

    /// Negotiable formats. Empty means json + xml.
    #[serde(default)]
    pub formats: Vec<Format>,

    /// Fixed response format; disables negotiation.
    #[serde(default)]
    pub format: Option<String>,

    /// Disabled routes never match.
    #[serde(default)]
    pub disable: bool,
}

/// Verb configuration: either a list of verbs using default actions,
/// or a verb → action map.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MethodsConfig {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl Default for MethodsConfig {
    fn default() -> Self {
        MethodsConfig::List(Vec::new())
    }
}

/// Placeholder settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParameterConfig {
    /// Regex fragment; defaults to `\w+`.
    pub requirement: Option<String>,

    /// Value used when the placeholder is absent.
    pub default: Option<String>,
}

/// Log output style.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output style.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: RouterConfig = toml::from_str(
            r#"
            [[routes]]
            path = "/ping"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "");
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].methods, MethodsConfig::List(vec![]));
        assert!(!config.routes[0].disable);
    }

    #[test]
    fn test_full_route() {
        let config: RouterConfig = toml::from_str(
            r#"
            base_url = "https://api.example.com/"

            [observability]
            log_level = "debug"
            log_format = "compact"

            [[routes]]
            path = "/articles/<id>[/<slug>]"
            presenter = "Articles"
            methods = { GET = "read", POST = "store" }
            format = "xml"

            [routes.parameters.id]
            requirement = '\d+'

            [routes.parameters.slug]
            default = "index"

            [[routes.formats]]
            name = "xml"
            mime = "application/xml"

            [[routes]]
            path = "/users"
            methods = ["GET", "delete"]
            "#,
        )
        .unwrap();

        assert_eq!(config.observability.log_format, LogFormat::Compact);
        let articles = &config.routes[0];
        assert_eq!(articles.presenter.as_deref(), Some("Articles"));
        match &articles.methods {
            MethodsConfig::Map(map) => assert_eq!(map.get("POST").map(String::as_str), Some("store")),
            other => panic!("expected map, got {:?}", other),
        }
        assert_eq!(articles.parameters["id"].requirement.as_deref(), Some(r"\d+"));
        assert_eq!(articles.parameters["slug"].default.as_deref(), Some("index"));
        assert_eq!(articles.formats, vec![Format::new("xml", "application/xml")]);
        assert_eq!(articles.format.as_deref(), Some("xml"));
        assert_eq!(
            config.routes[1].methods,
            MethodsConfig::List(vec!["GET".into(), "delete".into()])
        );
    }
}

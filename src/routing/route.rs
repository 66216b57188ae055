//! Route definition.
//!
//! An `ApiRoute` is built once, compiled eagerly, and then shared read-only
//! between any number of concurrent match and build calls. Nothing learned
//! while serving a request is written back to it.

use std::fmt;
use std::sync::Arc;

use crate::config::schema::{MethodsConfig, RouteConfig};
use crate::error::{RouteError, RouteResult};
use crate::routing::format::FormatTable;
use crate::routing::invocation::ActionInvocation;
use crate::routing::method::{ActionTable, Method};
use crate::routing::pattern::CompiledPattern;
use crate::routing::placeholder::PlaceholderTable;

/// Callback notified after every successful match.
pub trait MatchObserver: Send + Sync {
    fn on_match(&self, route: &ApiRoute, invocation: &ActionInvocation);
}

impl<F> MatchObserver for F
where
    F: Fn(&ApiRoute, &ActionInvocation) + Send + Sync,
{
    fn on_match(&self, route: &ApiRoute, invocation: &ActionInvocation) {
        self(route, invocation)
    }
}

/// A single API route: template, verb table, placeholder rules, formats.
#[derive(Clone)]
pub struct ApiRoute {
    handler: Option<String>,
    actions: ActionTable,
    placeholders: PlaceholderTable,
    formats: FormatTable,
    pinned_format: Option<String>,
    enabled: bool,
    compiled: CompiledPattern,
    observers: Vec<Arc<dyn MatchObserver>>,
}

impl fmt::Debug for ApiRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRoute")
            .field("path", &self.path())
            .field("handler", &self.handler)
            .field("actions", &self.actions)
            .field("formats", &self.formats)
            .field("pinned_format", &self.pinned_format)
            .field("enabled", &self.enabled)
            .field("expression", &self.compiled.expression())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ApiRoute {
    /// Route with every verb mapped to its default action.
    pub fn new(path: impl Into<String>, handler: Option<&str>) -> RouteResult<Self> {
        let mut builder = Self::builder(path);
        if let Some(handler) = handler {
            builder = builder.handler(handler);
        }
        builder.build()
    }

    pub fn builder(path: impl Into<String>) -> ApiRouteBuilder {
        ApiRouteBuilder::new(path)
    }

    /// Raw path template.
    pub fn path(&self) -> &str {
        self.compiled.template()
    }

    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Map `action` to `method`, or to the verb whose default action it is.
    /// Unknown verbs are ignored.
    pub fn set_action(&mut self, action: &str, method: Option<Method>) {
        if !self.actions.set_action(action, method) {
            tracing::debug!(route = %self.path(), action, "No verb for action, ignoring");
        }
    }

    /// Verbs this route answers to.
    pub fn methods(&self) -> Vec<Method> {
        self.actions.methods()
    }

    pub fn placeholders(&self) -> &PlaceholderTable {
        &self.placeholders
    }

    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Full mime string for a short format name.
    pub fn format_mime(&self, format: &str) -> Option<&str> {
        self.formats.mime(format)
    }

    pub fn pinned_format(&self) -> Option<&str> {
        self.pinned_format.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn compiled(&self) -> &CompiledPattern {
        &self.compiled
    }

    /// Placeholder names in template order.
    pub fn placeholder_names(&self) -> Vec<&str> {
        self.compiled.placeholder_names().collect()
    }

    /// Placeholders that must be present in every matching path.
    pub fn required_parameters(&self) -> &[String] {
        self.compiled.required()
    }

    /// Register an observer. Observers run in registration order.
    pub fn on_match(&mut self, observer: impl MatchObserver + 'static) {
        self.observers.push(Arc::new(observer));
    }

    pub(crate) fn notify(&self, invocation: &ActionInvocation) {
        for observer in &self.observers {
            observer.on_match(self, invocation);
        }
    }
}

impl TryFrom<&RouteConfig> for ApiRoute {
    type Error = RouteError;

    fn try_from(config: &RouteConfig) -> RouteResult<Self> {
        let mut builder = ApiRoute::builder(config.path.as_str()).enabled(!config.disable);

        if let Some(presenter) = &config.presenter {
            builder = builder.handler(presenter.as_str());
        }

        match &config.methods {
            MethodsConfig::List(methods) => {
                for method in methods {
                    builder = builder.method(method.parse()?);
                }
            }
            MethodsConfig::Map(actions) => {
                for (method, action) in actions {
                    builder = builder.action(method.parse()?, action.as_str());
                }
            }
        }

        for (name, parameter) in &config.parameters {
            if let Some(requirement) = &parameter.requirement {
                builder = builder.requirement(name.as_str(), requirement.as_str());
            }
            if let Some(default) = &parameter.default {
                builder = builder.default_value(name.as_str(), default.as_str());
            }
        }

        if !config.formats.is_empty() {
            builder = builder.formats(FormatTable::new(config.formats.clone()));
        }

        if let Some(format) = &config.format {
            builder = builder.pinned_format(format.as_str());
        }

        builder.build()
    }
}

/// Collects route settings and compiles the template once in `build`.
pub struct ApiRouteBuilder {
    path: String,
    handler: Option<String>,
    actions: Option<ActionTable>,
    placeholders: PlaceholderTable,
    formats: FormatTable,
    pinned_format: Option<String>,
    enabled: bool,
    observers: Vec<Arc<dyn MatchObserver>>,
}

impl ApiRouteBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            handler: None,
            actions: None,
            placeholders: PlaceholderTable::new(),
            formats: FormatTable::default(),
            pinned_format: None,
            enabled: true,
            observers: Vec::new(),
        }
    }

    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Enable `method` with its default action.
    ///
    /// Once any verb is configured explicitly, the others stay disabled.
    pub fn method(mut self, method: Method) -> Self {
        self.actions.get_or_insert_with(ActionTable::empty).enable(method);
        self
    }

    /// Enable `method` with a custom action name.
    pub fn action(mut self, method: Method, action: impl Into<String>) -> Self {
        self.actions
            .get_or_insert_with(ActionTable::empty)
            .set(method, action);
        self
    }

    pub fn requirement(mut self, name: impl Into<String>, requirement: impl Into<String>) -> Self {
        self.placeholders.set_requirement(name, requirement);
        self
    }

    /// Give a placeholder a default, which also makes its capture optional.
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholders.set_default(name, value);
        self
    }

    pub fn format(mut self, name: impl Into<String>, mime: impl Into<String>) -> Self {
        self.formats.insert(name, mime);
        self
    }

    pub fn formats(mut self, formats: FormatTable) -> Self {
        self.formats = formats;
        self
    }

    /// Always answer in `format`, skipping negotiation.
    pub fn pinned_format(mut self, format: impl Into<String>) -> Self {
        self.pinned_format = Some(format.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_match(mut self, observer: impl MatchObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Compile the template and freeze the route.
    pub fn build(self) -> RouteResult<ApiRoute> {
        if let Some(format) = &self.pinned_format {
            if !self.formats.contains(format) {
                return Err(RouteError::UnknownFormat(format.clone()));
            }
        }

        let compiled = CompiledPattern::compile(&self.path, &self.placeholders)?;

        Ok(ApiRoute {
            handler: self.handler,
            actions: self.actions.unwrap_or_else(ActionTable::with_defaults),
            placeholders: self.placeholders,
            formats: self.formats,
            pinned_format: self.pinned_format,
            enabled: self.enabled,
            compiled,
            observers: self.observers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ParameterConfig;
    use crate::routing::format::Format;
    use std::collections::BTreeMap;

    #[test]
    fn test_new_enables_default_actions() {
        let route = ApiRoute::new("/users/<id>", Some("Users")).unwrap();
        assert_eq!(route.handler(), Some("Users"));
        assert_eq!(route.methods(), Method::ALL.to_vec());
        assert_eq!(route.actions().get(Method::Get), Some("read"));
    }

    #[test]
    fn test_explicit_methods_disable_others() {
        let route = ApiRoute::builder("/users")
            .method(Method::Get)
            .action(Method::Post, "register")
            .build()
            .unwrap();
        assert_eq!(route.methods(), vec![Method::Post, Method::Get]);
        assert_eq!(route.actions().get(Method::Post), Some("register"));
        assert_eq!(route.actions().get(Method::Delete), None);
    }

    #[test]
    fn test_set_action_after_build() {
        let mut route = ApiRoute::builder("/users").method(Method::Get).build().unwrap();
        route.set_action("delete", None);
        route.set_action("nonsense", None);
        assert_eq!(route.methods(), vec![Method::Get, Method::Delete]);
    }

    #[test]
    fn test_pinned_format_must_exist() {
        let err = ApiRoute::builder("/x").pinned_format("yaml").build().unwrap_err();
        assert!(matches!(err, RouteError::UnknownFormat(ref f) if f == "yaml"));

        let route = ApiRoute::builder("/x")
            .format("yaml", "application/yaml")
            .pinned_format("yaml")
            .build()
            .unwrap();
        assert_eq!(route.pinned_format(), Some("yaml"));
        assert_eq!(route.format_mime("yaml"), Some("application/yaml"));
    }

    #[test]
    fn test_introspection() {
        let route = ApiRoute::new("/a/<x>[/<y>]", None).unwrap();
        assert_eq!(route.placeholder_names(), vec!["x", "y"]);
        assert_eq!(route.required_parameters(), &["x".to_string()]);
        assert!(format!("{:?}", route).contains("ApiRoute"));
    }

    #[test]
    fn test_from_config() {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "id".to_string(),
            ParameterConfig {
                requirement: Some(r"\d+".into()),
                default: None,
            },
        );
        let mut methods = BTreeMap::new();
        methods.insert("get".to_string(), "show".to_string());

        let config = RouteConfig {
            path: "/items/<id>".into(),
            presenter: Some("Items".into()),
            methods: MethodsConfig::Map(methods),
            parameters,
            formats: vec![Format::new("json", "application/json")],
            format: None,
            disable: true,
        };

        let route = ApiRoute::try_from(&config).unwrap();
        assert_eq!(route.handler(), Some("Items"));
        assert_eq!(route.actions().get(Method::Get), Some("show"));
        assert_eq!(route.methods(), vec![Method::Get]);
        assert!(!route.is_enabled());
        assert_eq!(route.compiled().expression(), r"^/items/(\d+)$");
        assert_eq!(route.format_mime("xml"), None);
    }

    #[test]
    fn test_from_config_unknown_method() {
        let config = RouteConfig {
            path: "/items".into(),
            presenter: None,
            methods: MethodsConfig::List(vec!["TRACE".into()]),
            parameters: BTreeMap::new(),
            formats: Vec::new(),
            format: None,
            disable: false,
        };
        assert!(matches!(
            ApiRoute::try_from(&config),
            Err(RouteError::UnknownMethod(ref m)) if m == "TRACE"
        ));
    }
}

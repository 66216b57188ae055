//! Configuration validation.
//!
//! # Responsibilities
//! - Compile every route so template errors surface at load time
//! - Check that configured parameters appear in their template
//! - Detect duplicate routes
//! - Validate the base URL and log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::route::ApiRoute;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index} ({path}): {reason}")]
    InvalidRoute {
        index: usize,
        path: String,
        reason: String,
    },

    #[error("route #{index} ({path}): parameter '{name}' does not appear in the template")]
    UnusedParameter {
        index: usize,
        path: String,
        name: String,
    },

    #[error("route #{index} duplicates route #{first} ({path})")]
    DuplicateRoute {
        index: usize,
        first: usize,
        path: String,
    },

    #[error("base_url '{0}' must be empty or end with '/'")]
    BaseUrl(String),

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Check `config`, reporting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.base_url.is_empty() && !config.base_url.ends_with('/') {
        errors.push(ValidationError::BaseUrl(config.base_url.clone()));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    let mut seen: Vec<(Option<&str>, &str)> = Vec::new();
    for (index, route) in config.routes.iter().enumerate() {
        let key = (route.presenter.as_deref(), route.path.as_str());
        if let Some(first) = seen.iter().position(|k| *k == key) {
            errors.push(ValidationError::DuplicateRoute {
                index,
                first,
                path: route.path.clone(),
            });
        }
        seen.push(key);

        let compiled = match ApiRoute::try_from(route) {
            Ok(compiled) => compiled,
            Err(e) => {
                errors.push(ValidationError::InvalidRoute {
                    index,
                    path: route.path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let names: HashSet<&str> = compiled.placeholder_names().into_iter().collect();
        for name in route.parameters.keys() {
            if !names.contains(name.as_str()) {
                errors.push(ValidationError::UnusedParameter {
                    index,
                    path: route.path.clone(),
                    name: name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::error::RouteError;
use crate::routing::route::ApiRoute;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("route #{index}: {source}")]
    Route {
        index: usize,
        #[source]
        source: RouteError,
    },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    tracing::info!(path = %path.display(), routes = config.routes.len(), "Configuration loaded");
    Ok(config)
}

/// Compile every configured route, in file order.
pub fn build_routes(config: &RouterConfig) -> Result<Vec<ApiRoute>, ConfigError> {
    config
        .routes
        .iter()
        .enumerate()
        .map(|(index, route)| ApiRoute::try_from(route).map_err(|source| ConfigError::Route { index, source }))
        .collect()
}

//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the environment, and validate a TOML config.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: GatewayConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Secrets and deployment-specific identities come from the
/// environment when present, so config files never need to carry them.
pub fn apply_env_overrides(config: &mut GatewayConfig) {
    if let Ok(secret) = std::env::var("GATEWAY_SHARED_SECRET") {
        config.identity.shared_secret = secret;
    }
    if let Ok(url) = std::env::var("GATEWAY_BACKEND_URL") {
        config.backend.base_url = url;
    }
    if let Ok(connector) = std::env::var("GATEWAY_ISSUER_CONNECTOR") {
        config.identity.issuer_connector = connector;
    }
    if let Ok(agent) = std::env::var("GATEWAY_SENDER_AGENT") {
        config.identity.sender_agent = agent;
    }
    if let Ok(password) = std::env::var("GATEWAY_TRUSTSTORE_PW") {
        config.trust.password = password;
    }
}

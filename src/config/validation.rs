//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the backend URL actually parses
//! - Reject empty signing secrets before the gateway starts serving
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address is not a valid socket address: {0}")]
    BindAddress(String),

    #[error("backend.base_url is not a valid URL: {0}")]
    BackendUrl(String),

    #[error("backend.timeout_secs must be greater than zero")]
    BackendTimeout,

    #[error("identity.shared_secret must not be empty")]
    EmptySecret,

    #[error("identity.token_ttl_secs must be greater than zero")]
    TokenTtl,
}

/// Validate a parsed configuration. Returns every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if Url::parse(&config.backend.base_url).is_err() {
        errors.push(ValidationError::BackendUrl(config.backend.base_url.clone()));
    }

    if config.backend.timeout_secs == 0 {
        errors.push(ValidationError::BackendTimeout);
    }

    if config.identity.shared_secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }

    if config.identity.token_ttl_secs == 0 {
        errors.push(ValidationError::TokenTtl);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

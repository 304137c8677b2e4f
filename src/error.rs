//! Gateway error taxonomy.
//!
//! # Responsibilities
//! - One error kind per failure class in the pipeline
//! - Map every error to an outward HTTP-equivalent status
//! - Keep public messages short; internals stay in the logs
//!
//! # Design Decisions
//! - Errors are values threaded through the stages, not panics
//! - Backend-reported 403/404 are not errors here: they flow through
//!   the response composer as ordinary status codes
//! - 500-class messages never carry the underlying cause outward

use thiserror::Error;

/// Failure classes of the translation pipeline.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The transport request could not be turned into an envelope
    /// (missing part, wrong part count, unparseable header).
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A per-message-kind structural invariant was violated.
    #[error("{0}")]
    Validation(String),

    /// The request header carried no bearer credential.
    #[error("missing credential")]
    MissingCredential,

    /// The presented token is not bound to the transport's peer certificate.
    #[error("access token did not match presented certificate")]
    TokenBindingMismatch,

    /// The backend could not be reached or did not answer in time.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Anything unexpected. Surfaces as a plain 500.
    #[error("internal error")]
    Internal(String),
}

impl GatewayError {
    /// Outward HTTP-equivalent status for this failure.
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::MalformedEnvelope(_) => 400,
            GatewayError::Validation(_) => 400,
            GatewayError::MissingCredential => 401,
            GatewayError::TokenBindingMismatch => 401,
            GatewayError::BackendUnavailable(_) => 500,
            GatewayError::Internal(_) => 500,
        }
    }

    /// Short reason carried in the rejection payload. Internal detail
    /// (dispatch failures, bugs) is replaced by the generic phrase.
    pub fn public_reason(&self) -> String {
        match self {
            GatewayError::BackendUnavailable(_) | GatewayError::Internal(_) => {
                "internal error".to_string()
            }
            other => other.to_string(),
        }
    }
}

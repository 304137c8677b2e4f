//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration for the multipart transport.
    pub listener: ListenerConfig,

    /// Backend logging/query API.
    pub backend: BackendConfig,

    /// Token issuing identities and the shared signing secret.
    pub identity: IdentityConfig,

    /// Trust roots for the (future) token-binding check.
    pub trust: TrustStoreConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout for inbound exchanges, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the logging/query API.
    pub base_url: String,

    /// Bound on the dispatcher's backend call.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Identities and signing material for minted tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// HMAC secret shared with the backend. Overridable via
    /// GATEWAY_SHARED_SECRET.
    pub shared_secret: String,

    /// Issuer identity of minted service tokens.
    pub issuer: String,

    /// Audience of minted service tokens (the backend service id).
    pub audience: String,

    /// Connector URI stamped on outbound response headers.
    pub issuer_connector: String,

    /// Agent URI stamped on outbound response headers.
    pub sender_agent: String,

    /// Protocol model version stamped on outbound response headers.
    pub model_version: String,

    /// Service token lifetime in seconds.
    pub token_ttl_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            shared_secret: String::new(),
            issuer: "urn:service:gateway".to_string(),
            audience: "urn:service:logging".to_string(),
            issuer_connector: "urn:connector:gateway".to_string(),
            sender_agent: "urn:agent:gateway".to_string(),
            model_version: "4.1.0".to_string(),
            token_ttl_secs: 60,
        }
    }
}

/// Trust store location and credentials. Enumerated for the future
/// binding check; read-only after startup.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrustStoreConfig {
    pub store_path: String,
    pub password: String,
}

//! Protocol message kinds exchanged with the gateway's callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bearer credential presented inside a message header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityToken {
    /// Token format identifier. Only "JWT" is in circulation.
    pub token_format: String,
    pub token_value: String,
}

impl SecurityToken {
    pub fn jwt(value: impl Into<String>) -> Self {
        Self {
            token_format: "JWT".to_string(),
            token_value: value.into(),
        }
    }
}

/// Header fields shared by all inbound request kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHeader {
    pub id: String,
    pub model_version: String,
    pub issued: DateTime<Utc>,
    /// Origin connector of the message.
    pub issuer_connector: String,
    /// Agent which initiated the message.
    pub sender_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_token: Option<SecurityToken>,
}

/// Header fields shared by all outbound response kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    pub id: String,
    /// Id of the originating request. Always the header captured at
    /// decode time, regardless of what later stages did.
    pub correlates_with: String,
    pub model_version: String,
    pub issued: DateTime<Utc>,
    pub issuer_connector: String,
    pub sender_agent: String,
    /// Agent(s) the response is addressed to, copied from the request.
    pub recipient_agent: Vec<String>,
    /// Connector(s) the response is addressed to, copied from the request.
    pub recipient_connector: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_token: Option<SecurityToken>,
}

/// The closed set of message kinds this gateway understands.
///
/// Requests travel inbound from connectors; responses travel outbound.
/// Adding a kind forces every `match` in the composers to be revisited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "messageType")]
pub enum ProtocolMessage {
    /// Create a provenance record. Payload must be JSON.
    CreateProcessRequest(RequestHeader),
    /// Append an entry to an existing process log.
    LogRequest(RequestHeader),
    /// Lookup by id, or paginated listing by process.
    QueryRequest(RequestHeader),
    /// HTTP 201 semantics: request created/processed.
    Accepted(ResponseHeader),
    /// HTTP 200 semantics: query succeeded, payload carries the result.
    Result(ResponseHeader),
    /// Any non-2xx outcome. Payload carries a short reason.
    Rejected(ResponseHeader),
}

impl ProtocolMessage {
    pub fn id(&self) -> &str {
        match self {
            ProtocolMessage::CreateProcessRequest(h)
            | ProtocolMessage::LogRequest(h)
            | ProtocolMessage::QueryRequest(h) => &h.id,
            ProtocolMessage::Accepted(h)
            | ProtocolMessage::Result(h)
            | ProtocolMessage::Rejected(h) => &h.id,
        }
    }

    /// Request-side header, if this is a request kind.
    pub fn request_header(&self) -> Option<&RequestHeader> {
        match self {
            ProtocolMessage::CreateProcessRequest(h)
            | ProtocolMessage::LogRequest(h)
            | ProtocolMessage::QueryRequest(h) => Some(h),
            _ => None,
        }
    }

    pub fn security_token(&self) -> Option<&SecurityToken> {
        match self {
            ProtocolMessage::CreateProcessRequest(h)
            | ProtocolMessage::LogRequest(h)
            | ProtocolMessage::QueryRequest(h) => h.security_token.as_ref(),
            ProtocolMessage::Accepted(h)
            | ProtocolMessage::Result(h)
            | ProtocolMessage::Rejected(h) => h.security_token.as_ref(),
        }
    }

    /// Creation-style requests: every request kind except queries.
    pub fn is_creation_request(&self) -> bool {
        matches!(
            self,
            ProtocolMessage::CreateProcessRequest(_) | ProtocolMessage::LogRequest(_)
        )
    }

    pub fn is_query(&self) -> bool {
        matches!(self, ProtocolMessage::QueryRequest(_))
    }

    pub fn is_request(&self) -> bool {
        self.request_header().is_some()
    }

    /// Kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolMessage::CreateProcessRequest(_) => "CreateProcessRequest",
            ProtocolMessage::LogRequest(_) => "LogRequest",
            ProtocolMessage::QueryRequest(_) => "QueryRequest",
            ProtocolMessage::Accepted(_) => "Accepted",
            ProtocolMessage::Result(_) => "Result",
            ProtocolMessage::Rejected(_) => "Rejected",
        }
    }
}

impl RequestHeader {
    /// Fresh request header, mostly useful for tests and the tunnel layer.
    pub fn new(issuer_connector: impl Into<String>, sender_agent: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            model_version: "4.1.0".to_string(),
            issued: Utc::now(),
            issuer_connector: issuer_connector.into(),
            sender_agent: sender_agent.into(),
            security_token: None,
        }
    }

    pub fn with_token(mut self, token: SecurityToken) -> Self {
        self.security_token = Some(token);
        self
    }
}

//! Response composer: backend outcome to protocol response.
//!
//! # Responsibilities
//! - Map the backend status code onto the closed set of response kinds
//! - Correlate every response with the originally captured request
//! - Attach issuer metadata and a fresh response token
//!
//! # Design Decisions
//! - The status table is a single exhaustive match; a new response kind
//!   cannot be added without the compiler pointing here
//! - Token minting failure downgrades to a token-less response header
//!   instead of losing the exchange

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::schema::IdentityConfig;
use crate::message::model::{ProtocolMessage, ResponseHeader};
use crate::pipeline::dispatch::BackendReply;
use crate::pipeline::identity::IdentityBridge;

/// A fully composed response, ready for a transport encoder.
#[derive(Debug, Clone)]
pub struct ComposedResponse {
    pub status: u16,
    pub header: ProtocolMessage,
    /// Backend payload, or the short rejection reason for pipeline
    /// failures. Transport encoders decide what of this goes on the
    /// wire.
    pub body: String,
    /// Content type of `body` as declared by the backend.
    pub body_type: String,
}

/// Fixed tunnel-transport phrases for non-2xx outcomes. The tunnel has
/// no separate body channel for arbitrary payloads on error, so the
/// phrase stands in for the backend body.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

pub struct ResponseComposer {
    config: IdentityConfig,
    identity: Arc<IdentityBridge>,
}

impl ResponseComposer {
    pub fn new(config: IdentityConfig, identity: Arc<IdentityBridge>) -> Self {
        Self { config, identity }
    }

    /// Re-encode a backend outcome as a protocol response correlated to
    /// the original request header.
    pub fn compose(&self, reply: BackendReply, original: &ProtocolMessage) -> ComposedResponse {
        let header = self.response_header(original);
        let message = match reply.status {
            200 => ProtocolMessage::Result(header),
            201 => ProtocolMessage::Accepted(header),
            _ => ProtocolMessage::Rejected(header),
        };

        tracing::debug!(
            status = reply.status,
            kind = message.kind(),
            correlates_with = original.id(),
            "composed response"
        );

        ComposedResponse {
            status: reply.status,
            header: message,
            body: reply.body,
            body_type: reply
                .content_type
                .unwrap_or_else(|| "text/plain".to_string()),
        }
    }

    /// Response header correlated to the captured request, with a fresh
    /// token. Recipients are copied from the request's sender fields;
    /// a non-request original (possible only on pre-validation errors)
    /// yields empty recipient lists.
    pub fn response_header(&self, original: &ProtocolMessage) -> ResponseHeader {
        let security_token = match self.identity.mint_response_token() {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::error!(error = %e, "response token minting failed");
                None
            }
        };

        let (recipient_agent, recipient_connector) = match original.request_header() {
            Some(h) => (
                vec![h.sender_agent.clone()],
                vec![h.issuer_connector.clone()],
            ),
            None => (Vec::new(), Vec::new()),
        };

        ResponseHeader {
            id: Uuid::new_v4().to_string(),
            correlates_with: original.id().to_string(),
            model_version: self.config.model_version.clone(),
            issued: Utc::now(),
            issuer_connector: self.config.issuer_connector.clone(),
            sender_agent: self.config.sender_agent.clone(),
            recipient_agent,
            recipient_connector,
            security_token,
        }
    }
}

//! Per-message-kind structural validation.
//!
//! # Responsibilities
//! - Enforce the JSON-payload invariant for creation-style requests
//! - Reject response kinds arriving on the inbound path
//! - Require a process id before anything touches the backend
//!
//! # Design Decisions
//! - Pagination values are pass-through: no range validation on page or
//!   size, the backend owns those bounds
//! - Pure function over the envelope and routing, no side effects

use crate::error::GatewayError;
use crate::message::envelope::TYPE_JSON;
use crate::message::Envelope;
use crate::pipeline::routing::RoutingMetadata;

/// Validate one decoded exchange. Pass-through on success.
pub fn validate(envelope: &Envelope, routing: &RoutingMetadata) -> Result<(), GatewayError> {
    if !envelope.header.is_request() {
        return Err(GatewayError::Validation(format!(
            "unexpected message kind {}",
            envelope.header.kind()
        )));
    }

    if routing.pid.is_empty() {
        return Err(GatewayError::Validation("missing process id".to_string()));
    }

    // Creation-style requests must carry JSON. Everything else passes.
    if envelope.header.is_creation_request() && envelope.payload_type != TYPE_JSON {
        tracing::warn!(
            payload_type = %envelope.payload_type,
            "expected application/json"
        );
        return Err(GatewayError::Validation(
            "expected content-type application/json".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::model::{ProtocolMessage, RequestHeader};

    fn envelope(header: ProtocolMessage, content_type: &str) -> Envelope {
        Envelope::new(header, Some(content_type), b"{}")
    }

    fn request_header() -> RequestHeader {
        RequestHeader::new("urn:conn:a", "urn:agent:a")
    }

    #[test]
    fn test_creation_request_requires_json() {
        for content_type in ["text/plain", "application/ld+json", "image/png"] {
            let env = envelope(
                ProtocolMessage::CreateProcessRequest(request_header()),
                content_type,
            );
            let err = validate(&env, &RoutingMetadata::for_process("p1")).unwrap_err();
            assert!(matches!(err, GatewayError::Validation(_)), "{content_type}");
        }
    }

    #[test]
    fn test_log_request_requires_json() {
        let env = envelope(ProtocolMessage::LogRequest(request_header()), "text/plain");
        let err = validate(&env, &RoutingMetadata::for_process("p1")).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn test_creation_request_with_json_passes() {
        let env = envelope(
            ProtocolMessage::CreateProcessRequest(request_header()),
            "application/json",
        );
        assert!(validate(&env, &RoutingMetadata::for_process("p1")).is_ok());
    }

    #[test]
    fn test_query_payload_type_unconstrained() {
        let env = envelope(ProtocolMessage::QueryRequest(request_header()), "text/plain");
        assert!(validate(&env, &RoutingMetadata::for_process("p1")).is_ok());
    }

    #[test]
    fn test_missing_pid_rejected() {
        let env = envelope(
            ProtocolMessage::QueryRequest(request_header()),
            "application/json",
        );
        let err = validate(&env, &RoutingMetadata::default()).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn test_response_kind_rejected_inbound() {
        let json = serde_json::json!({
            "messageType": "Rejected",
            "id": "urn:msg:1",
            "correlatesWith": "urn:msg:0",
            "modelVersion": "4.1.0",
            "issued": "2026-08-24T10:00:00Z",
            "issuerConnector": "urn:conn:gw",
            "senderAgent": "urn:agent:gw",
            "recipientAgent": [],
            "recipientConnector": []
        });
        let header: ProtocolMessage = serde_json::from_value(json).unwrap();
        let env = envelope(header, "application/json");
        let err = validate(&env, &RoutingMetadata::for_process("p1")).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }
}

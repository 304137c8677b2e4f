//! Tunnel transport: decoder and encoder.
//!
//! The tunnel layer (handshake, mutual attestation, encryption) is an
//! external collaborator. It hands the gateway one decoded header per
//! exchange, the raw payload bytes and a map of side-channel hints, and
//! ships back whatever header and body the gateway returns.
//!
//! # Design Decisions
//! - Decoding is infallible: the header already exists, so every later
//!   failure can be correlated
//! - Non-2xx responses carry the fixed reason phrase, not the backend
//!   body; the tunnel has no separate error body channel

use std::collections::HashMap;

use crate::message::{Envelope, ProtocolMessage};
use crate::pipeline::respond::{reason_phrase, ComposedResponse};
use crate::pipeline::routing::{RoutingMetadata, HINT_CONTENT_TYPE};

/// One logical exchange as delivered by the tunnel layer.
#[derive(Debug, Clone)]
pub struct TunnelExchange {
    /// Header message, decoded out-of-band by the tunnel layer.
    pub header: ProtocolMessage,
    pub payload: Vec<u8>,
    /// Side-channel routing hints: `pid`, `id`, `page`, `size`, `sort`,
    /// `content-type`. The tunnel has no URL.
    pub hints: HashMap<String, String>,
}

/// What goes back through the tunnel.
#[derive(Debug, Clone)]
pub struct TunnelResponse {
    pub header: ProtocolMessage,
    pub body: Vec<u8>,
}

/// Turn a tunnel exchange into the canonical envelope plus routing.
/// The header is part of the exchange already, so this cannot fail.
pub fn decode(exchange: TunnelExchange) -> (Envelope, RoutingMetadata) {
    if tracing::enabled!(tracing::Level::TRACE) {
        for (key, value) in &exchange.hints {
            tracing::trace!(hint = %key, value = %value, "tunnel hint");
        }
    }

    let routing = RoutingMetadata::from_hints(&exchange.hints);
    let content_type = exchange.hints.get(HINT_CONTENT_TYPE).map(String::as_str);
    let envelope = Envelope::new(exchange.header, content_type, &exchange.payload);
    (envelope, routing)
}

/// Serialize a composed response for the tunnel: backend body on
/// success, fixed phrase on everything else.
pub fn encode(response: &ComposedResponse) -> TunnelResponse {
    let body = match response.status {
        200 | 201 => response.body.clone().into_bytes(),
        status => reason_phrase(status).as_bytes().to_vec(),
    };
    TunnelResponse {
        header: response.header.clone(),
        body,
    }
}

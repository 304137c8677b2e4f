//! Exception composer: the parallel error path.
//!
//! # Responsibilities
//! - Turn any stage failure into a correlated Rejected response
//! - Map internal failure kinds to outward statuses
//! - Keep internal detail out of the wire body
//!
//! # Design Decisions
//! - One terminal match over the error kind; stages themselves never
//!   build responses
//! - Only decode-stage failures are uncorrelated, and those never reach
//!   this composer (the transport answers natively)

use crate::error::GatewayError;
use crate::message::ProtocolMessage;
use crate::pipeline::respond::{ComposedResponse, ResponseComposer};

pub struct ExceptionComposer;

impl ExceptionComposer {
    /// Compose the rejection for a failed exchange. `original` is the
    /// header captured at decode time; correlation survives every later
    /// failure.
    pub fn reject(
        composer: &ResponseComposer,
        error: &GatewayError,
        original: &ProtocolMessage,
    ) -> ComposedResponse {
        let status = error.status();
        tracing::warn!(
            status,
            correlates_with = original.id(),
            error = %error,
            "rejecting exchange"
        );

        ComposedResponse {
            status,
            header: ProtocolMessage::Rejected(composer.response_header(original)),
            body: error.public_reason(),
            body_type: "text/plain".to_string(),
        }
    }
}

//! HTTP multipart transport: decoder and encoder.
//!
//! # Responsibilities
//! - Parse the two-part request body (`header` + `payload`) into a
//!   decoded header and raw payload bytes
//! - Serialize a composed response back into the same two-part shape
//!
//! # Design Decisions
//! - Exactly two parts with exactly those names; anything else is a
//!   malformed envelope
//! - The payload part's own Content-Type drives envelope normalization
//! - Responses carry a payload part only when there is a body to carry

use axum::body::Bytes;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::message::ProtocolMessage;
use crate::pipeline::respond::ComposedResponse;
use crate::transport::{PART_HEADER, PART_PAYLOAD};

/// Raw decode result, before envelope normalization.
#[derive(Debug)]
pub struct DecodedMultipart {
    pub header: ProtocolMessage,
    /// Content-Type of the payload part, verbatim.
    pub payload_type: Option<String>,
    pub payload: Vec<u8>,
}

/// Decode a multipart request body. The `content_type` is the request's
/// own Content-Type header (carrying the boundary).
pub async fn decode(content_type: &str, body: Bytes) -> Result<DecodedMultipart, GatewayError> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| GatewayError::MalformedEnvelope("not a multipart request".to_string()))?;

    let stream = futures_util::stream::once(async move {
        Ok::<Bytes, std::convert::Infallible>(body)
    });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut header: Option<ProtocolMessage> = None;
    let mut payload: Option<(Option<String>, Vec<u8>)> = None;
    let mut parts = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        GatewayError::MalformedEnvelope(format!("multipart parsing failed: {e}"))
    })? {
        parts += 1;
        let name = field.name().unwrap_or_default().to_string();
        tracing::trace!(part = %name, "multipart field");

        match name.as_str() {
            PART_HEADER => {
                let text = field.text().await.map_err(|e| {
                    GatewayError::MalformedEnvelope(format!("header part unreadable: {e}"))
                })?;
                let parsed: ProtocolMessage = serde_json::from_str(&text).map_err(|_| {
                    GatewayError::MalformedEnvelope(
                        "invalid protocol message header".to_string(),
                    )
                })?;
                header = Some(parsed);
            }
            PART_PAYLOAD => {
                let part_type = field.content_type().map(|m| m.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    GatewayError::MalformedEnvelope(format!("payload part unreadable: {e}"))
                })?;
                payload = Some((part_type, bytes.to_vec()));
            }
            other => {
                return Err(GatewayError::MalformedEnvelope(format!(
                    "unknown multipart field name: {other}"
                )));
            }
        }
    }

    let header =
        header.ok_or_else(|| GatewayError::MalformedEnvelope("missing header part".to_string()))?;
    let (payload_type, payload) = payload
        .ok_or_else(|| GatewayError::MalformedEnvelope("missing payload part".to_string()))?;
    if parts != 2 {
        return Err(GatewayError::MalformedEnvelope(format!(
            "expected exactly two multipart parts, got {parts}"
        )));
    }

    Ok(DecodedMultipart {
        header,
        payload_type,
        payload,
    })
}

/// Serialize a composed response as a two-part multipart body.
/// Returns the Content-Type (with boundary) and the body bytes.
pub fn encode(response: &ComposedResponse) -> Result<(String, Vec<u8>), GatewayError> {
    let boundary = Uuid::new_v4().to_string();
    let header_json = serde_json::to_string(&response.header)
        .map_err(|e| GatewayError::Internal(format!("response header serialization: {e}")))?;

    let mut body = Vec::new();
    write_part(
        &mut body,
        &boundary,
        PART_HEADER,
        "application/json",
        header_json.as_bytes(),
    );
    // The multipart transport always carries the raw body (backend
    // payload or rejection reason); it is only dropped when empty.
    if !response.body.is_empty() {
        write_part(
            &mut body,
            &boundary,
            PART_PAYLOAD,
            &response.body_type,
            response.body.as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let content_type = format!("multipart/form-data; boundary={boundary}");
    Ok((content_type, body))
}

fn write_part(out: &mut Vec<u8>, boundary: &str, name: &str, content_type: &str, data: &[u8]) {
    out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    out.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
    );
    out.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
}

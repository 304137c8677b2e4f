//! Canonical envelope: typed header plus typed payload.
//!
//! # Responsibilities
//! - Parse the payload part's Content-Type header into mime type + charset
//! - Normalize binary payloads to base64 with a forced octet-stream type
//! - Hold the decoded header for the rest of the pipeline
//!
//! # Design Decisions
//! - Construction is total: malformed content-type segments fall back to
//!   defaults, they never fail the exchange
//! - Text payloads are carried as strings, everything else as base64, so
//!   the compound message forwarded to the backend is always valid JSON

use base64::Engine;
use serde::Serialize;

use crate::message::model::ProtocolMessage;

pub const TYPE_JSON: &str = "application/json";
pub const TYPE_LD_JSON: &str = "application/ld+json";
pub const TYPE_TEXT: &str = "text/plain";
pub const TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Process default charset.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// One inbound request in canonical form. Constructed once by a transport
/// decoder, then read-only for the validator, identity bridge and
/// dispatcher.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub header: ProtocolMessage,
    /// Never empty; forced to `application/octet-stream` for non-text
    /// payloads.
    pub payload_type: String,
    pub charset: String,
    /// Text payloads verbatim, binary payloads base64-encoded.
    pub payload: String,
}

impl Envelope {
    /// Build an envelope from a decoded header, the payload part's
    /// Content-Type header (if any) and the raw payload bytes.
    pub fn new(header: ProtocolMessage, content_type: Option<&str>, body: &[u8]) -> Self {
        let (mut payload_type, charset) = parse_content_type(content_type);

        let payload = match payload_type.as_str() {
            TYPE_TEXT | TYPE_JSON | TYPE_LD_JSON => {
                // Charset is recorded as declared; decoding itself is
                // lossy UTF-8.
                String::from_utf8_lossy(body).into_owned()
            }
            _ => {
                payload_type = TYPE_OCTET_STREAM.to_string();
                base64::engine::general_purpose::STANDARD.encode(body)
            }
        };

        Self {
            header,
            payload_type,
            charset,
            payload,
        }
    }
}

/// Split a Content-Type header into `(mime type, charset)`.
///
/// Segments are `;`-separated: one segment is the bare type, a second
/// segment may carry `charset=<cs>`. Anything with more segments is
/// treated as `text/plain`. A missing header means octet-stream.
pub fn parse_content_type(header: Option<&str>) -> (String, String) {
    let Some(header) = header else {
        return (TYPE_OCTET_STREAM.to_string(), DEFAULT_CHARSET.to_string());
    };

    let parts: Vec<&str> = header.split(';').collect();
    match parts.len() {
        1 => (parts[0].trim().to_string(), DEFAULT_CHARSET.to_string()),
        2 => {
            let mime = parts[0].trim().to_string();
            let charset_input: Vec<&str> = parts[1].split('=').collect();
            if charset_input.len() == 2 {
                let charset = charset_input[1].trim().to_string();
                tracing::debug!(charset = %charset, "using charset from Content-Type header");
                (mime, charset)
            } else {
                (mime, DEFAULT_CHARSET.to_string())
            }
        }
        _ => (TYPE_TEXT.to_string(), DEFAULT_CHARSET.to_string()),
    }
}

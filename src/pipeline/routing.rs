//! Routing metadata derivation.
//!
//! # Responsibilities
//! - Hold the target resource coordinates (pid, id, pagination) for one
//!   exchange
//! - Derive the backend method and path from the message kind
//! - Synthesize routing from the tunnel transport's side-channel hints
//!
//! # Design Decisions
//! - Built by pure functions of the transport input, never by mutating
//!   headers in place, so it is independently testable
//! - Discarded after the backend dispatch; nothing downstream sees it

use std::collections::HashMap;

use axum::http::Method;

use crate::error::GatewayError;
use crate::message::ProtocolMessage;

/// Side-channel hint keys delivered by the tunnel layer. The tunnel
/// transport has no URL, so these stand in for path and query.
pub const HINT_PID: &str = "pid";
pub const HINT_ID: &str = "id";
pub const HINT_PAGE: &str = "page";
pub const HINT_SIZE: &str = "size";
pub const HINT_SORT: &str = "sort";
pub const HINT_CONTENT_TYPE: &str = "content-type";

/// Target resource coordinates for one exchange.
#[derive(Debug, Clone, Default)]
pub struct RoutingMetadata {
    /// Process id the request addresses.
    pub pid: String,
    /// Record id for point queries.
    pub id: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    /// Sort direction forwarded to the backend. The tunnel decoder only
    /// ever sets "desc" here, see [`RoutingMetadata::from_hints`].
    pub sort: Option<String>,
}

impl RoutingMetadata {
    pub fn for_process(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            ..Self::default()
        }
    }

    /// Synthesize routing from tunnel side-channel headers.
    ///
    /// An explicit `id` hint wins over pagination. The `sort` hint only
    /// toggles a hard-coded "desc": the requested direction is dropped.
    /// Legacy behavior carried over as-is, see DESIGN.md.
    pub fn from_hints(hints: &HashMap<String, String>) -> Self {
        Self {
            pid: hints.get(HINT_PID).cloned().unwrap_or_default(),
            id: hints.get(HINT_ID).cloned(),
            page: hints.get(HINT_PAGE).cloned(),
            size: hints.get(HINT_SIZE).cloned(),
            sort: hints.get(HINT_SORT).map(|_| "desc".to_string()),
        }
    }

    /// Backend method and resource path for this exchange.
    ///
    /// Response kinds have no backend route; the validator rejects them
    /// before this is reached.
    pub fn backend_target(
        &self,
        header: &ProtocolMessage,
    ) -> Result<(Method, String), GatewayError> {
        match header {
            ProtocolMessage::CreateProcessRequest(_) => {
                Ok((Method::POST, format!("/process/{}", self.pid)))
            }
            ProtocolMessage::LogRequest(_) => {
                Ok((Method::POST, format!("/messages/log/{}", self.pid)))
            }
            ProtocolMessage::QueryRequest(_) => Ok((Method::GET, self.query_path())),
            other => Err(GatewayError::Internal(format!(
                "no backend route for message kind {}",
                other.kind()
            ))),
        }
    }

    /// Query path: `base/id` when an id is present, paginated listing
    /// otherwise. Pagination defaults to page=1; size and sort pass
    /// through unvalidated.
    fn query_path(&self) -> String {
        let base = format!("/messages/{}", self.pid);
        if let Some(id) = &self.id {
            return format!("{base}/{id}");
        }

        let mut path = match &self.page {
            Some(page) => format!("{base}?page={page}"),
            None => format!("{base}?page=1"),
        };
        if let Some(size) = &self.size {
            path.push_str(&format!("&size={size}"));
        }
        if let Some(sort) = &self.sort {
            path.push_str(&format!("&sort={sort}"));
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::model::RequestHeader;

    fn query_header() -> ProtocolMessage {
        ProtocolMessage::QueryRequest(RequestHeader::new("urn:conn:a", "urn:agent:a"))
    }

    fn hints(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_id_hint_wins_over_pagination() {
        let routing =
            RoutingMetadata::from_hints(&hints(&[("pid", "p1"), ("id", "doc7"), ("page", "3")]));
        let (method, path) = routing.backend_target(&query_header()).unwrap();
        assert_eq!(method, Method::GET);
        assert_eq!(path, "/messages/p1/doc7");
    }

    #[test]
    fn test_pagination_defaults_to_page_one() {
        let routing = RoutingMetadata::from_hints(&hints(&[("pid", "p1")]));
        let (_, path) = routing.backend_target(&query_header()).unwrap();
        assert_eq!(path, "/messages/p1?page=1");
    }

    #[test]
    fn test_page_and_size_pass_through() {
        let routing =
            RoutingMetadata::from_hints(&hints(&[("pid", "p1"), ("page", "4"), ("size", "25")]));
        let (_, path) = routing.backend_target(&query_header()).unwrap();
        assert_eq!(path, "/messages/p1?page=4&size=25");
    }

    #[test]
    fn test_sort_hint_only_toggles_hardcoded_desc() {
        let routing = RoutingMetadata::from_hints(&hints(&[("pid", "p1"), ("sort", "asc")]));
        let (_, path) = routing.backend_target(&query_header()).unwrap();
        // The requested direction ("asc") is intentionally dropped.
        assert_eq!(path, "/messages/p1?page=1&sort=desc");
    }

    #[test]
    fn test_creation_routes() {
        let routing = RoutingMetadata::for_process("p1");
        let header =
            ProtocolMessage::CreateProcessRequest(RequestHeader::new("urn:conn:a", "urn:agent:a"));
        assert_eq!(
            routing.backend_target(&header).unwrap(),
            (Method::POST, "/process/p1".to_string())
        );

        let header = ProtocolMessage::LogRequest(RequestHeader::new("urn:conn:a", "urn:agent:a"));
        assert_eq!(
            routing.backend_target(&header).unwrap(),
            (Method::POST, "/messages/log/p1".to_string())
        );
    }

    #[test]
    fn test_response_kind_has_no_backend_route() {
        let routing = RoutingMetadata::for_process("p1");
        let json = serde_json::json!({
            "messageType": "Accepted",
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
        assert!(routing.backend_target(&header).is_err());
    }
}

//! Backend dispatcher: the single outbound HTTP call per exchange.
//!
//! # Responsibilities
//! - Build the backend request from routing metadata and the envelope
//! - Attach the service token as a bearer credential
//! - Enforce a bounded timeout on the call
//! - Capture status code and response body for the composer
//!
//! # Design Decisions
//! - No internal retry: log-append is not idempotent, duplicates on the
//!   backend are worse than a 500 the caller may retry
//! - Timeout and connect failures collapse into BackendUnavailable

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::config::schema::BackendConfig;
use crate::error::GatewayError;
use crate::message::Envelope;
use crate::pipeline::identity::ServiceToken;

/// Cap on buffered backend response bodies.
const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Outcome of one backend call.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub status: u16,
    pub body: String,
    /// Content-Type the backend declared for its body, if any.
    pub content_type: Option<String>,
}

pub struct BackendDispatcher {
    client: Client<HttpConnector, Body>,
    base_url: String,
    timeout: Duration,
}

impl BackendDispatcher {
    pub fn new(config: &BackendConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Issue the backend call. Returns the numeric status and buffered
    /// body; non-2xx statuses are NOT errors here, the composer maps
    /// them.
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        envelope: &Envelope,
        token: &ServiceToken,
    ) -> Result<BackendReply, GatewayError> {
        let uri: Uri = format!("{}{}", self.base_url, path)
            .parse()
            .map_err(|e| GatewayError::Internal(format!("bad backend uri: {e}")))?;

        tracing::debug!(method = %method, uri = %uri, "dispatching to backend");

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.bearer()),
            );

        // Queries carry their parameters in the path; only creation-style
        // calls ship the envelope payload.
        let body = if method == Method::GET {
            Body::empty()
        } else {
            builder = builder.header(header::CONTENT_TYPE, envelope.payload_type.clone());
            Body::from(envelope.payload.clone())
        };

        let request = builder
            .body(body)
            .map_err(|e| GatewayError::Internal(format!("backend request build failed: {e}")))?;

        let response = match tokio::time::timeout(self.timeout, self.client.request(request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                return Err(GatewayError::BackendUnavailable(e.to_string()));
            }
            Err(_) => {
                return Err(GatewayError::BackendUnavailable(format!(
                    "timeout after {:?}",
                    self.timeout
                )));
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| GatewayError::BackendUnavailable(format!("body read failed: {e}")))?;

        Ok(BackendReply {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            content_type,
        })
    }
}

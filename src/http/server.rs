//! HTTP server setup and multipart endpoint handlers.
//!
//! # Responsibilities
//! - Create the Axum router with the three multipart endpoints
//! - Wire up middleware (tracing, request timeout)
//! - Decode requests, run the pipeline, encode responses
//! - Answer transport-natively when no protocol header could be decoded
//!
//! # Design Decisions
//! - One pipeline invocation per request; the runtime provides the
//!   worker-per-exchange concurrency model
//! - Decode failures answer with plain HTTP 400: there is no header to
//!   correlate a protocol rejection with

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::message::Envelope;
use crate::pipeline::routing::RoutingMetadata;
use crate::pipeline::Pipeline;
use crate::transport::multipart;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// HTTP server for the multipart transport.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let state = AppState {
            pipeline: Arc::new(Pipeline::new(&config)),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/process/{pid}", post(create_process))
            .route("/messages/log/{pid}", post(append_log))
            .route("/messages/query/{pid}", post(query_process))
            .route("/messages/query/{pid}/{id}", post(query_record))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[derive(Debug, Default, Deserialize)]
struct QueryParams {
    page: Option<String>,
    size: Option<String>,
    sort: Option<String>,
}

async fn create_process(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle_exchange(state, RoutingMetadata::for_process(pid), headers, body).await
}

async fn append_log(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle_exchange(state, RoutingMetadata::for_process(pid), headers, body).await
}

async fn query_process(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    Query(params): Query<QueryParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut routing = RoutingMetadata::for_process(pid);
    routing.page = params.page;
    routing.size = params.size;
    routing.sort = params.sort;
    handle_exchange(state, routing, headers, body).await
}

async fn query_record(
    State(state): State<AppState>,
    Path((pid, id)): Path<(String, String)>,
    Query(params): Query<QueryParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut routing = RoutingMetadata::for_process(pid);
    routing.id = Some(id);
    routing.page = params.page;
    routing.size = params.size;
    routing.sort = params.sort;
    handle_exchange(state, routing, headers, body).await
}

/// Shared handler body: decode, run the pipeline, encode.
async fn handle_exchange(
    state: AppState,
    routing: RoutingMetadata,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return (StatusCode::BAD_REQUEST, "expected multipart request").into_response();
    };

    let decoded = match multipart::decode(content_type, body).await {
        Ok(decoded) => decoded,
        Err(error) => {
            // No header was decoded, so no protocol rejection can be
            // correlated. Transport-native error instead.
            tracing::warn!(error = %error, "multipart decode failed");
            return (StatusCode::BAD_REQUEST, error.public_reason()).into_response();
        }
    };

    let envelope = Envelope::new(
        decoded.header,
        decoded.payload_type.as_deref(),
        &decoded.payload,
    );

    let composed = state.pipeline.run(envelope, routing).await;

    match multipart::encode(&composed) {
        Ok((content_type, bytes)) => {
            let status = StatusCode::from_u16(composed.status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "response encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}

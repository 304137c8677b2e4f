//! The per-exchange translation pipeline.
//!
//! # Data Flow
//! ```text
//! transport decoder → (Envelope, RoutingMetadata)
//!     → validate.rs   (structural invariants)
//!     → identity.rs   (caller token → service token)
//!     → dispatch.rs   (one backend HTTP call)
//!     → respond.rs    (status → response kind, correlation)
//!     → transport encoder
//!
//! any failure after decode
//!     → reject.rs     (correlated Rejected response)
//! ```
//!
//! # Design Decisions
//! - The original request header is captured before any stage that can
//!   fail; correlation never depends on later stages
//! - One pipeline invocation per exchange, no shared mutable state;
//!   configuration is immutable behind Arc

pub mod dispatch;
pub mod identity;
pub mod reject;
pub mod respond;
pub mod routing;
pub mod validate;

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::message::Envelope;
use crate::pipeline::dispatch::{BackendDispatcher, BackendReply};
use crate::pipeline::identity::IdentityBridge;
use crate::pipeline::reject::ExceptionComposer;
use crate::pipeline::respond::{ComposedResponse, ResponseComposer};
use crate::pipeline::routing::RoutingMetadata;
use crate::transport::tunnel::{self, TunnelExchange, TunnelResponse};

use crate::error::GatewayError;

/// All pipeline stages wired to one configuration. Cheap to share via
/// Arc; every exchange runs through the same instance.
pub struct Pipeline {
    identity: Arc<IdentityBridge>,
    dispatcher: BackendDispatcher,
    composer: ResponseComposer,
}

impl Pipeline {
    pub fn new(config: &GatewayConfig) -> Self {
        let identity = Arc::new(IdentityBridge::new(
            config.identity.clone(),
            config.trust.clone(),
        ));
        Self {
            dispatcher: BackendDispatcher::new(&config.backend),
            composer: ResponseComposer::new(config.identity.clone(), identity.clone()),
            identity,
        }
    }

    /// Run one decoded exchange to a composed response. Never fails:
    /// stage errors become correlated rejections.
    pub async fn run(&self, envelope: Envelope, routing: RoutingMetadata) -> ComposedResponse {
        // Captured before any fallible stage; this is what every
        // response correlates with.
        let original = envelope.header.clone();

        tracing::debug!(
            kind = original.kind(),
            correlation_id = original.id(),
            pid = %routing.pid,
            "exchange entering pipeline"
        );

        match self.execute(&envelope, &routing).await {
            Ok(reply) => self.composer.compose(reply, &original),
            Err(error) => ExceptionComposer::reject(&self.composer, &error, &original),
        }
    }

    /// The fallible stages: Validating → Authenticating → Dispatching.
    async fn execute(
        &self,
        envelope: &Envelope,
        routing: &RoutingMetadata,
    ) -> Result<BackendReply, GatewayError> {
        validate::validate(envelope, routing)?;
        let token = self.identity.authenticate(&envelope.header)?;
        let (method, path) = routing.backend_target(&envelope.header)?;
        self.dispatcher
            .dispatch(method, &path, envelope, &token)
            .await
    }

    /// Entry point for the tunnel transport. The tunnel layer has
    /// already authenticated the connection and decoded the header
    /// message; decoding here cannot fail, so every outcome is a
    /// correlated protocol response.
    pub async fn handle_tunnel(&self, exchange: TunnelExchange) -> TunnelResponse {
        let (envelope, routing) = tunnel::decode(exchange);
        let composed = self.run(envelope, routing).await;
        tunnel::encode(&composed)
    }
}

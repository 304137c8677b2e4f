//! Protocol-bridging gateway for data-provenance logging.
//!
//! Accepts structured logging/query requests over HTTP multipart and a
//! mutually-authenticated tunnel transport, translates them into a
//! canonical envelope, authenticates the caller, forwards to the
//! backend logging API and re-encodes the outcome per transport.

pub mod config;
pub mod error;
pub mod http;
pub mod message;
pub mod pipeline;
pub mod transport;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use message::{Envelope, ProtocolMessage};
pub use pipeline::Pipeline;
pub use transport::tunnel::{TunnelExchange, TunnelResponse};

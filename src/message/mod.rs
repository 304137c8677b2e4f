//! Canonical protocol message subsystem.
//!
//! # Data Flow
//! ```text
//! transport bytes
//!     → model.rs (closed set of request/response kinds)
//!     → envelope.rs (typed payload + content-type normalization)
//!     → pipeline (validation, identity, dispatch)
//! ```
//!
//! # Design Decisions
//! - Message kinds are a single internally tagged enum; composers match
//!   exhaustively so the status table stays total by construction
//! - Envelope construction never fails: malformed content-type headers
//!   fall back to defaults instead of erroring

pub mod envelope;
pub mod model;

pub use envelope::Envelope;
pub use model::{ProtocolMessage, RequestHeader, ResponseHeader, SecurityToken};

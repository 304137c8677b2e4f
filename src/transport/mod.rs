//! Transport adapters.
//!
//! # Data Flow
//! ```text
//! HTTP multipart request ─┐
//!                         ├─→ (Envelope, RoutingMetadata) → pipeline
//! tunnel exchange ────────┘
//!
//! pipeline → ComposedResponse ─┬─→ multipart.rs (two-part body)
//!                              └─→ tunnel.rs (header + body frame)
//! ```
//!
//! # Design Decisions
//! - Decoders do nothing but translate; no validation beyond "is this
//!   a well-formed envelope"
//! - Encoders are mirrors of the decoders and share their part names

pub mod multipart;
pub mod tunnel;

/// Multipart part name carrying the serialized protocol header.
pub const PART_HEADER: &str = "header";
/// Multipart part name carrying the payload.
pub const PART_PAYLOAD: &str = "payload";

//! HTTP multipart transport surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout + trace layers)
//!     → transport::multipart (decode two-part body)
//!     → pipeline (validate, authenticate, dispatch, compose)
//!     → transport::multipart (encode two-part response)
//! ```

pub mod server;

pub use server::HttpServer;

//! HTTP surface of the service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, layers, state)
//!     → middleware.rs (request instrumentation, outermost)
//!     → handlers.rs / apps::handlers (route handling)
//!     → response (returned unmodified by instrumentation)
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{AppState, HttpServer};

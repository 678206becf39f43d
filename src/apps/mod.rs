//! The `apps` entity and its CRUD surface.
//!
//! # Data Flow
//! ```text
//! /api/apps* request
//!     → handlers.rs (session lookup, payload validation)
//!     → store.rs (row access, filtered by owning user)
//!     → JSON response { "data": ... } | { "error": ... }
//! ```
//!
//! # Design Decisions
//! - The store sits behind the `AppStore` trait; the in-memory
//!   implementation stands in for a hosted row-level-security database and
//!   enforces the same per-user filtering at the call boundary
//! - Handlers own validation and status codes; the store stays dumb

pub mod handlers;
pub mod model;
pub mod store;

pub use model::App;
pub use store::{AppStore, MemoryAppStore};

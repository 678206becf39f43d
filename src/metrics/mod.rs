//! Metrics collection and exposition.
//!
//! # Data Flow
//! ```text
//! Every inbound request:
//!     → http/middleware.rs (method, route, status, duration)
//!     → registry.rs (counter increment + histogram observation)
//!
//! Scrape (GET /api/metrics, GET /api/apps/metrics):
//!     → registry.rs render() → text exposition payload
//! ```
//!
//! # Metrics
//! - `http_requests_total` (counter): total requests by method, route, status
//! - `http_request_duration_seconds` (histogram): latency distribution by method, route
//! - `active_users_total` (gauge): current active user count
//!
//! # Design Decisions
//! - Registry is an explicit `Arc`-shared object injected into the server
//!   state, one instance per process; never a hidden global
//! - Label sets canonicalize to one shared string key on every path
//! - In-memory only; a restart starts from an empty registry

pub mod labels;
pub mod registry;

pub use labels::LabelSet;
pub use registry::MetricsRegistry;

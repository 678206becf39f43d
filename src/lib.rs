//! FlowCraft Studio API service.
//!
//! Instrumented HTTP backend for the FlowCraft page builder: every inbound
//! request is measured by the instrumentation middleware and recorded into
//! an in-process [`metrics::MetricsRegistry`], which the scrape endpoints
//! expose as a text payload.

pub mod apps;
pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod metrics;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use metrics::{LabelSet, MetricsRegistry};

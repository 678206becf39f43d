//! Request instrumentation middleware.
//!
//! # Responsibilities
//! - Measure wall-clock duration of every request through the full
//!   downstream pipeline
//! - Record `http_requests_total` and `http_request_duration_seconds`
//!   tagged with method, route, and status code
//! - Skip excluded paths, most importantly the scrape endpoints, so that
//!   scraping metrics never generates more metrics
//!
//! # Design Decisions
//! - The response passes through untouched: no header, body, or status
//!   changes, ever
//! - Recording is best-effort; a panic inside the registry is caught and
//!   logged, never propagated into the response path

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::metrics::LabelSet;

/// Static assets and platform paths that are never instrumented.
const EXCLUDED_PREFIXES: [&str; 2] = ["/_next/static", "/_next/image"];
const EXCLUDED_EXTENSIONS: [&str; 6] = [".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Axum middleware wrapping the whole router.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    if !is_excluded(&path, &state.scrape_paths) {
        let recorded = catch_unwind(AssertUnwindSafe(|| {
            state.registry.increment_counter(
                "http_requests_total",
                &LabelSet::new()
                    .with("method", method.as_str())
                    .with("route", path.as_str())
                    .with("status_code", status.to_string()),
            );
            state.registry.observe_histogram(
                "http_request_duration_seconds",
                &LabelSet::new()
                    .with("method", method.as_str())
                    .with("route", path.as_str()),
                duration,
            );
        }));
        if recorded.is_err() {
            tracing::warn!(method = %method, path = %path, "Metrics recording failed");
        }
    }

    response
}

/// Whether a request path is excluded from instrumentation.
///
/// Pure predicate over the path: scrape endpoints (prefix match, so query
/// strings and trailing slashes are covered), platform asset paths,
/// `favicon.ico`, and static image extensions.
pub fn is_excluded(path: &str, scrape_paths: &[String]) -> bool {
    if scrape_paths.iter().any(|scrape| path.starts_with(scrape)) {
        return true;
    }
    if EXCLUDED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }
    if path == "/favicon.ico" {
        return true;
    }
    EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

//! Scrape and health handlers.

use std::panic::{catch_unwind, AssertUnwindSafe};

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::http::server::AppState;

/// Content type of the text exposition payload.
const SCRAPE_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Body returned when rendering fails; a scrape never hard-fails.
const SCRAPE_FALLBACK: &str = "# Metrics temporarily unavailable\n";

/// `GET /api/metrics` and `GET /api/apps/metrics`.
///
/// Always 200: a panic while rendering is caught here and replaced with a
/// placeholder comment body.
pub async fn scrape_metrics(State(state): State<AppState>) -> Response {
    let body = catch_unwind(AssertUnwindSafe(|| state.registry.render())).unwrap_or_else(|_| {
        tracing::error!("Metrics rendering failed");
        SCRAPE_FALLBACK.to_string()
    });

    ([(header::CONTENT_TYPE, SCRAPE_CONTENT_TYPE)], body).into_response()
}

#[derive(Serialize)]
pub struct HealthPayload {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime: f64,
}

/// `GET /api/health` — liveness payload.
pub async fn health(State(state): State<AppState>) -> Json<HealthPayload> {
    Json(HealthPayload {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        service: "flowcraft-studio",
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

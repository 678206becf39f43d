//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (instrumentation, timeout, request ID, tracing)
//! - Inject shared state (metrics registry, app store, session service)
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - The metrics registry is constructed by the caller and injected, never
//!   created here; the server holds one `Arc` to the single process-wide
//!   instance
//! - Instrumentation wraps the timeout layer, so timed-out requests are
//!   recorded with their 408 status

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::apps::{handlers as apps, AppStore, MemoryAppStore};
use crate::auth::{SessionService, StaticTokenSessions};
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::middleware::track_requests;
use crate::lifecycle::shutdown_signal;
use crate::metrics::MetricsRegistry;

/// Shared state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MetricsRegistry>,
    pub store: Arc<dyn AppStore>,
    pub sessions: Arc<dyn SessionService>,
    pub scrape_paths: Arc<[String]>,
    pub started_at: Instant,
}

/// HTTP server for the API service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new server from a validated config and the process-wide
    /// metrics registry.
    pub fn new(config: ServiceConfig, registry: Arc<MetricsRegistry>) -> Self {
        let state = AppState {
            registry,
            store: Arc::new(MemoryAppStore::new()),
            sessions: Arc::new(StaticTokenSessions::new(&config.auth)),
            scrape_paths: config.observability.scrape_paths.clone().into(),
            started_at: Instant::now(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/metrics", get(handlers::scrape_metrics))
            .route("/api/apps/metrics", get(handlers::scrape_metrics))
            .route("/api/apps", get(apps::list_apps))
            .route("/api/apps/create", post(apps::create_app))
            .route("/api/apps/{id}", get(apps::get_app))
            .route("/api/apps/{id}/update", put(apps::update_app))
            .route("/api/apps/{id}/delete", delete(apps::delete_app))
            .with_state(state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(middleware::from_fn_with_state(state, track_requests))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

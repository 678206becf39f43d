//! Shared utilities for integration testing.

use std::sync::Arc;

use tokio::net::TcpListener;

use flowcraft_api::config::ServiceConfig;
use flowcraft_api::http::HttpServer;
use flowcraft_api::metrics::MetricsRegistry;

/// Start the service on an ephemeral port.
///
/// Returns the base URL and a handle to the injected registry so tests can
/// assert against it directly.
pub async fn spawn_server(mut config: ServiceConfig) -> (String, Arc<MetricsRegistry>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let registry = Arc::new(MetricsRegistry::new());
    let server = HttpServer::new(config, registry.clone());

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    (format!("http://{}", addr), registry)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

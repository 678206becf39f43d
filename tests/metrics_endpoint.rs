//! End-to-end tests for request instrumentation and the scrape endpoints.

use flowcraft_api::config::ServiceConfig;

mod common;

#[tokio::test]
async fn fresh_scrape_serves_only_the_gauge() {
    let (base, _registry) = common::spawn_server(ServiceConfig::default()).await;
    let client = common::client();

    let res = client.get(format!("{base}/api/metrics")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let body = res.text().await.unwrap();
    assert!(body.contains("active_users_total 0"));
    assert!(!body.contains("http_requests_total"));
    assert!(!body.contains("http_request_duration_seconds"));
}

#[tokio::test]
async fn requests_are_counted_and_timed() {
    let (base, _registry) = common::spawn_server(ServiceConfig::default()).await;
    let client = common::client();

    for _ in 0..3 {
        let res = client.get(format!("{base}/api/health")).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }

    let body = client
        .get(format!("{base}/api/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(
        body.contains("http_requests_total{method:GET,route:/api/health,status_code:200} 3"),
        "unexpected scrape payload:\n{body}"
    );
    assert!(body.contains("http_request_duration_seconds_count{method:GET,route:/api/health} 3"));
    assert!(body.contains(
        "http_request_duration_seconds_bucket{le=\"+Inf\"}{method:GET,route:/api/health} 3"
    ));
}

#[tokio::test]
async fn scraping_never_records_itself() {
    let (base, _registry) = common::spawn_server(ServiceConfig::default()).await;
    let client = common::client();

    for _ in 0..5 {
        client.get(format!("{base}/api/metrics")).send().await.unwrap();
    }
    for _ in 0..2 {
        client
            .get(format!("{base}/api/apps/metrics"))
            .send()
            .await
            .unwrap();
    }

    let body = client
        .get(format!("{base}/api/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(
        !body.contains("route:/api/metrics"),
        "scrape endpoint measured itself:\n{body}"
    );
    assert!(!body.contains("route:/api/apps/metrics"));
}

#[tokio::test]
async fn unmatched_routes_are_recorded_with_their_status() {
    let (base, _registry) = common::spawn_server(ServiceConfig::default()).await;
    let client = common::client();

    let res = client.get(format!("{base}/api/nope")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let body = client
        .get(format!("{base}/api/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("http_requests_total{method:GET,route:/api/nope,status_code:404} 1"));
}

#[tokio::test]
async fn static_asset_paths_are_not_instrumented() {
    let (base, _registry) = common::spawn_server(ServiceConfig::default()).await;
    let client = common::client();

    client.get(format!("{base}/favicon.ico")).send().await.unwrap();
    client.get(format!("{base}/logo.png")).send().await.unwrap();
    client
        .get(format!("{base}/_next/static/chunks/main.js"))
        .send()
        .await
        .unwrap();

    let body = client
        .get(format!("{base}/api/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("favicon"));
    assert!(!body.contains("logo.png"));
    assert!(!body.contains("_next"));
}

#[tokio::test]
async fn both_scrape_routes_serve_the_same_registry() {
    let (base, registry) = common::spawn_server(ServiceConfig::default()).await;
    let client = common::client();

    registry.set_gauge(4.0);
    client.get(format!("{base}/api/health")).send().await.unwrap();

    let a = client
        .get(format!("{base}/api/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let b = client
        .get(format!("{base}/api/apps/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(a.contains("active_users_total 4"));
    assert!(b.contains("active_users_total 4"));
    assert!(b.contains("route:/api/health"));
}

//! End-to-end tests through the HTTP transport.

use std::net::SocketAddr;

use waypoint::cors::{ALLOW_HEADERS, ALLOW_METHODS};
use waypoint::RouterConfig;

mod common;

#[tokio::test]
async fn test_routes_served_over_http() {
    let addr: SocketAddr = "127.0.0.1:28381".parse().unwrap();
    let shutdown = common::start_server(addr, common::item_router(false), RouterConfig::default()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/items/create", addr))
        .send()
        .await
        .expect("Server unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "literal");

    let res = client
        .get(format!("http://{}/items/abc?full=1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "item:abc");

    let res = client
        .post(format!("http://{}/items", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    assert_eq!(res.text().await.unwrap(), "created");

    shutdown.trigger();
}

#[tokio::test]
async fn test_errors_over_http() {
    let addr: SocketAddr = "127.0.0.1:28382".parse().unwrap();
    let shutdown = common::start_server(addr, common::item_router(false), RouterConfig::default()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/missing/route", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");

    let res = client
        .put(format!("http://{}/items", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);
    assert_eq!(res.headers()["allow"], "GET, POST");

    let res = client
        .get(format!("http://{}/fail/anything", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    shutdown.trigger();
}

#[tokio::test]
async fn test_preflight_over_http() {
    let addr: SocketAddr = "127.0.0.1:28383".parse().unwrap();
    let shutdown = common::start_server(addr, common::item_router(true), RouterConfig::default()).await;
    let client = common::client();

    let res = client
        .request(reqwest::Method::OPTIONS, format!("http://{}/items", addr))
        .header("Origin", "http://localhost")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);
    assert_eq!(res.headers()[ALLOW_METHODS], "GET, POST");
    assert_eq!(res.headers()[ALLOW_HEADERS], "X-Foo, X-Bar");

    shutdown.trigger();
}

#[tokio::test]
async fn test_limits_over_http() {
    let addr: SocketAddr = "127.0.0.1:28384".parse().unwrap();
    let mut config = RouterConfig::default();
    config.limits.max_body_bytes = 16;
    config.limits.max_uri_length = 64;
    let shutdown = common::start_server(addr, common::item_router(false), config).await;
    let client = common::client();

    let res = client
        .post(format!("http://{}/items", addr))
        .body("x".repeat(1024))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 413);

    let res = client
        .get(format!("http://{}/items/{}", addr, "a".repeat(128)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 414);

    shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_accepting() {
    let addr: SocketAddr = "127.0.0.1:28385".parse().unwrap();
    let shutdown = common::start_server(addr, common::item_router(false), RouterConfig::default()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/items", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let res = client.get(format!("http://{}/items", addr)).send().await;
    assert!(res.is_err(), "Server should refuse connections after shutdown");
}

//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use tokio::net::TcpListener;
use waypoint::http::interceptor::{handler, interceptor, Handler, Interceptor};
use waypoint::{
    resolved_variables, ApiError, HttpServer, Reply, Request, Response, Router, RouterBuilder,
    RouterConfig, Shutdown,
};

/// Ordered log of interceptor and handler events.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// An interceptor that records `<name>-enter` and `<name>-exit` around the next handler.
pub fn recording(name: &'static str, journal: &Journal) -> Interceptor {
    let journal = journal.clone();
    interceptor(move |next: Handler| -> Handler {
        let journal = journal.clone();
        handler(move |req: &mut Request| {
            journal.lock().unwrap().push(format!("{}-enter", name));
            let result = next(req);
            journal.lock().unwrap().push(format!("{}-exit", name));
            result
        })
    })
}

/// Registers a small item API used by several tests.
pub fn item_routes(builder: &mut RouterBuilder) {
    builder
        .get("/items", |_req| Ok(Reply::text("list")))
        .unwrap()
        .require_headers(["X-Foo"]);
    builder
        .post("/items", |_req| Ok(Reply::created().with_body(
            waypoint::http::ContentType::PlainText,
            "created",
        )))
        .unwrap()
        .require_headers(["x-foo", "X-Bar"])
        .expose_headers(["Location"]);
    builder
        .get("/items/create", |_req| Ok(Reply::text("literal")))
        .unwrap();
    builder
        .get("/items/{id}", |req| {
            let id = resolved_variables(req.context())["id"].clone();
            Ok(Reply::text(format!("item:{}", id)))
        })
        .unwrap();
    builder
        .get("/fail/{kind}", |req| {
            let err = match req.variable("kind") {
                Some("missing") => ApiError::not_found("no such thing"),
                Some("denied") => ApiError::forbidden("denied"),
                _ => ApiError::internal_server_error("boom"),
            };
            Err(err.wrap().wrap())
        })
        .unwrap();
}

/// Router with the item API; CORS as requested.
pub fn item_router(cors: bool) -> Router {
    let mut builder = Router::builder();
    item_routes(&mut builder);
    if cors {
        builder.enable_cors();
    }
    builder.build()
}

pub fn send(router: &Router, method: Method, target: &str) -> Response {
    router.dispatch(method, target, HeaderMap::new(), Bytes::new())
}

pub fn send_with(
    router: &Router,
    method: Method,
    target: &str,
    headers: &[(&'static str, &'static str)],
    body: &'static str,
) -> Response {
    let mut map = HeaderMap::new();
    for &(name, value) in headers {
        map.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    router.dispatch(method, target, map, Bytes::from_static(body.as_bytes()))
}

/// Serves `router` on `addr` until the returned coordinator triggers.
pub async fn start_server(addr: SocketAddr, router: Router, config: RouterConfig) -> Shutdown {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(Arc::new(router), &config);
    let listener = TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// Client without connection pooling or system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

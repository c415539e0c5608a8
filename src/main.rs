//! waypoint demo server.
//!
//! Serves a small in-memory item API through the router.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net (TCP / TLS) ──▶ http::server (axum: request id, limits, timeout)
//!                                               │
//!                                               ▼
//!                                   routing::Router::dispatch
//!                                   ├─ matcher (literal over variable)
//!                                   ├─ OPTIONS → CORS preflight
//!                                   └─ interceptors → item handler
//!                                               │
//!     Client Response                           ▼
//!     ◀────────────── Reply / ApiError chain → Response
//! ```
//!
//! # Routes
//! - `GET /health`
//! - `GET /items`, `POST /items` (needs `x-api-key`)
//! - `GET /items/count`
//! - `GET /items/{id}`, `DELETE /items/{id}` (needs `x-api-key`)

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::header::LOCATION;
use axum::http::HeaderValue;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use waypoint::config::{load_config, RouterConfig};
use waypoint::http::middleware::{echo_cors, request_logger, require_header};
use waypoint::http::ServerError;
use waypoint::net::load_tls_config;
use waypoint::observability::{init_tracing, metrics};
use waypoint::{
    api_error, resolved_variables, wrap_error, ApiError, HttpServer, InterceptorChain,
    OrFailFast, Reply, Request, RouteError, Router, RouterBuilder, Shutdown,
};

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Demo server for the waypoint router", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => load_config(path),
        None => Ok(RouterConfig::default()),
    };
    let observability = loaded
        .as_ref()
        .map(|config| config.observability.clone())
        .unwrap_or_default();
    init_tracing(&observability)?;

    tracing::info!("waypoint v0.1.0 starting");
    let config = loaded.or_fail_fast("Failed to load configuration");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        cors_enabled = config.cors.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut builder = Router::builder();
    builder
        .apply_cors_config(&config.cors)
        .intercept(
            InterceptorChain::new()
                .with(request_logger())
                .with(echo_cors()),
        );
    register_routes(&mut builder, Arc::new(ItemStore::default()))
        .or_fail_fast("Invalid route table");
    let router = Arc::new(builder.build());

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();
    let server = HttpServer::new(router, &config);

    match &config.listener.tls {
        Some(tls) => {
            let addr: SocketAddr = config
                .listener
                .bind_address
                .parse()
                .map_err(|_| ServerError::InvalidAddress(config.listener.bind_address.clone()))?;
            let tls = load_tls_config(tls).await.map_err(ServerError::Tls)?;
            server.run_tls(addr, tls, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
struct Item {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct NewItem {
    name: String,
}

#[derive(Default)]
struct ItemStore {
    items: Mutex<BTreeMap<u64, Item>>,
    next_id: AtomicU64,
}

impl ItemStore {
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<u64, Item>>, ApiError> {
        self.items
            .lock()
            .map_err(|_| api_error!(InternalServerError, "item store is unavailable"))
    }
}

fn register_routes(builder: &mut RouterBuilder, store: Arc<ItemStore>) -> Result<(), RouteError> {
    let writes = InterceptorChain::new().with(require_header("x-api-key"));

    builder.get("/health", |_req| {
        Reply::json(&serde_json::json!({ "status": "ok" }))
    })?;

    let items = store.clone();
    builder.get("/items", move |_req| {
        let items = items.lock()?;
        let listed: Vec<&Item> = items.values().collect();
        Reply::json(&listed)
    })?;

    let items = store.clone();
    builder.get("/items/count", move |_req| {
        let count = items.lock()?.len();
        Reply::json(&serde_json::json!({ "count": count }))
    })?;

    let items = store.clone();
    builder
        .register_with(
            axum::http::Method::POST,
            "/items",
            &writes,
            move |req| create_item(&items, req),
        )?
        .require_headers(["Content-Type", "X-Api-Key"])
        .expose_headers(["Location"]);

    let items = store.clone();
    builder.get("/items/{id}", move |req| {
        let id = item_id(req)?;
        let items = items.lock()?;
        let item = items
            .get(&id)
            .ok_or_else(|| api_error!(NotFound, "item {} does not exist", id).with_code("ITEM_NOT_FOUND"))?;
        Reply::json(item)
    })?;

    let items = store;
    builder
        .register_with(
            axum::http::Method::DELETE,
            "/items/{id}",
            &writes,
            move |req| {
                let id = item_id(req)?;
                match items.lock()?.remove(&id) {
                    Some(_) => Ok(Reply::no_content()),
                    None => Err(api_error!(NotFound, "item {} does not exist", id)
                        .with_code("ITEM_NOT_FOUND")),
                }
            },
        )?
        .require_headers(["X-Api-Key"]);

    Ok(())
}

fn create_item(store: &ItemStore, req: &mut Request) -> Result<Reply, ApiError> {
    let new: NewItem = req.json().map_err(|e| wrap_error!(e))?;
    if new.name.trim().is_empty() {
        return Err(api_error!(BadRequest, "name must not be empty").with_fields(["name"]));
    }

    let id = store.next_id.fetch_add(1, Ordering::Relaxed) + 1;
    let item = Item {
        id,
        name: new.name.trim().to_string(),
    };
    store.lock()?.insert(id, item.clone());

    let location = HeaderValue::try_from(format!("/items/{}", id))
        .map_err(|e| api_error!(InternalServerError, "invalid location").with_source(e))?;
    Ok(Reply::json(&item)?
        .with_status(axum::http::StatusCode::CREATED)
        .with_header(LOCATION, location))
}

fn item_id(req: &Request) -> Result<u64, ApiError> {
    let raw = resolved_variables(req.context())
        .get("id")
        .cloned()
        .unwrap_or_default();
    raw.parse().map_err(|e| {
        api_error!(BadRequest, "'{}' is not a valid item id", raw)
            .with_code("INVALID_ID")
            .with_fields(["id"])
            .with_source(e)
    })
}

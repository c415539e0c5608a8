//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router whose fallback feeds every request to dispatch
//! - Wire up middleware (tracing, timeouts, request ID)
//! - Enforce URI and body limits through the error model
//! - Bind server to a plain or TLS listener
//! - Stop gracefully when the shutdown broadcast fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api_error;
use crate::config::{LimitsConfig, RouterConfig};
use crate::http::response::Response as DispatchResponse;
use crate::lifecycle::shutdown::wait_for;
use crate::routing::Router;

/// How long TLS connections may drain after shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Transport errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    #[error("TLS setup failed: {0}")]
    Tls(std::io::Error),
}

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub limits: LimitsConfig,
}

/// HTTP server binding a [`Router`] to a listener.
pub struct HttpServer {
    app: axum::Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `router` under `config`.
    pub fn new(router: Arc<Router>, config: &RouterConfig) -> Self {
        let state = AppState {
            router,
            limits: config.limits.clone(),
        };
        let app = Self::build_app(config, state);
        Self { app }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled Axum application.
    pub fn into_app(self) -> axum::Router {
        self.app
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on `addr`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            wait_for(shutdown).await;
            drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.app.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Converts the request, runs dispatch and writes the result.
async fn dispatch_handler(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    if target.len() > state.limits.max_uri_length {
        tracing::warn!(
            length = target.len(),
            limit = state.limits.max_uri_length,
            "Request URI too long"
        );
        let err = api_error!(UriTooLong, "request URI is too long")
            .with_code("URI_TOO_LONG")
            .with_technical(format!(
                "{} bytes exceeds the {} byte limit",
                target.len(),
                state.limits.max_uri_length
            ));
        return DispatchResponse::from_error(&err).into_response();
    }

    let body = match axum::body::to_bytes(body, state.limits.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, limit = state.limits.max_body_bytes, "Request body rejected");
            let err = api_error!(PayloadTooLarge, "request body is too large")
                .with_code("PAYLOAD_TOO_LARGE")
                .with_technical(e.to_string())
                .with_source(e);
            return DispatchResponse::from_error(&err).into_response();
        }
    };

    state
        .router
        .dispatch(parts.method, target, parts.headers, body)
        .into_response()
}

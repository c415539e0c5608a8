//! Embeddable HTTP request router.
//!
//! Routes are registered once on a [`RouterBuilder`], frozen into an
//! immutable [`Router`], and served either by calling
//! [`Router::dispatch`] directly or through [`HttpServer`].
//!
//! ```
//! use axum::body::Bytes;
//! use axum::http::{HeaderMap, Method, StatusCode};
//! use waypoint::{resolved_variables, Reply, Router};
//!
//! let mut builder = Router::builder();
//! builder
//!     .get("/items/{id}", |req| {
//!         let id = &resolved_variables(req.context())["id"];
//!         Ok(Reply::text(format!("item {}", id)))
//!     })
//!     .unwrap();
//! let router = builder.build();
//!
//! let response = router.dispatch(Method::GET, "/items/7", HeaderMap::new(), Bytes::new());
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.body, "item 7");
//! ```

pub mod config;
pub mod cors;
pub mod errors;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use cors::CorsPolicy;
pub use errors::{ApiError, ErrorKind, Trace};
pub use http::{
    cors_headers, resolved_variables, HttpServer, InterceptorChain, Reply, Request, Response,
};
pub use lifecycle::{fail_fast, OrFailFast, Shutdown};
pub use routing::{EndpointHandle, Router, RouterBuilder, RouteError};

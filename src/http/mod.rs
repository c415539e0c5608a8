//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, limits, timeout)
//!     → routing::Router::dispatch (method, target, headers, body bytes)
//!     → interceptor.rs (composed handler: interceptors around the endpoint)
//!     → request.rs (what handlers read: variables, CORS bag, body)
//!     → response.rs (Reply or error chain → status, headers, body)
//!     → Send to client
//! ```

pub mod interceptor;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use interceptor::{handler, interceptor, Handler, HandlerResult, Interceptor, InterceptorChain};
pub use request::{cors_headers, resolved_variables, PathVariables, Request, RequestContext};
pub use response::{ContentType, Reply, Response};
pub use server::{HttpServer, ServerError};

//! The immutable router and its dispatch entry point.
//!
//! # Data Flow
//! ```text
//! dispatch(method, path, headers, body)
//!     → strip query string
//!     → match_path(table)              (404 on no match)
//!     → OPTIONS?  → preflight          (204 + CORS headers, 404 if CORS off)
//!     → endpoint for method            (405 + Allow on miss)
//!     → RequestContext {pattern, variables, cors}
//!     → composed handler               (interceptors already applied)
//!     → Reply → Response | ApiError → classified error Response
//! ```
//!
//! # Design Decisions
//! - Dispatch is synchronous and never blocks; the transport awaits I/O
//! - Nothing here mutates: a `Router` can be shared across threads via `Arc`

use std::time::Instant;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};

use super::builder::RouterBuilder;
use super::error::MatchError;
use super::matcher::{match_path, RouteMatch};
use super::table::RouteTable;
use crate::api_error;
use crate::cors::{CorsHeaders, CorsPolicy};
use crate::errors::ApiError;
use crate::http::request::{Request, RequestContext};
use crate::http::response::Response;
use crate::observability::metrics;

/// Serves requests from a frozen route table.
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    cors: CorsPolicy,
}

impl Router {
    pub(crate) fn new(table: RouteTable, cors: CorsPolicy) -> Self {
        Self { table, cors }
    }

    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn cors_policy(&self) -> &CorsPolicy {
        &self.cors
    }

    /// Resolves `path` (without query string) to a route and its variables.
    pub fn lookup(&self, path: &str) -> Result<RouteMatch<'_>, MatchError> {
        match_path(&self.table, path)
    }

    /// Runs one request through matching, CORS, interceptors and the handler.
    pub fn dispatch(&self, method: Method, target: &str, headers: HeaderMap, body: Bytes) -> Response {
        let start = Instant::now();
        let (path, query) = split_target(target);

        let (response, pattern) = self.route(method.clone(), path, query, headers, body);

        tracing::debug!(
            method = %method,
            path,
            pattern = pattern.unwrap_or("none"),
            status = response.status.as_u16(),
            "Request dispatched"
        );
        metrics::record_request(
            method.as_str(),
            response.status.as_u16(),
            pattern.unwrap_or("none"),
            start,
        );
        response
    }

    fn route<'a>(
        &'a self,
        method: Method,
        path: &str,
        query: Option<&str>,
        headers: HeaderMap,
        body: Bytes,
    ) -> (Response, Option<&'a str>) {
        let found = match self.lookup(path) {
            Ok(found) => found,
            Err(err) => return (error_response(&ApiError::from(err)), None),
        };
        let pattern = found.detail.canonical();

        if method == Method::OPTIONS {
            return (self.preflight(&found), Some(pattern));
        }

        let endpoint = match found.endpoint(&method) {
            Ok(endpoint) => endpoint,
            Err(err) => {
                let allowed = found.detail.methods();
                let err = ApiError::from(err);
                return (Response::method_not_allowed(&err, allowed), Some(pattern));
            }
        };

        let cors = if self.cors.enabled {
            found.detail.cors().headers(&self.cors)
        } else {
            CorsHeaders::new()
        };
        let context = RequestContext::new(pattern, found.variables, cors);

        let mut request = Request::builder()
            .method(method)
            .path(path)
            .query(query.map(str::to_string))
            .headers(headers)
            .body(body)
            .context(context)
            .build();

        let response = match (endpoint.handler())(&mut request) {
            Ok(reply) => reply.into_response(),
            Err(err) => error_response(&with_correlation(err)),
        };
        (response, Some(pattern))
    }

    fn preflight(&self, found: &RouteMatch<'_>) -> Response {
        if !self.cors.enabled {
            let err = api_error!(NotFound, "resource not found")
                .with_code("CORS_DISABLED")
                .with_technical(format!(
                    "preflight for {} while CORS is disabled",
                    found.detail.canonical()
                ));
            return error_response(&err);
        }

        metrics::record_preflight(found.detail.canonical());
        let headers = found.detail.cors().headers(&self.cors);
        Response::no_content(headers.iter().map(|(name, value)| (*name, value.as_str())))
    }
}

/// Splits `path?query` at the first `?`.
fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Server errors get a correlation UUID so clients can quote it.
fn with_correlation(err: ApiError) -> ApiError {
    if err.status().is_server_error() && err.iter().all(|node| node.uuid().is_none()) {
        err.with_uuid()
    } else {
        err
    }
}

/// Logs the chain and renders its classified response.
fn error_response(err: &ApiError) -> Response {
    let status = err.status();
    let traces = err
        .traces()
        .iter()
        .map(|trace| trace.to_string())
        .collect::<Vec<_>>()
        .join(" <- ");

    if status.is_server_error() {
        tracing::error!(
            status = status.as_u16(),
            uuid = ?err.iter().find_map(|node| node.uuid()),
            code = err.code().unwrap_or(""),
            message = err.message(),
            technical = err.technical_message().unwrap_or(""),
            traces = %traces,
            "Request failed"
        );
    } else {
        tracing::warn!(
            status = status.as_u16(),
            code = err.code().unwrap_or(""),
            message = err.message(),
            traces = %traces,
            "Request rejected"
        );
    }
    Response::from_error(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cors::{ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN};
    use crate::http::request::resolved_variables;
    use crate::http::response::Reply;
    use axum::http::StatusCode;

    fn router(cors: bool) -> Router {
        let mut builder = Router::builder();
        builder
            .get("/items/{id}", |req| {
                let id = resolved_variables(req.context())["id"].clone();
                Ok(Reply::text(id))
            })
            .unwrap()
            .require_headers(["Authorization"]);
        builder
            .post("/items/{id}", |_req| Ok(Reply::created()))
            .unwrap();
        builder
            .get("/fail", |_req| Err(ApiError::forbidden("nope")))
            .unwrap();
        if cors {
            builder.enable_cors();
        }
        builder.build()
    }

    fn send(router: &Router, method: Method, target: &str) -> Response {
        router.dispatch(method, target, HeaderMap::new(), Bytes::new())
    }

    #[test]
    fn test_dispatch_resolves_variables() {
        let response = send(&router(false), Method::GET, "/items/abc?x=1");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "abc");
    }

    #[test]
    fn test_empty_reply_is_no_content() {
        let response = send(&router(false), Method::POST, "/items/abc");
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_unknown_route_and_method() {
        let router = router(false);
        assert_eq!(send(&router, Method::GET, "/nope").status, StatusCode::NOT_FOUND);

        let response = send(&router, Method::DELETE, "/items/1");
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header("allow"), Some("GET, POST"));
    }

    #[test]
    fn test_handler_error_is_classified() {
        let response = send(&router(false), Method::GET, "/fail");
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["message"], "nope");
        assert!(body.get("uuid").is_none());
    }

    #[test]
    fn test_server_errors_carry_correlation_id() {
        let mut builder = Router::builder();
        builder
            .get("/boom", |_req| Err(ApiError::internal_server_error("boom")))
            .unwrap();
        let response = send(&builder.build(), Method::GET, "/boom");
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert!(body["uuid"].is_string());
    }

    #[test]
    fn test_preflight() {
        let response = send(&router(true), Method::OPTIONS, "/items/1");
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert_eq!(response.header(ALLOW_ORIGIN), Some("*"));
        assert_eq!(response.header(ALLOW_METHODS), Some("GET, POST"));
        assert_eq!(response.header(ALLOW_HEADERS), Some("Authorization"));

        let response = send(&router(false), Method::OPTIONS, "/items/1");
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let response = send(&router(true), Method::OPTIONS, "/unknown");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("/a?b=c?d"), ("/a", Some("b=c?d")));
        assert_eq!(split_target("/a"), ("/a", None));
    }

    #[test]
    fn test_router_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
    }
}

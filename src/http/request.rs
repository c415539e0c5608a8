//! The request seen by handlers.
//!
//! # Responsibilities
//! - Carry method, path, query, headers and the collected body
//! - Carry the per-request value bag (resolved variables, CORS values)
//! - Typed extensions for interceptors to hand data to handlers
//!
//! # Design Decisions
//! - The value bag is a typed struct, never an untyped context lookup
//! - Lookups on a bag with nothing attached return empty maps

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Extensions, HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;

use crate::cors::CorsHeaders;
use crate::errors::{ApiError, ErrorKind, Trace};

/// Path variable name → value.
pub type PathVariables = HashMap<String, String>;

/// Values the dispatcher attaches to one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pattern: Option<String>,
    variables: PathVariables,
    cors: CorsHeaders,
}

impl RequestContext {
    pub fn new(pattern: impl Into<String>, variables: PathVariables, cors: CorsHeaders) -> Self {
        Self {
            pattern: Some(pattern.into()),
            variables,
            cors,
        }
    }

    /// Canonical pattern the request matched.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn variables(&self) -> &PathVariables {
        &self.variables
    }

    pub fn cors(&self) -> &CorsHeaders {
        &self.cors
    }
}

/// Resolved path variables of a request; empty if none were attached.
pub fn resolved_variables(ctx: &RequestContext) -> &PathVariables {
    ctx.variables()
}

/// CORS header values attached to a request; empty when CORS is disabled.
pub fn cors_headers(ctx: &RequestContext) -> &CorsHeaders {
    ctx.cors()
}

#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    context: RequestContext,
    extensions: Extensions,
}

impl Request {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// A resolved path variable by name.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.context.variables.get(name).map(String::as_str)
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// The body as UTF-8 text.
    #[track_caller]
    pub fn text(&self) -> Result<&str, ApiError> {
        let trace = Trace::caller();
        std::str::from_utf8(&self.body).map_err(|e| {
            ApiError::new_at(ErrorKind::BadRequest, "request body is not valid UTF-8", trace)
                .with_code("INVALID_UTF8")
                .with_source(e)
        })
    }

    /// Decodes a JSON body. Requires a JSON content type.
    #[track_caller]
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let trace = Trace::caller();
        let content_type = self.header(CONTENT_TYPE.as_str()).unwrap_or_default();
        if !content_type.trim_start().starts_with("application/json") {
            return Err(ApiError::new_at(
                ErrorKind::UnsupportedMediaType,
                format!("expected application/json, got '{}'", content_type),
                trace,
            )
            .with_code("UNSUPPORTED_CONTENT_TYPE"));
        }
        serde_json::from_slice(&self.body).map_err(|e| {
            ApiError::new_at(ErrorKind::BadRequest, "malformed JSON body", trace)
                .with_code("MALFORMED_JSON")
                .with_technical(e.to_string())
                .with_source(e)
        })
    }
}

/// Assembles a [`Request`]; used by the dispatcher and in tests.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    context: RequestContext,
}

impl RequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            path: self.path,
            query: self.query,
            headers: self.headers,
            body: self.body,
            context: self.context,
            extensions: Extensions::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct NewItem {
        name: String,
        price: u32,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method(Method::POST)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .build()
    }

    #[test]
    fn test_empty_context_lookups() {
        let req = Request::builder().build();
        assert!(resolved_variables(req.context()).is_empty());
        assert!(cors_headers(req.context()).is_empty());
        assert_eq!(req.context().pattern(), None);
        assert_eq!(req.variable("id"), None);
    }

    #[test]
    fn test_variables_visible_to_handler() {
        let variables = PathVariables::from([("id".to_string(), "A-7".to_string())]);
        let req = Request::builder()
            .path("/items/A-7")
            .context(RequestContext::new("/items/{v}", variables, CorsHeaders::new()))
            .build();
        assert_eq!(req.variable("id"), Some("A-7"));
        assert_eq!(req.context().pattern(), Some("/items/{v}"));
    }

    #[test]
    fn test_json_body() {
        let item: NewItem = json_request(r#"{"name":"bolt","price":3}"#).json().unwrap();
        assert_eq!(
            item,
            NewItem {
                name: "bolt".into(),
                price: 3
            }
        );
    }

    #[test]
    fn test_json_errors() {
        let err = json_request("{not json").json::<NewItem>().unwrap_err();
        assert_eq!(err.status_kind(), ErrorKind::BadRequest);
        assert_eq!(err.code(), Some("MALFORMED_JSON"));
        assert!(err.origin_of().is_some());

        let req = Request::builder().body("{}").build();
        let err = req.json::<NewItem>().unwrap_err();
        assert_eq!(err.status_kind(), ErrorKind::UnsupportedMediaType);
    }

    #[test]
    fn test_text_body() {
        let req = Request::builder().body(vec![0xff, 0xfe]).build();
        assert!(req.text().unwrap_err().is_bad_request());
        let req = Request::builder().body("hello").build();
        assert_eq!(req.text().unwrap(), "hello");
    }
}

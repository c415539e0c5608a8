//! Handler replies and the responses produced by dispatch.
//!
//! # Responsibilities
//! - `Reply`: what a handler returns on success
//! - `Response`: what dispatch hands to the transport (status, headers, body)
//! - Map error chains to JSON error responses
//!
//! # Design Decisions
//! - An empty body, or an explicit 204, is always written as 204 without a
//!   content type
//! - Error bodies never include traces

use axum::body::{Body, Bytes};
use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::errors::{ApiError, ErrorKind, Trace};
use crate::http::request::RequestContext;

/// Body content types handlers commonly produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    None,
    Json,
    Xml,
    Rtf,
    Pdf,
    Gzip,
    Http,
    MsWord,
    Html,
    Png,
    Jpeg,
    Gif,
    PlainText,
    Csv,
    TextXml,
    TextRtf,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::None => "",
            ContentType::Json => "application/json; charset=utf-8",
            ContentType::Xml => "application/xml; charset=utf-8",
            ContentType::Rtf => "application/rtf; charset=utf-8",
            ContentType::Pdf => "application/pdf",
            ContentType::Gzip => "application/gzip",
            ContentType::Http => "application/http",
            ContentType::MsWord => "application/msword",
            ContentType::Html => "text/html; charset=utf-8",
            ContentType::Png => "image/png",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Gif => "image/gif",
            ContentType::PlainText => "text/plain; charset=utf-8",
            ContentType::Csv => "text/csv; charset=utf-8",
            ContentType::TextXml => "text/xml; charset=utf-8",
            ContentType::TextRtf => "text/rtf; charset=utf-8",
        }
    }
}

/// Successful handler output.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    content_type: ContentType,
    headers: HeaderMap,
    body: Bytes,
}

impl Reply {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: ContentType::None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn created() -> Self {
        Self::new(StatusCode::CREATED)
    }

    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT)
    }

    /// 200 with a plain-text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok().with_body(ContentType::PlainText, body.into())
    }

    /// 200 with `value` encoded as JSON.
    #[track_caller]
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        let trace = Trace::caller();
        let body = serde_json::to_vec(value).map_err(|e| {
            ApiError::new_at(ErrorKind::InternalServerError, "failed to encode response", trace)
                .with_technical(e.to_string())
                .with_source(e)
        })?;
        Ok(Self::ok().with_body(ContentType::Json, body))
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_body(mut self, content_type: ContentType, body: impl Into<Bytes>) -> Self {
        self.content_type = content_type;
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds a header from strings, failing on invalid names or values.
    #[track_caller]
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, ApiError> {
        let trace = Trace::caller();
        let name = HeaderName::try_from(name).map_err(|e| {
            ApiError::new_at(
                ErrorKind::InternalServerError,
                "invalid response header name",
                trace.clone(),
            )
            .with_source(e)
        })?;
        let value = HeaderValue::try_from(value).map_err(|e| {
            ApiError::new_at(ErrorKind::InternalServerError, "invalid response header value", trace)
                .with_source(e)
        })?;
        Ok(self.with_header(name, value))
    }

    /// Echoes the CORS values the dispatcher attached to the request.
    pub fn with_cors(mut self, ctx: &RequestContext) -> Self {
        append_headers(&mut self.headers, ctx.cors().iter().map(|(k, v)| (*k, v.as_str())));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Applies the empty-body rule and produces the wire response.
    pub fn into_response(self) -> Response {
        let mut headers = self.headers;
        if self.body.is_empty() || self.status == StatusCode::NO_CONTENT {
            headers.remove(CONTENT_TYPE);
            return Response {
                status: StatusCode::NO_CONTENT,
                headers,
                body: Bytes::new(),
            };
        }
        if self.content_type != ContentType::None {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(self.content_type.as_str()),
            );
        }
        Response {
            status: self.status,
            headers,
            body: self.body,
        }
    }
}

/// Output of dispatch: status, headers and body.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    /// JSON error response for a chain.
    pub fn from_error(err: &ApiError) -> Self {
        let body = serde_json::to_vec(&err.body()).unwrap_or_else(|_| {
            br#"{"status":500,"message":"internal server error"}"#.to_vec()
        });
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(ContentType::Json.as_str()));
        Self {
            status: err.status(),
            headers,
            body: Bytes::from(body),
        }
    }

    /// Error response for a method that is not registered on a pattern.
    pub fn method_not_allowed(err: &ApiError, allowed: &[Method]) -> Self {
        let mut response = Self::from_error(err);
        let allow = allowed
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if let Ok(value) = HeaderValue::try_from(allow) {
            response.headers.insert(ALLOW, value);
        }
        response
    }

    /// Bodiless 204 with `headers`.
    pub fn no_content<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = HeaderMap::new();
        append_headers(&mut map, headers);
        Self {
            status: StatusCode::NO_CONTENT,
            headers: map,
            body: Bytes::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let mut response = axum::response::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

fn append_headers<'a, I>(target: &mut HeaderMap, headers: I)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (name, value) in headers {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                target.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid header"),
        }
    }
}

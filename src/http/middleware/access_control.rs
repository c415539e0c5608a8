//! Access control interceptor.
//! Rejects requests that lack a required header before the handler runs.

use crate::errors::ApiError;
use crate::http::interceptor::{handler, interceptor, Handler, Interceptor};
use crate::http::request::Request;

/// Context attached to requests that passed the header check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerContext {
    pub header: &'static str,
    pub value: String,
}

/// Answers 401 unless `header` is present and non-empty.
///
/// On success the value is stored as a [`CallerContext`] extension.
pub fn require_header(header: &'static str) -> Interceptor {
    interceptor(move |next: Handler| -> Handler {
        handler(move |req: &mut Request| {
            let value = match req.header(header).map(str::trim) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => {
                    tracing::warn!(header, path = req.path(), "Missing required header");
                    return Err(ApiError::unauthorized(format!("missing {} header", header))
                        .with_code("MISSING_HEADER")
                        .with_fields([header]));
                }
            };

            req.extensions_mut().insert(CallerContext { header, value });
            next(req)
        })
    })
}

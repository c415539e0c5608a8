//! Request logging interceptor.

use std::time::Instant;

use crate::http::interceptor::{handler, interceptor, Handler, Interceptor};
use crate::http::request::Request;

/// Logs every request the handler sees, with outcome and latency.
pub fn request_logger() -> Interceptor {
    interceptor(|next: Handler| -> Handler {
        handler(move |req: &mut Request| {
            let start = Instant::now();
            let result = next(req);
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

            match &result {
                Ok(reply) => tracing::info!(
                    method = %req.method(),
                    path = req.path(),
                    pattern = req.context().pattern().unwrap_or("none"),
                    status = reply.status().as_u16(),
                    elapsed_ms,
                    "Request handled"
                ),
                Err(err) => tracing::info!(
                    method = %req.method(),
                    path = req.path(),
                    pattern = req.context().pattern().unwrap_or("none"),
                    status = err.status().as_u16(),
                    error = %err,
                    elapsed_ms,
                    "Request handled with error"
                ),
            }
            result
        })
    })
}

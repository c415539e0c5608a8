//! Echoes the dispatcher's CORS values on successful replies.

use crate::http::interceptor::{handler, interceptor, Handler, Interceptor};
use crate::http::request::Request;

/// Copies the request's CORS bag onto the reply. A no-op when CORS is off.
pub fn echo_cors() -> Interceptor {
    interceptor(|next: Handler| -> Handler {
        handler(move |req: &mut Request| {
            let reply = next(req)?;
            Ok(reply.with_cors(req.context()))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cors::{CorsAggregate, CorsPolicy, ALLOW_ORIGIN};
    use crate::http::interceptor::InterceptorChain;
    use crate::http::request::RequestContext;
    use crate::http::response::Reply;
    use std::collections::HashMap;

    #[test]
    fn test_echoes_attached_headers() {
        let composed = InterceptorChain::new()
            .with(echo_cors())
            .then(handler(|_req: &mut Request| Ok(Reply::text("ok"))));

        let policy = CorsPolicy {
            enabled: true,
            ..CorsPolicy::default()
        };
        let context = RequestContext::new(
            "/a",
            HashMap::new(),
            CorsAggregate::default().headers(&policy),
        );
        let mut req = Request::builder().context(context).build();
        let reply = composed(&mut req).unwrap();
        assert_eq!(reply.headers()[ALLOW_ORIGIN], "*");

        let mut req = Request::builder().build();
        let reply = composed(&mut req).unwrap();
        assert!(reply.headers().is_empty());
    }
}

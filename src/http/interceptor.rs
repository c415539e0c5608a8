//! Handlers and interceptor (middleware) composition.
//!
//! # Design Decisions
//! - An interceptor is a function from the next handler to a new handler
//! - `[f1, f2, f3]` around `h` becomes `f1(f2(f3(h)))`: the first registered
//!   interceptor runs first on the way in and last on the way out
//! - A composed handler holds no per-request state and is shared across
//!   threads behind an `Arc`

use std::sync::Arc;

use crate::errors::ApiError;
use crate::http::request::Request;
use crate::http::response::Reply;

pub type HandlerResult = Result<Reply, ApiError>;

/// Terminal or composed request handler.
pub type Handler = Arc<dyn Fn(&mut Request) -> HandlerResult + Send + Sync>;

/// Wraps a handler into another handler.
pub type Interceptor = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// Boxes a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Request) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Boxes a closure as an [`Interceptor`].
pub fn interceptor<F>(f: F) -> Interceptor
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ordered list of interceptors.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Interceptor>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interceptor; it runs inside those already added.
    pub fn with(mut self, interceptor: Interceptor) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn push(&mut self, interceptor: Interceptor) -> &mut Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Appends every interceptor of `inner` after this chain's own.
    pub fn extend(&mut self, inner: &InterceptorChain) -> &mut Self {
        self.interceptors.extend(inner.interceptors.iter().cloned());
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Wraps `handler` with the whole chain.
    pub fn then(&self, handler: Handler) -> Handler {
        self.interceptors
            .iter()
            .rev()
            .fold(handler, |next, interceptor| interceptor(next))
    }

    /// Like [`then`](Self::then); no terminal handler composes to nothing.
    pub fn then_optional(&self, handler: Option<Handler>) -> Option<Handler> {
        handler.map(|h| self.then(h))
    }
}

impl FromIterator<Interceptor> for InterceptorChain {
    fn from_iter<T: IntoIterator<Item = Interceptor>>(iter: T) -> Self {
        Self {
            interceptors: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.interceptors.len())
            .finish()
    }
}

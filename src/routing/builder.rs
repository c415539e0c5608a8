//! Registration phase.
//!
//! # Responsibilities
//! - Compile templates and group endpoints by canonical pattern
//! - Reject configuration errors (bad templates, duplicate endpoints,
//!   mismatched variable names) as `RouteError`
//! - Accumulate per-pattern CORS aggregates and the global CORS policy
//! - Freeze everything into an immutable [`Router`]
//!
//! # Design Decisions
//! - Single-threaded: every mutation takes `&mut self`
//! - `EndpointHandle` borrows its pattern's draft, so CORS aggregates can
//!   only change before `build()`

use std::collections::{BTreeMap, HashMap};

use axum::http::Method;

use super::error::RouteError;
use super::pattern::{compile, CompiledPattern};
use super::router::Router;
use super::table::{Endpoint, RouteDetail, RouteTable};
use crate::config::CorsConfig;
use crate::cors::{CorsAggregate, CorsPolicy};
use crate::http::interceptor::{Handler, HandlerResult, InterceptorChain};
use crate::http::request::Request;

/// A pattern's state while routes are still being registered.
struct RouteDraft {
    pattern: CompiledPattern,
    endpoints: Vec<(Method, Handler)>,
    cors: CorsAggregate,
}

/// Collects routes, interceptors and CORS settings, then builds a [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    drafts: BTreeMap<String, RouteDraft>,
    cors: CorsPolicy,
    interceptors: InterceptorChain,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` on `template`.
    pub fn register<F>(
        &mut self,
        method: Method,
        template: &str,
        handler: F,
    ) -> Result<EndpointHandle<'_>, RouteError>
    where
        F: Fn(&mut Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(method, template, crate::http::interceptor::handler(handler))
    }

    /// Registers a handler wrapped by its own interceptor chain.
    pub fn register_with<F>(
        &mut self,
        method: Method,
        template: &str,
        chain: &InterceptorChain,
        handler: F,
    ) -> Result<EndpointHandle<'_>, RouteError>
    where
        F: Fn(&mut Request) -> HandlerResult + Send + Sync + 'static,
    {
        let handler = chain.then(crate::http::interceptor::handler(handler));
        self.register_handler(method, template, handler)
    }

    /// Registers an already boxed (possibly composed) handler.
    pub fn register_handler(
        &mut self,
        method: Method,
        template: &str,
        handler: Handler,
    ) -> Result<EndpointHandle<'_>, RouteError> {
        if method == Method::OPTIONS {
            return Err(RouteError::ReservedMethod { method });
        }
        let pattern = compile(template)?;
        let canonical = pattern.canonical().to_string();
        let attempted = pattern.variable_names();

        // A freshly inserted draft always passes both checks below.
        let draft = self
            .drafts
            .entry(canonical.clone())
            .or_insert_with(|| RouteDraft {
                pattern,
                endpoints: Vec::new(),
                cors: CorsAggregate::default(),
            });

        if draft.pattern.variable_names() != attempted {
            return Err(RouteError::VariableMismatch {
                pattern: canonical,
                existing: draft.pattern.variable_names(),
                attempted,
            });
        }
        if draft.endpoints.iter().any(|(m, _)| *m == method) {
            return Err(RouteError::DuplicateEndpoint {
                method,
                pattern: canonical,
            });
        }

        tracing::debug!(
            method = %method,
            template,
            pattern = %draft.pattern,
            "Route registered"
        );

        draft.cors.add_method(method.clone());
        draft.endpoints.push((method.clone(), handler));
        Ok(EndpointHandle { draft, method })
    }

    pub fn get<F>(&mut self, template: &str, handler: F) -> Result<EndpointHandle<'_>, RouteError>
    where
        F: Fn(&mut Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::GET, template, handler)
    }

    pub fn post<F>(&mut self, template: &str, handler: F) -> Result<EndpointHandle<'_>, RouteError>
    where
        F: Fn(&mut Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::POST, template, handler)
    }

    pub fn put<F>(&mut self, template: &str, handler: F) -> Result<EndpointHandle<'_>, RouteError>
    where
        F: Fn(&mut Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::PUT, template, handler)
    }

    pub fn patch<F>(&mut self, template: &str, handler: F) -> Result<EndpointHandle<'_>, RouteError>
    where
        F: Fn(&mut Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::PATCH, template, handler)
    }

    pub fn delete<F>(&mut self, template: &str, handler: F) -> Result<EndpointHandle<'_>, RouteError>
    where
        F: Fn(&mut Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::DELETE, template, handler)
    }

    /// Interceptors wrapped around every endpoint, outside per-route chains.
    pub fn intercept(&mut self, chain: InterceptorChain) -> &mut Self {
        self.interceptors.extend(&chain);
        self
    }

    /// Turns CORS handling on for every route.
    pub fn enable_cors(&mut self) -> &mut Self {
        self.cors.enabled = true;
        self
    }

    /// `Access-Control-Allow-Origin` values (default `*`).
    pub fn set_allowed_origins<I, S>(&mut self, origins: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// `Access-Control-Allow-Credentials` (default `false`).
    pub fn set_credentials_allowed(&mut self, allowed: bool) -> &mut Self {
        self.cors.allow_credentials = allowed;
        self
    }

    /// `Access-Control-Max-Age` in seconds (default `-1`, no caching).
    pub fn set_cache_duration(&mut self, seconds: i64) -> &mut Self {
        self.cors.max_age_secs = seconds;
        self
    }

    /// Replaces the global CORS policy with configured values.
    pub fn apply_cors_config(&mut self, config: &CorsConfig) -> &mut Self {
        self.cors = CorsPolicy::from(config);
        self
    }

    /// Freezes the registered routes into a [`Router`].
    pub fn build(self) -> Router {
        let interceptors = self.interceptors;
        let routes = self
            .drafts
            .into_values()
            .map(|draft| {
                let endpoints: HashMap<Method, Endpoint> = draft
                    .endpoints
                    .into_iter()
                    .map(|(method, handler)| {
                        let handler = interceptors.then(handler);
                        (method.clone(), Endpoint::new(method, handler))
                    })
                    .collect();
                RouteDetail::new(draft.pattern, endpoints, draft.cors)
            })
            .collect();

        let table = RouteTable::new(routes);
        tracing::info!(
            routes = table.len(),
            cors_enabled = self.cors.enabled,
            "Router built"
        );
        Router::new(table, self.cors)
    }
}

/// Returned by registration; declares CORS headers for its endpoint.
pub struct EndpointHandle<'a> {
    draft: &'a mut RouteDraft,
    method: Method,
}

impl<'a> EndpointHandle<'a> {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Canonical pattern the endpoint was registered under.
    pub fn pattern(&self) -> &str {
        self.draft.pattern.canonical()
    }

    /// Request headers this endpoint requires (`Access-Control-Allow-Headers`).
    pub fn require_headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.draft.cors.require_headers(headers);
        self
    }

    /// Response headers this endpoint exposes (`Access-Control-Expose-Headers`).
    pub fn expose_headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.draft.cors.expose_headers(headers);
        self
    }
}

//! The immutable route table served at request time.
//!
//! # Design Decisions
//! - Built once from the registration drafts, never mutated afterwards
//! - Routes are stored in precedence order: more literal segments first,
//!   then lexicographic canonical pattern; the matcher takes the first hit
//! - Endpoints per route are keyed by method

use std::cmp::Reverse;
use std::collections::HashMap;

use axum::http::Method;

use super::pattern::CompiledPattern;
use crate::cors::CorsAggregate;
use crate::http::interceptor::Handler;

/// A method's handler under one pattern, already wrapped by its interceptors.
#[derive(Clone)]
pub struct Endpoint {
    method: Method,
    handler: Handler,
}

impl Endpoint {
    pub(crate) fn new(method: Method, handler: Handler) -> Self {
        Self { method, handler }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Everything registered under one canonical pattern.
#[derive(Debug, Clone)]
pub struct RouteDetail {
    pattern: CompiledPattern,
    endpoints: HashMap<Method, Endpoint>,
    cors: CorsAggregate,
}

impl RouteDetail {
    pub(crate) fn new(
        pattern: CompiledPattern,
        endpoints: HashMap<Method, Endpoint>,
        cors: CorsAggregate,
    ) -> Self {
        Self {
            pattern,
            endpoints,
            cors,
        }
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn canonical(&self) -> &str {
        self.pattern.canonical()
    }

    pub fn endpoint(&self, method: &Method) -> Option<&Endpoint> {
        self.endpoints.get(method)
    }

    /// Registered methods, in registration order.
    pub fn methods(&self) -> &[Method] {
        self.cors.methods()
    }

    pub fn cors(&self) -> &CorsAggregate {
        &self.cors
    }
}

/// Canonical pattern → route detail, ordered by match precedence.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDetail>,
}

impl RouteTable {
    pub(crate) fn new(mut routes: Vec<RouteDetail>) -> Self {
        routes.sort_by(|a, b| precedence_key(a).cmp(&precedence_key(b)));
        Self { routes }
    }

    pub fn get(&self, canonical: &str) -> Option<&RouteDetail> {
        self.routes.iter().find(|r| r.canonical() == canonical)
    }

    /// Routes in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDetail> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn precedence_key(route: &RouteDetail) -> (Reverse<usize>, &str) {
    (Reverse(route.pattern.literal_count()), route.canonical())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::pattern::compile;

    fn detail(template: &str) -> RouteDetail {
        RouteDetail::new(
            compile(template).unwrap(),
            HashMap::new(),
            CorsAggregate::default(),
        )
    }

    #[test]
    fn test_precedence_order() {
        let table = RouteTable::new(vec![
            detail("/items/{id}"),
            detail("/{a}/{b}"),
            detail("/items/create"),
            detail("/{a}/x"),
            detail("/x/{b}"),
        ]);

        let order: Vec<&str> = table.iter().map(RouteDetail::canonical).collect();
        assert_eq!(
            order,
            ["/items/create", "/items/{v}", "/x/{v}", "/{v}/x", "/{v}/{v}"]
        );
    }

    #[test]
    fn test_get_by_canonical() {
        let table = RouteTable::new(vec![detail("/a"), detail("/b/{id}")]);
        assert!(table.get("/b/{v}").is_some());
        assert!(table.get("/b/{id}").is_none());
        assert_eq!(table.len(), 2);
    }
}

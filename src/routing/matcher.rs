//! Path matching against the route table.
//!
//! # Responsibilities
//! - Normalize the request path like templates (leading/trailing slash)
//! - Find the first route, in precedence order, whose segments all match
//! - Resolve variable values and the endpoint for the method
//!
//! # Design Decisions
//! - Literal segments match case-insensitively: the request segment is
//!   lower-cased before comparison, as templates were at compile time
//! - Placeholders match any non-empty segment
//! - Variable values keep the request's original spelling
//! - O(n) scan over routes (acceptable for typical route counts)

use axum::http::Method;

use super::error::MatchError;
use super::pattern::{split_path, Segment};
use super::table::{Endpoint, RouteDetail, RouteTable};
use crate::http::request::PathVariables;

/// A route resolved for a path.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub detail: &'a RouteDetail,
    pub variables: PathVariables,
}

impl<'a> RouteMatch<'a> {
    /// The endpoint for `method`, or the methods that are registered.
    pub fn endpoint(&self, method: &Method) -> Result<&'a Endpoint, MatchError> {
        self.detail
            .endpoint(method)
            .ok_or_else(|| MatchError::MethodNotAllowed {
                method: method.clone(),
                pattern: self.detail.canonical().to_string(),
                allowed: self.detail.methods().to_vec(),
            })
    }
}

/// Finds the route for `path` (query string already removed).
pub fn match_path<'a>(table: &'a RouteTable, path: &str) -> Result<RouteMatch<'a>, MatchError> {
    let parts = split_path(path);

    let detail = table
        .iter()
        .find(|route| segments_match(route.pattern().segments(), &parts))
        .ok_or_else(|| MatchError::RouteNotFound {
            path: path.to_string(),
        })?;

    let variables = detail
        .pattern()
        .bindings()
        .iter()
        .map(|binding| (binding.name.clone(), parts[binding.position].to_string()))
        .collect();

    Ok(RouteMatch { detail, variables })
}

/// True if every request segment satisfies the pattern segment at its position.
pub fn segments_match(pattern: &[Segment], parts: &[&str]) -> bool {
    pattern.len() == parts.len()
        && pattern.iter().zip(parts).all(|(segment, part)| match segment {
            Segment::Literal(literal) => *literal == part.to_lowercase(),
            Segment::Variable => !part.is_empty(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cors::CorsAggregate;
    use crate::routing::pattern::compile;
    use std::collections::HashMap;

    fn table(templates: &[&str]) -> RouteTable {
        RouteTable::new(
            templates
                .iter()
                .map(|t| RouteDetail::new(compile(t).unwrap(), HashMap::new(), CorsAggregate::default()))
                .collect(),
        )
    }

    #[test]
    fn test_literal_beats_variable() {
        for templates in [
            ["/items/{id}", "/items/create"],
            ["/items/create", "/items/{id}"],
        ] {
            let table = table(&templates);
            let found = match_path(&table, "/items/create").unwrap();
            assert_eq!(found.detail.canonical(), "/items/create");
            assert!(found.variables.is_empty());

            let found = match_path(&table, "/items/42").unwrap();
            assert_eq!(found.detail.canonical(), "/items/{v}");
            assert_eq!(found.variables["id"], "42");
        }
    }

    #[test]
    fn test_variables_keep_case_literals_do_not() {
        let table = table(&["/Users/{name}/Profile"]);
        let found = match_path(&table, "/USERS/Ada/profile/").unwrap();
        assert_eq!(found.variables["name"], "Ada");
    }

    #[test]
    fn test_segment_count_must_match() {
        let table = table(&["/a/{x}"]);
        assert!(match_path(&table, "/a").is_err());
        assert!(match_path(&table, "/a/b/c").is_err());
        assert!(matches!(
            match_path(&table, "/a//"),
            Err(MatchError::RouteNotFound { .. })
        ));
    }

    #[test]
    fn test_root() {
        let table = table(&["/"]);
        assert!(match_path(&table, "/").is_ok());
        assert!(match_path(&table, "").is_ok());
        assert!(match_path(&table, "/x").is_err());
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let mut cors = CorsAggregate::default();
        cors.add_method(Method::GET);
        cors.add_method(Method::DELETE);
        let table = RouteTable::new(vec![RouteDetail::new(
            compile("/items/{id}").unwrap(),
            HashMap::new(),
            cors,
        )]);

        let found = match_path(&table, "/items/1").unwrap();
        match found.endpoint(&Method::PUT) {
            Err(MatchError::MethodNotAllowed { allowed, .. }) => {
                assert_eq!(allowed, [Method::GET, Method::DELETE]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}

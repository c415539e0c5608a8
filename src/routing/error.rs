//! Registration and matching errors.

use axum::http::Method;
use thiserror::Error;

use crate::api_error;
use crate::errors::ApiError;

/// Configuration errors found while registering routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route template is empty")]
    EmptyRoute,

    #[error("route '{template}' has a variable segment without a name")]
    MissingVariableName { template: String },

    #[error("route '{template}' has an unterminated variable segment '{segment}'")]
    UnterminatedVariable { template: String, segment: String },

    #[error("route '{template}' has a segment '{segment}' that is not exactly '{{name}}'")]
    MalformedVariable { template: String, segment: String },

    #[error("route '{template}' declares variable '{name}' more than once")]
    DuplicateVariableName { template: String, name: String },

    #[error("route '{template}' has an empty path segment")]
    EmptySegment { template: String },

    #[error("pattern {pattern} is registered with variables {existing:?}, not {attempted:?}")]
    VariableMismatch {
        pattern: String,
        existing: Vec<String>,
        attempted: Vec<String>,
    },

    #[error("[{method}] {pattern} is already registered")]
    DuplicateEndpoint { method: Method, pattern: String },

    #[error("{method} is answered by the router and cannot be registered")]
    ReservedMethod { method: Method },
}

/// Why a request path did not resolve to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no route matches {path}")]
    RouteNotFound { path: String },

    #[error("{pattern} does not implement {method}")]
    MethodNotAllowed {
        method: Method,
        pattern: String,
        allowed: Vec<Method>,
    },
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        let message = err.to_string();
        match err {
            MatchError::RouteNotFound { .. } => api_error!(NotFound, "resource not found")
                .with_code("ROUTE_NOT_FOUND")
                .with_technical(message),
            MatchError::MethodNotAllowed { method, .. } => {
                api_error!(MethodNotAllowed, "method {} is not allowed", method)
                    .with_code("METHOD_NOT_ALLOWED")
                    .with_technical(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = RouteError::MalformedVariable {
            template: "/a/x{id}".into(),
            segment: "x{id}".into(),
        };
        assert_eq!(
            err.to_string(),
            "route '/a/x{id}' has a segment 'x{id}' that is not exactly '{name}'"
        );

        let err = RouteError::DuplicateEndpoint {
            method: Method::GET,
            pattern: "/items".into(),
        };
        assert_eq!(err.to_string(), "[GET] /items is already registered");
    }

    #[test]
    fn test_match_error_into_api_error() {
        let err: ApiError = MatchError::MethodNotAllowed {
            method: Method::PUT,
            pattern: "/items".into(),
            allowed: vec![Method::GET],
        }
        .into();
        assert!(err.is_method_not_allowed());
        assert_eq!(err.technical_message(), Some("/items does not implement PUT"));

        let err: ApiError = MatchError::RouteNotFound { path: "/nope".into() }.into();
        assert!(err.is_not_found());
        assert_eq!(err.code(), Some("ROUTE_NOT_FOUND"));
        assert_eq!(err.trace().origin_package, Some("waypoint::routing::error"));
        assert!(err.trace().origin_function.is_some());
    }
}

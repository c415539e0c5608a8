//! Request-time error model.
//!
//! # Data Flow
//! ```text
//! handler code
//!     → ApiError::not_found(..) / api_error!(NotFound, ..)   (typed node + trace)
//!     → .wrap() / wrap_error!(err)                          (one node per hop)
//!     → returned to the dispatcher
//!     → status_kind() picks the response status
//!     → traces() logged, body() written
//! ```
//!
//! # Design Decisions
//! - Configuration errors are not part of this model; they are plain
//!   `Result`s at registration time (see `routing::RouteError`)
//! - Chains are per request and never shared between requests

pub mod chain;
pub mod correlation;
pub mod kind;
pub mod trace;

pub use chain::{ApiError, Chain, ErrorBody};
pub use correlation::new_correlation_id;
pub use kind::ErrorKind;
pub use trace::Trace;

/// Creates an [`ApiError`] of the given kind with a formatted message,
/// traced with module, function and line.
///
/// ```
/// use waypoint::api_error;
///
/// let err = api_error!(NotFound, "item {} does not exist", 7);
/// assert!(err.is_not_found());
/// assert!(err.trace().origin_function.is_some());
/// ```
#[macro_export]
macro_rules! api_error {
    ($kind:ident, $($arg:tt)+) => {
        $crate::errors::ApiError::new_at(
            $crate::errors::ErrorKind::$kind,
            ::std::format!($($arg)+),
            $crate::trace_here!(),
        )
    };
}

/// Wraps an [`ApiError`] with a new fully qualified trace node, optionally
/// giving the new node a kind and message.
///
/// ```
/// use waypoint::{api_error, wrap_error};
///
/// let err = wrap_error!(api_error!(NotFound, "row missing"));
/// let err = wrap_error!(err, BadRequest, "unknown id {}", 3);
/// assert_eq!(err.traces().len(), 3);
/// ```
#[macro_export]
macro_rules! wrap_error {
    ($err:expr) => {
        $crate::errors::ApiError::wrap_at($err, $crate::trace_here!())
    };
    ($err:expr, $kind:ident, $($arg:tt)+) => {
        $crate::errors::ApiError::wrap_as_at(
            $err,
            $crate::errors::ErrorKind::$kind,
            ::std::format!($($arg)+),
            $crate::trace_here!(),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_part(id: u32) -> Result<(), ApiError> {
        Err(crate::api_error!(NotFound, "part {} missing", id).with_uuid())
    }

    fn load_assembly() -> Result<(), ApiError> {
        load_part(9).map_err(|e| crate::wrap_error!(e))
    }

    #[test]
    fn test_macros_record_function_names() {
        let err = load_assembly().unwrap_err();
        let traces = err.traces();

        assert_eq!(traces.len(), 2);
        assert!(traces[1].origin_function.unwrap().ends_with("load_part"));
        assert!(traces[0]
            .origin_function
            .unwrap()
            .contains("load_assembly"));
        assert_eq!(traces[0].origin_package, Some("waypoint::errors::tests"));
        assert_eq!(err.message(), "part 9 missing");
        assert!(err.body().uuid.is_some());
    }
}

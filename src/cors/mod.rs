//! CORS aggregation and preflight answers.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     register(method, template)      → aggregate.add_method
//!     handle.require_headers(..)      → aggregate.required_headers
//!     handle.expose_headers(..)       → aggregate.exposed_headers
//!
//! Serving:
//!     OPTIONS + known pattern → 204 + aggregate.headers(policy)   (404 if disabled)
//!     other methods           → aggregate.headers(policy) attached to the request
//! ```
//!
//! # Design Decisions
//! - Aggregates are frozen with the route table; serving never mutates them
//! - Origin, credentials and max-age are global, methods and headers per pattern

pub mod aggregate;
pub mod policy;

pub use aggregate::{CorsAggregate, CorsHeaders};
pub use policy::CorsPolicy;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
pub const MAX_AGE: &str = "Access-Control-Max-Age";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";

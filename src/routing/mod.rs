//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup, single-threaded):
//!     template
//!     → pattern.rs (compile to canonical pattern + variable bindings)
//!     → builder.rs (group by pattern, aggregate CORS, reject conflicts)
//!     → table.rs (sort by precedence, freeze)
//!     → router.rs (immutable Router)
//!
//! Incoming Request:
//!     → router.rs (dispatch)
//!     → matcher.rs (first route in precedence order whose segments match)
//!     → Return: RouteMatch or MatchError
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex: segments are literals or whole-segment placeholders
//! - Deterministic: more literal segments win, then lexicographic pattern
//! - Registration returns `Result`; aborting the process is the caller's choice

pub mod builder;
pub mod error;
pub mod matcher;
pub mod pattern;
pub mod router;
pub mod table;

pub use builder::{EndpointHandle, RouterBuilder};
pub use error::{MatchError, RouteError};
pub use matcher::RouteMatch;
pub use pattern::{compile, CompiledPattern, Segment, VariableBinding, PLACEHOLDER};
pub use router::Router;
pub use table::{Endpoint, RouteDetail, RouteTable};

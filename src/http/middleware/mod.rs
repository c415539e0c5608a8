//! Ready-made interceptors.

pub mod access_control;
pub mod cors;
pub mod trace;

pub use access_control::{require_header, CallerContext};
pub use cors::echo_cors;
pub use trace::request_logger;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Register routes → Build router
//!     any configuration error → fail_fast (log + exit 2)
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger() → broadcast → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then routes, then listeners
//! - Library code returns errors; only binaries call `fail_fast`

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{fail_fast, OrFailFast, FAIL_FAST_EXIT_CODE};

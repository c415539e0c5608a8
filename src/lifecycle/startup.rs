//! Startup failure handling.
//!
//! # Responsibilities
//! - Terminate the process on unrecoverable configuration errors
//!
//! # Design Decisions
//! - Fail fast: a router with a broken route table never serves traffic
//! - Registration APIs return `Result`; the binary decides to abort here

use std::fmt::Display;

/// Process exit status used by [`fail_fast`].
pub const FAIL_FAST_EXIT_CODE: i32 = 2;

/// Logs `message` at error level and exits the process.
pub fn fail_fast(message: impl Display) -> ! {
    tracing::error!(reason = %message, "Unrecoverable configuration error, exiting");
    eprintln!("fatal: {}", message);
    std::process::exit(FAIL_FAST_EXIT_CODE)
}

/// Unwraps a startup result or fails fast with context.
pub trait OrFailFast<T> {
    fn or_fail_fast(self, context: &str) -> T;
}

impl<T, E: Display> OrFailFast<T> for Result<T, E> {
    fn or_fail_fast(self, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => fail_fast(format_args!("{}: {}", context, err)),
        }
    }
}

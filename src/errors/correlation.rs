//! Correlation identifiers for error reports.
//!
//! UUIDs are version 4, drawn from the operating system's CSPRNG. When that
//! source fails, a time-seeded `fastrand` generator is used instead; those
//! identifiers only correlate logs and must never guard anything.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;
use uuid::{Builder, Uuid};

/// Generates a random v4 UUID.
pub fn new_correlation_id() -> Uuid {
    let mut bytes = [0u8; 16];
    if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
        tracing::warn!(error = %e, "OS random source unavailable, using seeded fallback");
        bytes = fallback_bytes(fallback_seed());
    }
    Builder::from_random_bytes(bytes).into_uuid()
}

fn fallback_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    nanos ^ (u64::from(std::process::id()) << 32)
}

fn fallback_bytes(seed: u64) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    fastrand::Rng::with_seed(seed).fill(&mut bytes);
    bytes
}

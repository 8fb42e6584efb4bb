//! Production Environment implementation using system time and RNG.
//!
//! `SystemEnv` resolves server timestamps from the system wall clock and draws
//! document and user identifiers from the OS cryptographic RNG. Behaviour is
//! non-deterministic; simulation uses a seeded environment instead.

use std::time::{SystemTime, UNIX_EPOCH};

use murmur_core::{Environment, Timestamp};

/// Production environment using the system clock and OS randomness.
///
/// # Panics
///
/// `random_bytes` panics if the OS RNG fails. Identifiers drawn from a broken
/// RNG would collide, so there is no meaningful way to continue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::disallowed_methods)]
    fn wall_clock(&self) -> Timestamp {
        // Clocks set before 1970 collapse to the epoch.
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Timestamp::new(elapsed.as_secs() as i64, elapsed.subsec_nanos())
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }
}

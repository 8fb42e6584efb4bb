//! Simulation environment with a virtual clock and a seeded RNG.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::sync::{Arc, Mutex};

use murmur_core::{Environment, Timestamp};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic environment for simulation.
///
/// The wall clock only moves when told to, so several writes can share one
/// server timestamp. Identifiers come from a ChaCha stream seeded at
/// construction. Clones share the clock and the RNG.
#[derive(Clone)]
pub struct SimEnv {
    clock: Arc<Mutex<Timestamp>>,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimEnv {
    /// Environment starting at 2024-01-01T00:00:00Z.
    pub fn with_seed(seed: u64) -> Self {
        Self::starting_at(seed, Timestamp::new(1_704_067_200, 0))
    }

    /// Environment starting at `start`.
    pub fn starting_at(seed: u64, start: Timestamp) -> Self {
        Self {
            clock: Arc::new(Mutex::new(start)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Move the wall clock forward.
    ///
    /// # Panics
    ///
    /// Panics if the clock mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn advance(&self, seconds: i64, nanos: u32) {
        let mut clock = self.clock.lock().expect("clock mutex poisoned");
        let total_nanos = clock.nanos + nanos;
        *clock = Timestamp::new(
            clock.seconds + seconds + i64::from(total_nanos / 1_000_000_000),
            total_nanos % 1_000_000_000,
        );
    }
}

impl Environment for SimEnv {
    #[allow(clippy::expect_used)]
    fn wall_clock(&self) -> Timestamp {
        *self.clock.lock().expect("clock mutex poisoned")
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().expect("rng mutex poisoned").fill_bytes(buffer);
    }
}

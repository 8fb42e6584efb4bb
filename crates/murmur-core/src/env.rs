//! Environment abstraction for deterministic testing.
//!
//! Decouples the reference collaborators from system resources (wall clock,
//! randomness). Production uses the real clock and OS entropy, simulation uses
//! a virtual clock and a seeded RNG.

use crate::model::Timestamp;

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Abstract environment providing wall-clock time and randomness.
///
/// # Invariants
///
/// - `wall_clock()` never goes backwards within one execution
/// - Given the same seed, `random_bytes()` produces the same sequence
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time. Used to resolve server timestamps.
    fn wall_clock(&self) -> Timestamp;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Random alphanumeric identifier of `len` characters.
    ///
    /// Used for document identifiers and anonymous user identifiers.
    fn random_id(&self, len: usize) -> String {
        let mut bytes = vec![0u8; len];
        self.random_bytes(&mut bytes);
        bytes
            .iter()
            .map(|b| char::from(ID_ALPHABET[usize::from(*b) % ID_ALPHABET.len()]))
            .collect()
    }
}

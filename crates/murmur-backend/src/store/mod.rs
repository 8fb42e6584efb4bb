//! Document store implementations
//!
//! Both stores are synchronous internally: a write is committed and fanned out
//! to watchers before its future resolves, so the futures they return are
//! always ready on first poll.

mod chaotic;
mod memory;

pub use chaotic::ChaoticStore;
pub use memory::MemoryStore;

/// Behaviour switches for [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Deliver a local snapshot containing each pending write (with unresolved
    /// server timestamps as `Null`) before the committed snapshot.
    pub latency_compensation: bool,
}

//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use super::{Invariant, InvariantResult, Phase, ViewSnapshot, Violation};

/// A live query is open only for a resolved identity in the ready state.
///
/// The feed activates once an identity exists and must be released whenever
/// the identity goes away or the view fails.
pub struct FeedRequiresIdentity;

impl Invariant for FeedRequiresIdentity {
    fn name(&self) -> &'static str {
        "feed_requires_identity"
    }

    fn check(&self, state: &ViewSnapshot) -> InvariantResult {
        if state.feed_open && (state.user.is_none() || state.phase != Phase::Ready) {
            let message = format!("feed open with user {:?} in phase {:?}", state.user, state.phase);
            return Err(Violation::new(self.name(), message));
        }
        Ok(())
    }
}

/// The error state holds no listeners.
pub struct ErrorReleasesListeners;

impl Invariant for ErrorReleasesListeners {
    fn name(&self) -> &'static str {
        "error_releases_listeners"
    }

    fn check(&self, state: &ViewSnapshot) -> InvariantResult {
        if state.phase == Phase::Error && (state.feed_open || state.watching_identity) {
            let message = format!(
                "error state with feed_open={} watching_identity={}",
                state.feed_open, state.watching_identity
            );
            return Err(Violation::new(self.name(), message));
        }
        Ok(())
    }
}

/// Committed messages appear in non-decreasing timestamp order.
///
/// Messages still waiting for their server timestamp are skipped; they may
/// sit anywhere in the list but must not break the order of the others.
pub struct TimestampOrder;

impl Invariant for TimestampOrder {
    fn name(&self) -> &'static str {
        "timestamp_order"
    }

    fn check(&self, state: &ViewSnapshot) -> InvariantResult {
        let stamped: Vec<_> = state.messages.iter().filter_map(|m| m.timestamp).collect();
        for window in stamped.windows(2) {
            if window[1] < window[0] {
                let message = format!("timestamp decreased {:?} → {:?}", window[0], window[1]);
                return Err(Violation::new(self.name(), message));
            }
        }
        Ok(())
    }
}

/// Phases only move forward.
///
/// `Loading` never follows another phase and `Error` is never left.
pub struct PhaseMonotonicity;

impl Invariant for PhaseMonotonicity {
    fn name(&self) -> &'static str {
        "phase_monotonicity"
    }

    fn check(&self, state: &ViewSnapshot) -> InvariantResult {
        for window in state.phase_history.windows(2) {
            let backwards = matches!(
                (window[0], window[1]),
                (Phase::Ready | Phase::Error, Phase::Loading) | (Phase::Error, Phase::Ready)
            );
            if backwards {
                let message = format!("phase went {:?} → {:?}", window[0], window[1]);
                return Err(Violation::new(self.name(), message));
            }
        }
        Ok(())
    }
}

//! View invariants.
//!
//! Each check looks at a [`ViewSnapshot`] (the observable part of a
//! [`murmur_app::ChatView`] plus the phases it has passed through) and
//! reports a [`Violation`] when a lifecycle rule is broken. The simulation
//! runtimes run the whole registry after every step, so any event sequence a
//! test or a property generator produces is checked, not only the scenarios
//! written by hand.
//!
//! ```ignore
//! let invariants = InvariantRegistry::standard();
//! invariants.check_all(&ViewSnapshot::from_view(&view))?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{ErrorReleasesListeners, FeedRequiresIdentity, PhaseMonotonicity, TimestampOrder};
pub use snapshot::{Phase, ViewSnapshot};

/// Outcome of one check.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Which check failed.
    pub invariant: &'static str,
    /// What the check saw.
    pub message: String,
}

impl Violation {
    /// Violation of `invariant` described by `message`.
    pub fn new(invariant: &'static str, message: impl Into<String>) -> Self {
        Self { invariant, message: message.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A rule over the observable view state.
pub trait Invariant: Send + Sync {
    /// Short snake_case name used in reports.
    fn name(&self) -> &'static str;

    /// Check `state`.
    fn check(&self, state: &ViewSnapshot) -> InvariantResult;
}

/// Set of invariants run together.
#[derive(Default)]
pub struct InvariantRegistry {
    checks: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every chat view invariant:
    ///
    /// - [`FeedRequiresIdentity`]
    /// - [`ErrorReleasesListeners`]
    /// - [`TimestampOrder`]
    /// - [`PhaseMonotonicity`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(FeedRequiresIdentity);
        registry.add(ErrorReleasesListeners);
        registry.add(TimestampOrder);
        registry.add(PhaseMonotonicity);
        registry
    }

    /// Register another check.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.checks.push(Box::new(invariant));
    }

    /// Names of the registered checks, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    /// Run every check. Collects all violations rather than stopping at the
    /// first.
    pub fn check_all(&self, state: &ViewSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> =
            self.checks.iter().filter_map(|check| check.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every check and panic with all violations, labelled `context`.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &ViewSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };

        let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
        panic!("invariants broken after {context}:\n  {}\n{state:#?}", report.join("\n  "));
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// No checks registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

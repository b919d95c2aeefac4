//! Confirmation of ambiguous dates.
//!
//! When a numeric date such as `05/07/2025` could be read either way and
//! confirmation is enabled, the [`DateNormalizer`](crate::dates::DateNormalizer)
//! asks a [`ConfirmationGate`] which reading is intended. The gate is an
//! injected capability: the library never talks to a terminal itself, and
//! any timeout policy belongs to the implementation.
//!
//! Closures implement the trait, which keeps tests short:
//!
//! ```
//! use metadata_validator::dates::{AmbiguousCandidates, DateNormalizer, DateOrder, PatternTable};
//! use metadata_validator::gate::GateDecision;
//!
//! let normalizer = DateNormalizer::new(PatternTable::default(), DateOrder::MonthFirst, true);
//! let european = |_: &str, _: &AmbiguousCandidates| GateDecision::Chosen(DateOrder::DayFirst);
//! let date = normalizer.normalize("05/07/2025", &european).unwrap();
//! assert_eq!(date.value, "2025-07-05");
//! ```

use crate::dates::{AmbiguousCandidates, DateOrder};

/// Answer returned by a [`ConfirmationGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The caller selected this reading.
    Chosen(DateOrder),
    /// Apply the configured default order.
    UseDefault,
    /// No decision could be obtained; the date is reported as unresolved.
    Unresolved,
}

/// Resolves the day/month order of an ambiguous date.
///
/// This is a synchronous, possibly blocking call whose latency is entirely
/// controlled by the implementation.
pub trait ConfirmationGate {
    fn resolve_ambiguous_date(&self, raw: &str, candidates: &AmbiguousCandidates)
        -> GateDecision;
}

impl<F> ConfirmationGate for F
where
    F: Fn(&str, &AmbiguousCandidates) -> GateDecision,
{
    fn resolve_ambiguous_date(
        &self,
        raw: &str,
        candidates: &AmbiguousCandidates,
    ) -> GateDecision {
        self(raw, candidates)
    }
}

/// Gate that always defers to the configured default order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOrder;

impl ConfirmationGate for DefaultOrder {
    fn resolve_ambiguous_date(&self, _raw: &str, _candidates: &AmbiguousCandidates) -> GateDecision {
        GateDecision::UseDefault
    }
}

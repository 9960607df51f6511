//! Outcome of evaluating a candidate against a rule set.

use serde::Serialize;

/// The value handed to callers in place of a rejected candidate.
pub const REJECTED_SENTINEL: &str = "";

/// Identifies the rule that rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Zero-based position of the rule in the rule set.
    pub position: usize,
    /// Name of the rule whose expectation was not met.
    pub rule: &'static str,
}

/// The outcome of running a candidate through a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    /// Every rule passed; carries the original, unmodified candidate.
    Accepted(&'a str),
    /// A rule failed; evaluation stopped there.
    Rejected(Violation),
}

impl<'a> Verdict<'a> {
    /// Returns `true` when the candidate passed every rule.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The violated rule, if the candidate was rejected.
    pub fn violation(&self) -> Option<Violation> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(v) => Some(*v),
        }
    }

    /// The string callers are allowed to use: the candidate itself when
    /// accepted, [`REJECTED_SENTINEL`] otherwise.
    pub fn as_safe_str(&self) -> &'a str {
        match self {
            Self::Accepted(candidate) => *candidate,
            Self::Rejected(_) => REJECTED_SENTINEL,
        }
    }
}

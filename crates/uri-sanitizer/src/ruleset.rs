//! Compiled, ordered rule set that decides whether a candidate link target
//! is safe.

use regex::Regex;
use tracing::debug;

use crate::rules::{Expectation, ValidationRule, RULES};
use crate::verdict::{Verdict, Violation};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while constructing a [`RuleSet`].
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("failed to compile pattern for rule '{rule}': {source}")]
    RegexCompile {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },
}

// ---------------------------------------------------------------------------
// CompiledRule
// ---------------------------------------------------------------------------

/// A [`ValidationRule`] together with its compiled regex.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: ValidationRule,
    regex: Regex,
}

impl CompiledRule {
    fn compile(rule: ValidationRule) -> Result<Self, RuleSetError> {
        let regex = Regex::new(rule.pattern).map_err(|source| RuleSetError::RegexCompile {
            rule: rule.name,
            source,
        })?;
        Ok(Self { rule, regex })
    }

    pub fn name(&self) -> &'static str {
        self.rule.name
    }

    pub fn purpose(&self) -> &'static str {
        self.rule.purpose
    }

    pub fn pattern(&self) -> &'static str {
        self.rule.pattern
    }

    pub fn expectation(&self) -> Expectation {
        self.rule.expectation
    }

    /// Whether the rule's pattern matches anywhere in `candidate`.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Whether `candidate` survives this rule on its own.
    pub fn passes(&self, candidate: &str) -> bool {
        self.rule.expectation.is_met_by(self.is_match(candidate))
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// Ordered collection of compiled rules.
///
/// A `RuleSet` is immutable once built; evaluation only reads it, so a
/// single instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile the built-in [`RULES`] catalogue.
    pub fn builtin() -> Result<Self, RuleSetError> {
        Self::compile(RULES)
    }

    /// Compile `rules`, keeping their order.
    pub fn compile(rules: &[ValidationRule]) -> Result<Self, RuleSetError> {
        let rules = rules
            .iter()
            .copied()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = rules.len(), "rule set compiled");

        Ok(Self { rules })
    }

    /// Run `candidate` through the rules in order, stopping at the first
    /// rule whose expectation is not met.
    pub fn evaluate<'a>(&self, candidate: &'a str) -> Verdict<'a> {
        for (position, rule) in self.rules.iter().enumerate() {
            if !rule.passes(candidate) {
                return Verdict::Rejected(Violation {
                    position,
                    rule: rule.name(),
                });
            }
        }
        Verdict::Accepted(candidate)
    }

    /// Iterate over the compiled rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    /// Look up a rule by name.
    pub fn get(&self, name: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// Returns the number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

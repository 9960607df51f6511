//! Validation rule catalogue.
//!
//! Contains the static, ordered list of regex rules every link target must
//! satisfy.  Each entry carries a snake_case name, a one-line purpose, the
//! regex string (compiled when a [`RuleSet`](crate::ruleset::RuleSet) is
//! built) and the [`Expectation`] a candidate has to meet to pass.
//!
//! Order matters: evaluation stops at the first rule whose expectation is
//! not met.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Expectation
// ---------------------------------------------------------------------------

/// What a rule's pattern has to do for a candidate to survive the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The pattern must match somewhere in the candidate.
    MustMatch,
    /// The pattern must not match anywhere in the candidate.
    MustNotMatch,
}

impl Expectation {
    /// Returns `true` when a pattern outcome of `matched` satisfies this
    /// expectation.
    pub fn is_met_by(self, matched: bool) -> bool {
        match self {
            Self::MustMatch => matched,
            Self::MustNotMatch => !matched,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MustMatch => write!(f, "must_match"),
            Self::MustNotMatch => write!(f, "must_not_match"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule definition
// ---------------------------------------------------------------------------

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRule {
    /// Short, snake_case identifier used in logs, audit records and verdicts.
    pub name: &'static str,
    /// One-line description shown by the rule listing.
    pub purpose: &'static str,
    /// A regex string (compiled by [`crate::ruleset::RuleSet::compile`]).
    pub pattern: &'static str,
    /// Whether a match keeps the candidate alive or condemns it.
    pub expectation: Expectation,
}

// ---------------------------------------------------------------------------
// Denylist
// ---------------------------------------------------------------------------

/// Scheme and keyword prefixes that are never acceptable at the start of a
/// link target, in the order they appear in the `denylisted_scheme` rule.
pub const DENYLISTED_PREFIXES: &[&str] = &[
    "script",
    "unsafe",
    "javascript",
    "vbscript",
    "app",
    "admin",
    "icloud-sharing",
    "icloud-vetting",
    "help",
    "aim",
    "facetime-audio",
    "applefeedback",
    "ibooks",
    "macappstore",
    "udoc",
    "ts",
    "st",
    "x-apple-helpbasic",
];

// ---------------------------------------------------------------------------
// Rule catalogue
// ---------------------------------------------------------------------------

/// The built-in rule chain, in evaluation order.
///
/// Character classes are spelled out in ASCII so that case folding of
/// non-ASCII letters cannot widen what the scheme gate accepts.
pub static RULES: &[ValidationRule] = &[
    ValidationRule {
        name: "forbidden_characters",
        purpose: "reject markup and code breaking characters",
        pattern: r#"[()\[\]{};`'"<>]"#,
        expectation: Expectation::MustNotMatch,
    },
    // A line starts after `\n`, `\r`, U+2028 or U+2029, and the leading
    // class spans line breaks, so a token at the start of any line is caught.
    // Only the tokens fold case; folding the class would stop it from
    // stripping letters such as U+017F and U+212A.
    ValidationRule {
        name: "denylisted_scheme",
        purpose: "reject dangerous scheme and keyword prefixes",
        pattern: r"(?mR)(?:^|[\x{2028}\x{2029}])[^0-9A-Za-z_]*(?i:script|unsafe|javascript|vbscript|app|admin|icloud-sharing|icloud-vetting|help|aim|facetime-audio|applefeedback|ibooks|macappstore|udoc|ts|st|x-apple-helpbasic)",
        expectation: Expectation::MustNotMatch,
    },
    // Anchored to the start of the whole candidate, not of each line.
    ValidationRule {
        name: "scheme_shape",
        purpose: "require an http(s) URL or a target without a letter-only scheme",
        pattern: r"^(?:(?i:https?:)|[^A-Za-z]|[A-Za-z+.\-]+(?:[^A-Za-z+.\-:]|$))",
        expectation: Expectation::MustMatch,
    },
    ValidationRule {
        name: "embedded_javascript",
        purpose: "reject a javascript: token anywhere in the target",
        pattern: r"(?i)javascript:",
        expectation: Expectation::MustNotMatch,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rules_compile() {
        for rule in RULES {
            regex::Regex::new(rule.pattern)
                .unwrap_or_else(|e| panic!("rule '{}' failed to compile: {e}", rule.name));
        }
    }

    #[test]
    fn names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for rule in RULES {
            assert!(seen.insert(rule.name), "duplicate rule name: {}", rule.name);
        }
    }

    #[test]
    fn catalogue_order_and_polarity() {
        let shape: Vec<(&str, Expectation)> =
            RULES.iter().map(|r| (r.name, r.expectation)).collect();
        assert_eq!(
            shape,
            vec![
                ("forbidden_characters", Expectation::MustNotMatch),
                ("denylisted_scheme", Expectation::MustNotMatch),
                ("scheme_shape", Expectation::MustMatch),
                ("embedded_javascript", Expectation::MustNotMatch),
            ]
        );
    }

    #[test]
    fn denylist_pattern_covers_every_prefix() {
        let re = regex::Regex::new(RULES[1].pattern).unwrap();
        for prefix in DENYLISTED_PREFIXES {
            assert!(re.is_match(prefix), "prefix not caught: {prefix}");
            assert!(
                re.is_match(&format!("//{}", prefix.to_uppercase())),
                "prefix not caught after non-word chars: {prefix}"
            );
        }
    }

    #[test]
    fn expectation_polarity() {
        assert!(Expectation::MustMatch.is_met_by(true));
        assert!(!Expectation::MustMatch.is_met_by(false));
        assert!(Expectation::MustNotMatch.is_met_by(false));
        assert!(!Expectation::MustNotMatch.is_met_by(true));
    }

    #[test]
    fn expectation_display() {
        assert_eq!(Expectation::MustMatch.to_string(), "must_match");
        assert_eq!(Expectation::MustNotMatch.to_string(), "must_not_match");
    }
}

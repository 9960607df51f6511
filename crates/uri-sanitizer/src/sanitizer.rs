//! High-level sanitizer that wraps a [`RuleSet`](crate::ruleset::RuleSet)
//! and turns its verdict into the string callers may use.

use std::sync::LazyLock;

use tracing::{debug, warn};

use crate::ruleset::{RuleSet, RuleSetError};
use crate::verdict::Verdict;

// ---------------------------------------------------------------------------
// UriSanitizer
// ---------------------------------------------------------------------------

/// Main entry point for link-target validation.
///
/// # Example
///
/// ```rust
/// use uri_sanitizer::UriSanitizer;
///
/// let sanitizer = UriSanitizer::new().unwrap();
/// assert_eq!(sanitizer.sanitize("https://example.com"), "https://example.com");
/// assert_eq!(sanitizer.sanitize("javascript:alert(1)"), "");
/// ```
#[derive(Debug, Clone)]
pub struct UriSanitizer {
    rules: RuleSet,
}

impl UriSanitizer {
    /// Create a sanitizer over the built-in rule set.
    pub fn new() -> Result<Self, RuleSetError> {
        Ok(Self::with_rules(RuleSet::builtin()?))
    }

    /// Create a sanitizer over an already compiled rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Returns the rule set this sanitizer evaluates.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate `candidate` and report the full verdict.
    ///
    /// Every rejection is logged at WARN with the candidate in `Debug` form,
    /// so control characters and markup reach the log escaped.
    pub fn check<'a>(&self, candidate: &'a str) -> Verdict<'a> {
        let verdict = self.rules.evaluate(candidate);

        match verdict {
            Verdict::Accepted(_) => {
                debug!(candidate = ?candidate, "link target accepted");
            }
            Verdict::Rejected(violation) => {
                warn!(
                    candidate = ?candidate,
                    rule = violation.rule,
                    position = violation.position,
                    "suspicious link target rejected"
                );
            }
        }

        verdict
    }

    /// Returns `candidate` unchanged when it is safe to use as a link
    /// target, or the empty string when it is not.
    pub fn sanitize<'a>(&self, candidate: &'a str) -> &'a str {
        self.check(candidate).as_safe_str()
    }
}

impl Default for UriSanitizer {
    /// Constructs a sanitizer over the built-in rule set.
    ///
    /// # Panics
    ///
    /// Panics if the built-in rule catalogue fails to compile (covered by
    /// the catalogue tests).
    fn default() -> Self {
        Self::new().expect("built-in rules must compile")
    }
}

// ---------------------------------------------------------------------------
// Process-wide sanitizer
// ---------------------------------------------------------------------------

static GLOBAL: LazyLock<UriSanitizer> = LazyLock::new(UriSanitizer::default);

/// Returns the process-wide sanitizer, compiling the rule set on first use.
pub fn global() -> &'static UriSanitizer {
    &GLOBAL
}

/// Sanitize `candidate` with the process-wide sanitizer.
///
/// ```rust
/// assert_eq!(uri_sanitizer::sanitize("/local/path"), "/local/path");
/// assert_eq!(uri_sanitizer::sanitize("help:something"), "");
/// ```
pub fn sanitize(candidate: &str) -> &str {
    GLOBAL.sanitize(candidate)
}

/// Like [`sanitize`] but returns the full [`Verdict`].
pub fn check(candidate: &str) -> Verdict<'_> {
    GLOBAL.check(candidate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FORBIDDEN: [char; 12] = ['(', ')', '[', ']', '{', '}', ';', '`', '\'', '"', '<', '>'];

    // -- scenarios --------------------------------------------------------

    #[test]
    fn known_scenarios() {
        let cases = [
            ("https://good.example/page", "https://good.example/page"),
            ("javascript:alert(1)", ""),
            ("ftp://files.example/x", ""),
            ("<img src=x onerror=alert(1)>", ""),
            ("help:something", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(sanitize(input), expected, "input: {input:?}");
        }
    }

    // -- rejection --------------------------------------------------------

    #[test]
    fn forbidden_characters_always_rejected() {
        let bases = ["https://example.com/", "/local/", "", "page"];
        for base in bases {
            for c in FORBIDDEN {
                let candidate = format!("{base}{c}tail");
                assert_eq!(sanitize(&candidate), "", "candidate: {candidate:?}");
            }
        }
    }

    #[test]
    fn denylisted_prefixes_rejected_in_any_case() {
        for prefix in crate::rules::DENYLISTED_PREFIXES {
            for candidate in [
                format!("{prefix}:x"),
                format!("{}:x", prefix.to_uppercase()),
                format!("  //{prefix}/x"),
            ] {
                assert_eq!(sanitize(&candidate), "", "candidate: {candidate:?}");
            }
        }
        assert_eq!(sanitize("JavaScript:alert"), "");
        assert_eq!(sanitize("VBScript:msgbox"), "");
    }

    #[test]
    fn embedded_javascript_rejected() {
        for candidate in [
            "https://a.example/?r=javascript:x",
            "/go?to=JAVASCRIPT:x",
            "data:text/html,javascript:x",
            "http://a.example/#javascript:void",
        ] {
            assert_eq!(sanitize(candidate), "", "candidate: {candidate:?}");
        }
    }

    #[test]
    fn non_http_schemes_rejected() {
        for candidate in ["mailto:a@example.com", "file:///etc/passwd", "data:,hello", "tel:+123"] {
            assert_eq!(sanitize(candidate), "", "candidate: {candidate:?}");
        }
    }

    // -- acceptance -------------------------------------------------------

    #[test]
    fn legitimate_urls_pass_unchanged() {
        for candidate in [
            "http://example.com/path?q=1",
            "https://example.com",
            "HTTP://EXAMPLE.COM/UPPER",
            "//cdn.example.com/lib.js",
            "/local/path",
            "../up/one",
            "#fragment",
            "?query=only",
            "example.com/page",
            "https://example.com/%3Cencoded%3E",
        ] {
            assert_eq!(sanitize(candidate), candidate, "candidate: {candidate:?}");
        }
    }

    #[test]
    fn accepted_value_borrows_the_input() {
        let owned = String::from("https://example.com/x");
        let out = sanitize(&owned);
        assert_eq!(out.as_ptr(), owned.as_ptr());
    }

    // -- properties -------------------------------------------------------

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            "https://good.example/page",
            "javascript:alert(1)",
            "ftp://files.example/x",
            "",
            "/local/path",
            "help:something",
            "plain words",
            "\u{0}\u{7f}\n",
            "https://a.example/\u{202e}gpj.exe",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(once), once, "input: {input:?}");
        }
    }

    #[test]
    fn verdict_agrees_with_sanitize() {
        for input in ["https://example.com", "help:x", "", "/a"] {
            let verdict = check(input);
            assert_eq!(verdict.as_safe_str(), sanitize(input));
            assert_eq!(verdict.is_accepted(), !sanitize(input).is_empty());
        }
    }

    #[test]
    fn adversarial_input_completes() {
        let long_scheme = "a".repeat(200_000);
        let long_prefix = "/".repeat(200_000);
        let mixed = "a+.-".repeat(50_000);
        let nested = format!("{}x", "http:".repeat(40_000));
        let started = std::time::Instant::now();
        for candidate in [&long_scheme, &long_prefix, &mixed, &nested] {
            let _ = sanitize(candidate);
        }
        assert!(
            started.elapsed() < std::time::Duration::from_secs(5),
            "evaluation took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn concurrent_callers_agree() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let ok = format!("https://example.com/{i}");
                    let bad = format!("javascript:{i}");
                    (sanitize(&ok) == ok, sanitize(&bad).is_empty())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), (true, true));
        }
    }

    // -- construction -----------------------------------------------------

    #[test]
    fn default_uses_builtin_rules() {
        let s = UriSanitizer::default();
        assert_eq!(s.rules().len(), crate::rules::RULES.len());
        assert!(std::ptr::eq(global(), global()));
    }
}

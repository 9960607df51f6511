//! # uri-sanitizer
//!
//! Decides whether an untrusted string is safe to use as a hyperlink target
//! and neutralizes it when it is not.
//!
//! The crate is organised around four layers:
//!
//! 1. **[`rules`]** -- static, ordered catalogue of regex rules, each with an
//!    [`Expectation`](rules::Expectation) (`MustMatch` / `MustNotMatch`).
//! 2. **[`ruleset`]** -- compiles the catalogue into a
//!    [`RuleSet`](ruleset::RuleSet) and evaluates candidates, stopping at the
//!    first rule whose expectation is not met.
//! 3. **[`sanitizer`]** -- wraps a rule set, logs rejections and returns
//!    either the untouched candidate or the empty string.
//! 4. **[`link`]** -- typed [`LinkTarget`](link::LinkTarget) for renderers.
//!
//! Rejection is a normal outcome, not an error: callers branch on whether
//! the returned string is empty.
//!
//! ## Quick start
//!
//! ```rust
//! use uri_sanitizer::{sanitize, link_target, LinkTarget};
//!
//! assert_eq!(sanitize("https://example.com/page"), "https://example.com/page");
//! assert_eq!(sanitize("javascript:alert(1)"), "");
//! assert_eq!(link_target("ftp://files.example/x"), LinkTarget::Placeholder);
//! ```

pub mod link;
pub mod rules;
pub mod ruleset;
pub mod sanitizer;
pub mod verdict;

pub use link::{link_target, LinkTarget};
pub use rules::{Expectation, ValidationRule, DENYLISTED_PREFIXES, RULES};
pub use ruleset::{CompiledRule, RuleSet, RuleSetError};
pub use sanitizer::{check, global, sanitize, UriSanitizer};
pub use verdict::{Verdict, Violation, REJECTED_SENTINEL};

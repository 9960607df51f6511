//! Link targets for renderers.
//!
//! Anything that turns untrusted data into a navigable link should go
//! through [`link_target`] and render [`LinkTarget::Placeholder`] as a
//! neutral, non-navigable element.

use serde::Serialize;

use crate::sanitizer::{self, UriSanitizer};

/// What a renderer is allowed to do with a candidate link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "href", rename_all = "snake_case")]
pub enum LinkTarget<'a> {
    /// The candidate passed every rule and may be used verbatim.
    Navigable(&'a str),
    /// The candidate was rejected; render no functional link.
    Placeholder,
}

impl<'a> LinkTarget<'a> {
    /// Classify `candidate` with `sanitizer`.
    pub fn with_sanitizer(sanitizer: &UriSanitizer, candidate: &'a str) -> Self {
        Self::from_sanitized(sanitizer.sanitize(candidate))
    }

    fn from_sanitized(sanitized: &'a str) -> Self {
        if sanitized.is_empty() {
            Self::Placeholder
        } else {
            Self::Navigable(sanitized)
        }
    }

    /// The href to emit, if any.
    pub fn href(&self) -> Option<&'a str> {
        match self {
            Self::Navigable(href) => Some(*href),
            Self::Placeholder => None,
        }
    }

    pub fn is_navigable(&self) -> bool {
        matches!(self, Self::Navigable(_))
    }
}

/// Classify `candidate` with the process-wide sanitizer.
pub fn link_target(candidate: &str) -> LinkTarget<'_> {
    LinkTarget::from_sanitized(sanitizer::sanitize(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_candidate_is_navigable() {
        let target = link_target("https://example.com/docs");
        assert!(target.is_navigable());
        assert_eq!(target.href(), Some("https://example.com/docs"));
    }

    #[test]
    fn rejected_candidate_is_placeholder() {
        for candidate in ["javascript:alert(1)", "", "aim:goim?screenname=x", "<b>"] {
            let target = link_target(candidate);
            assert_eq!(target, LinkTarget::Placeholder, "candidate: {candidate:?}");
            assert_eq!(target.href(), None);
        }
    }

    #[test]
    fn explicit_sanitizer_matches_global() {
        let s = UriSanitizer::default();
        for candidate in ["/a/b", "ftp://x", "https://x.example"] {
            assert_eq!(LinkTarget::with_sanitizer(&s, candidate), link_target(candidate));
        }
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(link_target("/a")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "navigable", "href": "/a"}));
        let json = serde_json::to_value(link_target("help:x")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "placeholder"}));
    }
}

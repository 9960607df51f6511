//! Output of the `check` and `rules` subcommands.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use audit_log::{AuditSink, AuditSource};
use uri_sanitizer::{Expectation, RuleSet, UriSanitizer, REJECTED_SENTINEL};

/// Rule name reported for input lines that are not valid UTF-8.
const INVALID_UTF8_RULE: &str = "invalid_utf8";

/// A candidate together with where it came from (`argv:1`, `stdin:4`).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub source: String,
    /// The candidate text; lossily decoded when `valid_utf8` is false.
    pub value: String,
    /// Undecodable input is rejected without reaching the sanitizer.
    pub valid_utf8: bool,
}

impl Candidate {
    pub fn new(source: String, value: String) -> Self {
        Self {
            source,
            value,
            valid_utf8: true,
        }
    }

    fn from_bytes(source: String, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(value) => Self::new(source, value),
            Err(err) => Self {
                source,
                value: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                valid_utf8: false,
            },
        }
    }
}

/// Read one candidate per line. A line that is not valid UTF-8 becomes a
/// candidate that will be rejected; it does not stop the read.
pub async fn read_candidates(mut reader: impl AsyncBufRead + Unpin) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .await
            .context("failed to read candidates")?;
        if read == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        let source = format!("stdin:{}", candidates.len() + 1);
        candidates.push(Candidate::from_bytes(source, line.clone()));
    }

    Ok(candidates)
}

/// One line of `check --json` output.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    candidate: &'a str,
    sanitized: &'a str,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'static str>,
}

/// Totals for a `check` run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub checked: usize,
    pub rejected: usize,
}

/// Sanitize every candidate, writing one output line each and queueing an
/// audit record for every rejection.
pub async fn check_all(
    sanitizer: &UriSanitizer,
    candidates: &[Candidate],
    json: bool,
    audit: Option<&AuditSink>,
    out: &mut impl Write,
) -> Result<CheckSummary> {
    let mut summary = CheckSummary::default();

    for candidate in candidates {
        summary.checked += 1;

        let (sanitized, rule) = if candidate.valid_utf8 {
            let verdict = sanitizer.check(&candidate.value);
            (verdict.as_safe_str(), verdict.violation().map(|v| v.rule))
        } else {
            warn!(source = %candidate.source, "candidate is not valid UTF-8; rejected");
            (REJECTED_SENTINEL, Some(INVALID_UTF8_RULE))
        };

        if let Some(rule) = rule {
            summary.rejected += 1;
            if let Some(audit) = audit {
                let source = AuditSource::new("link-guard").with_input(&candidate.source);
                audit.log_rejection(source, &candidate.value, rule).await;
            }
        }

        if json {
            let report = CheckReport {
                candidate: &candidate.value,
                sanitized,
                accepted: rule.is_none(),
                rule,
            };
            serde_json::to_writer(&mut *out, &report).context("failed to encode report")?;
            writeln!(out)?;
        } else {
            writeln!(out, "{sanitized}")?;
        }
    }

    Ok(summary)
}

#[derive(Debug, Serialize)]
struct RuleListing {
    position: usize,
    name: &'static str,
    expectation: Expectation,
    purpose: &'static str,
    pattern: &'static str,
}

/// Print the rule set in evaluation order.
pub fn list_rules(rules: &RuleSet, json: bool, out: &mut impl Write) -> Result<()> {
    let listing: Vec<RuleListing> = rules
        .iter()
        .enumerate()
        .map(|(position, rule)| RuleListing {
            position: position + 1,
            name: rule.name(),
            expectation: rule.expectation(),
            purpose: rule.purpose(),
            pattern: rule.pattern(),
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &listing).context("failed to encode rules")?;
        writeln!(out)?;
        return Ok(());
    }

    for rule in &listing {
        writeln!(
            out,
            "{}. {} [{}] {}\n   {}",
            rule.position, rule.name, rule.expectation, rule.purpose, rule.pattern
        )?;
    }
    Ok(())
}

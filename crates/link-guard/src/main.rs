mod cli;
mod config;
mod report;

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};

use audit_log::{AuditEntry, AuditEventType, AuditSink, AuditSource};
use uri_sanitizer::UriSanitizer;

use crate::cli::{CheckArgs, Cli, Command};
use crate::report::Candidate;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // 1. Parse CLI args.
    let cli = Cli::parse();

    // 2. Load config, then merge CLI overrides.
    let loaded = config::load(&cli.config)?;
    let config_found = loaded.is_some();
    let mut cfg = loaded.unwrap_or_default();

    if let Some(ref level) = cli.log_level {
        cfg.logging.level = level.clone();
    }
    if let Some(ref path) = cli.audit_log {
        cfg.logging.audit_log_path = Some(path.clone());
    }

    // 3. Init tracing-subscriber with JSON format on stderr; stdout carries results.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if !config_found {
        warn!(
            path = %cli.config.display(),
            "configuration file not found; using defaults"
        );
    }

    // 4. Compile the rule set.
    let sanitizer = UriSanitizer::new().context("failed to compile validation rules")?;

    match cli.command {
        Command::Rules { json } => {
            let mut out = std::io::stdout().lock();
            report::list_rules(sanitizer.rules(), json, &mut out)?;
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(args) => {
            let json = args.json || cfg.output.json;
            let strict = args.strict || cfg.output.strict;
            let candidates = collect_candidates(args).await?;

            // 5. Start the audit trail, if configured.
            let audit = match cfg.logging.audit_log_path {
                Some(ref path) => {
                    let (sink, handle) = AuditSink::start(path)
                        .await
                        .with_context(|| format!("failed to open audit log {}", path.display()))?;
                    sink.log(AuditEntry::new(
                        AuditEventType::ProcessStarted,
                        AuditSource::new("link-guard"),
                        serde_json::json!({
                            "version": env!("CARGO_PKG_VERSION"),
                            "candidates": candidates.len(),
                        }),
                    ))
                    .await;
                    Some((sink, handle))
                }
                None => None,
            };

            // 6. Sanitize.
            let summary = {
                let mut out = std::io::stdout().lock();
                let summary = report::check_all(
                    &sanitizer,
                    &candidates,
                    json,
                    audit.as_ref().map(|(sink, _)| sink),
                    &mut out,
                )
                .await?;
                out.flush()?;
                summary
            };

            info!(
                checked = summary.checked,
                rejected = summary.rejected,
                "check finished"
            );

            // 7. Close the audit trail and wait for it to reach disk.
            if let Some((sink, handle)) = audit {
                sink.log(AuditEntry::new(
                    AuditEventType::ProcessStopped,
                    AuditSource::new("link-guard"),
                    serde_json::json!({
                        "checked": summary.checked,
                        "rejected": summary.rejected,
                    }),
                ))
                .await;
                drop(sink);
                handle.await.context("audit writer task failed")?;
            }

            if strict && summary.rejected > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Candidates come from the command line, or from stdin (one per line) when
/// none were given.
async fn collect_candidates(args: CheckArgs) -> Result<Vec<Candidate>> {
    if !args.candidates.is_empty() {
        return Ok(args
            .candidates
            .into_iter()
            .enumerate()
            .map(|(i, value)| Candidate::new(format!("argv:{}", i + 1), value))
            .collect());
    }

    report::read_candidates(BufReader::new(tokio::io::stdin()))
        .await
        .context("failed to read stdin")
}

//! Append-only JSON-lines audit trail of rejected link targets.
//!
//! Each event is serialised as one newline-terminated JSON object and
//! appended to a file, producing a [JSON Lines](https://jsonlines.org/)
//! stream operators can grep, ship or replay.  Rejected candidates are
//! stored as JSON strings and are never interpreted.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use audit_log::{AuditSink, AuditSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (sink, handle) = AuditSink::start("/var/log/link-guard/audit.jsonl").await?;
//!
//! sink.log_rejection(AuditSource::new("renderer"), "javascript:alert(1)", "forbidden_characters")
//!     .await;
//!
//! drop(sink);
//! handle.await?;
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod sink;
pub mod writer;

pub use entry::{AuditEntry, AuditEventType, AuditSource, RejectionRecord};
pub use sink::AuditSink;
pub use writer::{AuditWriteError, AuditWriter};

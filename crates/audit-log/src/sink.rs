use std::path::Path;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

use crate::entry::{AuditEntry, AuditSource};
use crate::writer::{AuditWriteError, AuditWriter};

/// Channel buffer size between producers and the background writer task.
const CHANNEL_BUFFER: usize = 1024;

/// Idle time after which buffered entries are flushed.
const FLUSH_INTERVAL: Duration = Duration::from_millis(500);

/// Cloneable handle used to submit [`AuditEntry`] values to the background
/// writer.
///
/// The writer task exits after the last clone is dropped, flushing whatever
/// is still buffered. Await the [`JoinHandle`] returned by
/// [`start`](Self::start) to know the trail is on disk.
#[derive(Clone)]
pub struct AuditSink {
    tx: mpsc::Sender<AuditEntry>,
}

impl AuditSink {
    /// Open the audit file at `path` and spawn the background writer.
    ///
    /// I/O errors inside the task are logged via `tracing::error` and the
    /// affected entry is skipped; the task never panics.
    pub async fn start(
        path: impl AsRef<Path>,
    ) -> Result<(Self, JoinHandle<()>), AuditWriteError> {
        let writer = AuditWriter::new(path).await?;
        let (tx, rx) = mpsc::channel::<AuditEntry>(CHANNEL_BUFFER);

        tracing::debug!(path = %writer.path().display(), "audit trail opened");

        let handle = tokio::spawn(run_writer_loop(writer, rx));

        Ok((Self { tx }, handle))
    }

    /// Queue an entry, waiting for channel capacity if necessary.
    ///
    /// If the writer task has already exited the entry is dropped with a
    /// warning.
    pub async fn log(&self, entry: AuditEntry) {
        if let Err(err) = self.tx.send(entry).await {
            tracing::warn!(
                event_type = ?err.0.event_type,
                "audit trail closed, entry dropped"
            );
        }
    }

    /// Queue a rejection record for `candidate`.
    pub async fn log_rejection(&self, source: AuditSource, candidate: &str, rule: &str) {
        self.log(AuditEntry::rejection(source, candidate, rule)).await;
    }
}

async fn run_writer_loop(mut writer: AuditWriter, mut rx: mpsc::Receiver<AuditEntry>) {
    let mut dirty = false;

    loop {
        match timeout(FLUSH_INTERVAL, rx.recv()).await {
            Ok(Some(entry)) => match writer.write(&entry).await {
                Ok(()) => dirty = true,
                Err(err) => tracing::error!(%err, "failed to write audit entry"),
            },
            Ok(None) => {
                if dirty {
                    if let Err(err) = writer.flush().await {
                        tracing::error!(%err, "failed to flush audit trail on shutdown");
                    }
                }
                tracing::debug!("audit writer task shutting down");
                return;
            }
            Err(_) if dirty => match writer.flush().await {
                Ok(()) => dirty = false,
                Err(err) => tracing::error!(%err, "periodic audit flush failed"),
            },
            Err(_) => {}
        }
    }
}

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::entry::AuditEntry;

/// Errors that can occur during audit trail I/O.
#[derive(Debug, thiserror::Error)]
pub enum AuditWriteError {
    #[error("failed to create audit directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open audit file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize audit entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to append to audit file: {0}")]
    Write(std::io::Error),

    #[error("failed to flush audit file: {0}")]
    Flush(std::io::Error),
}

/// Buffered, append-only JSON-lines writer.
///
/// Each [`write`](Self::write) buffers exactly one newline-terminated JSON
/// object; nothing is guaranteed on disk until [`flush`](Self::flush).
pub struct AuditWriter {
    path: PathBuf,
    file: BufWriter<File>,
}

impl AuditWriter {
    /// Open (or create) the audit file at `path` in append mode, creating
    /// parent directories as needed.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, AuditWriteError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| AuditWriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| AuditWriteError::OpenFile {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file: BufWriter::new(file),
        })
    }

    /// Path of the underlying audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&mut self, entry: &AuditEntry) -> Result<(), AuditWriteError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        self.file
            .write_all(&line)
            .await
            .map_err(AuditWriteError::Write)
    }

    /// Drain the buffer and ask the OS to persist the file contents.
    pub async fn flush(&mut self) -> Result<(), AuditWriteError> {
        self.file.flush().await.map_err(AuditWriteError::Flush)?;
        self.file
            .get_ref()
            .sync_data()
            .await
            .map_err(AuditWriteError::Flush)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AuditSource;

    #[tokio::test]
    async fn writes_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/audit.jsonl");

        let mut writer = AuditWriter::new(&path).await.unwrap();
        assert_eq!(writer.path(), path.as_path());
        for rule in ["forbidden_characters", "scheme_shape"] {
            let entry = AuditEntry::rejection(AuditSource::new("test"), "x:y", rule);
            writer.write(&entry).await.unwrap();
        }
        writer.flush().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: AuditEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.rejection.unwrap().rule, "forbidden_characters");
    }

    #[tokio::test]
    async fn appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        std::fs::write(&path, "{\"existing\":true}\n").unwrap();

        let mut writer = AuditWriter::new(&path).await.unwrap();
        writer
            .write(&AuditEntry::rejection(AuditSource::new("test"), "help:x", "denylisted_scheme"))
            .await
            .unwrap();
        writer.flush().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("{\"existing\":true}\n"));
    }

    #[tokio::test]
    async fn open_failure_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let err = AuditWriter::new(dir.path()).await.err().expect("should fail");
        assert!(matches!(err, AuditWriteError::OpenFile { .. }), "unexpected: {err}");
    }
}

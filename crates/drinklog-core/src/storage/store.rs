//! Whole-document JSON persistence for the entry log.
//!
//! The file is always replaced atomically: the new document is written to a
//! uniquely named sibling temp file, synced, then renamed over the target. Readers in other
//! processes see either the old or the new document, never a partial one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::CorruptPolicy;
use crate::error::{CoreError, Result};
use crate::event_log::EventLog;

/// Load/save adapter for a single backing file.
#[derive(Debug, Clone)]
pub struct DurableStore {
    path: PathBuf,
}

impl DurableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the log from disk.
    ///
    /// A missing or whitespace-only file yields an empty log.
    ///
    /// # Errors
    /// [`CoreError::CorruptData`] if the file exists but does not parse
    /// (including bytes that are not UTF-8), [`CoreError::Io`] if it cannot
    /// be read.
    pub fn load(&self) -> Result<EventLog> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No backing file, starting empty");
                return Ok(EventLog::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(EventLog::new());
        }

        let log: EventLog = serde_json::from_slice(&content).map_err(|e| CoreError::CorruptData {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %self.path.display(), entries = log.len(), "Loaded entry log");
        Ok(log)
    }

    /// Like [`load`](Self::load), but a corrupt file is handled per `policy`.
    pub fn load_with_policy(&self, policy: CorruptPolicy) -> Result<EventLog> {
        match self.load() {
            Err(CoreError::CorruptData { path, message }) if policy == CorruptPolicy::Reset => {
                warn!(
                    path = %path.display(),
                    error = %message,
                    "Backing file is corrupt, starting from an empty log"
                );
                Ok(EventLog::new())
            }
            other => other,
        }
    }

    /// Serialize `log` and atomically replace the backing file.
    ///
    /// # Errors
    /// [`CoreError::PersistenceWrite`] on any serialization or I/O failure.
    pub fn flush_now(&self, log: &EventLog) -> Result<()> {
        self.write_atomic(log).map_err(|reason| CoreError::PersistenceWrite {
            path: self.path.clone(),
            reason,
        })?;
        debug!(path = %self.path.display(), entries = log.len(), "Flushed entry log");
        Ok(())
    }

    fn write_atomic(&self, log: &EventLog) -> Result<(), String> {
        let data = serde_json::to_vec_pretty(log).map_err(|e| e.to_string())?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;

        // Dropping the temp file on an early return removes it.
        let mut temp = NamedTempFile::new_in(parent).map_err(|e| e.to_string())?;
        temp.write_all(&data).map_err(|e| e.to_string())?;
        temp.as_file().sync_all().map_err(|e| e.to_string())?;

        // Atomic rename
        temp.persist(&self.path)
            .map(|_| ())
            .map_err(|e| e.error.to_string())
    }
}

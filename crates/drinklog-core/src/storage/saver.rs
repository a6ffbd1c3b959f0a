//! Debounced background persistence.
//!
//! Owners hand the worker immutable snapshots of the log. The worker keeps
//! only the newest one and writes it once no new snapshot has arrived for a
//! full quiescence window (trailing-edge debounce). At most one save is
//! pending at any time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use super::DurableStore;
use crate::error::{CoreError, Result};
use crate::event_log::EventLog;

/// Persistence state as seen by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SaveStatus {
    /// Disk matches the last scheduled snapshot.
    Synced,
    /// A snapshot is waiting for the debounce window to elapse.
    Pending,
    /// A flush is in progress.
    Saving,
    /// The last flush failed. The in-memory log is still authoritative.
    Failed(String),
}

enum Command {
    Save(EventLog),
    Shutdown {
        last: Option<EventLog>,
        done: oneshot::Sender<Result<()>>,
    },
}

/// Handle to the background save worker.
pub struct SaveScheduler {
    tx: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<SaveStatus>,
    flushes: Arc<AtomicU64>,
    store: DurableStore,
}

impl SaveScheduler {
    /// Start the worker. Must be called from within a tokio runtime.
    pub fn spawn(store: DurableStore, window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SaveStatus::Synced);
        let flushes = Arc::new(AtomicU64::new(0));

        let worker = SaveWorker {
            store: store.clone(),
            window,
            rx,
            status: status_tx,
            flushes: Arc::clone(&flushes),
            pending: None,
        };
        tokio::spawn(worker.run());

        Self {
            tx,
            status: status_rx,
            flushes,
            store,
        }
    }

    /// Queue `log` to be written once the debounce window passes.
    ///
    /// Supersedes any snapshot still waiting. Never blocks and never fails;
    /// write errors are reported through [`status`](Self::status).
    pub fn schedule_save(&self, log: &EventLog) {
        if self.tx.send(Command::Save(log.clone())).is_err() {
            warn!("Save worker has stopped, dropping scheduled save");
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    /// Number of flushes the worker has attempted so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Flush whatever is pending right away and stop the worker.
    ///
    /// `last`, when given, replaces any pending snapshot. Returns the result
    /// of that final flush; a worker that goes away without answering counts
    /// as a failed flush.
    pub async fn shutdown(self, last: Option<EventLog>) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        match self.tx.send(Command::Shutdown { last, done: done_tx }) {
            Ok(()) => done_rx.await.unwrap_or_else(|_| {
                Err(CoreError::PersistenceWrite {
                    path: self.store.path().to_path_buf(),
                    reason: "save worker stopped before reporting the final flush".into(),
                })
            }),
            Err(mpsc::error::SendError(Command::Shutdown { last: Some(log), .. })) => {
                warn!("Save worker already stopped, flushing on shutdown path");
                flush_blocking(self.store, log).await
            }
            Err(_) => Ok(()),
        }
    }
}

struct SaveWorker {
    store: DurableStore,
    window: Duration,
    rx: mpsc::UnboundedReceiver<Command>,
    status: watch::Sender<SaveStatus>,
    flushes: Arc<AtomicU64>,
    pending: Option<EventLog>,
}

impl SaveWorker {
    async fn run(mut self) {
        debug!(
            window_ms = self.window.as_millis() as u64,
            path = %self.store.path().display(),
            "Save worker started"
        );
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(Command::Save(log)) => {
                        self.pending = Some(log);
                        deadline = Some(Instant::now() + self.window);
                        self.status.send_replace(SaveStatus::Pending);
                    }
                    Some(Command::Shutdown { last, done }) => {
                        if last.is_some() {
                            self.pending = last;
                        }
                        let result = match self.pending.take() {
                            Some(log) => self.flush(log).await,
                            None => Ok(()),
                        };
                        let _ = done.send(result);
                        break;
                    }
                    None => {
                        if let Some(log) = self.pending.take() {
                            let _ = self.flush(log).await;
                        }
                        break;
                    }
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    if let Some(log) = self.pending.take() {
                        let _ = self.flush(log).await;
                    }
                }
            }
        }

        info!(flushes = self.flushes.load(Ordering::SeqCst), "Save worker stopped");
    }

    async fn flush(&self, log: EventLog) -> Result<()> {
        self.status.send_replace(SaveStatus::Saving);
        let result = flush_blocking(self.store.clone(), log).await;
        self.flushes.fetch_add(1, Ordering::SeqCst);

        match &result {
            Ok(()) => {
                self.status.send_replace(SaveStatus::Synced);
            }
            Err(e) => {
                error!(error = %e, "Failed to persist entry log");
                self.status.send_replace(SaveStatus::Failed(e.to_string()));
            }
        }
        result
    }
}

/// Run a flush on the blocking pool; file I/O stays off the async workers.
async fn flush_blocking(store: DurableStore, log: EventLog) -> Result<()> {
    let path = store.path().to_path_buf();
    tokio::task::spawn_blocking(move || store.flush_now(&log))
        .await
        .unwrap_or_else(|e| {
            Err(CoreError::PersistenceWrite {
                path,
                reason: format!("flush task failed: {e}"),
            })
        })
}

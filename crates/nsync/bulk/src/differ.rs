//! Streaming differ task
//!
//! The run is a small state machine:
//!
//! ```text
//! WaitingForBatch -> Classifying -> WaitingForBatch ... -> Draining -> Done
//!        \________________\_______________________________\--> Cancelled -> Done
//! ```
//!
//! Suspension points are waiting for the next input batch and waiting for a
//! consumer to accept an output batch. Each one races the cancellation token
//! with cancellation checked first, so a fired token always wins.

use crate::config::DifferConfig;
use crate::error::{DiffError, Result, StreamKind};
use crate::index::{BatchDiff, SnapshotIndex};
use nsync_types::{ExistingWorkload, Fingerprint};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a differ run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome {
    /// The input stream closed and every batch was classified
    Completed {
        /// Number of input batches processed
        batches: usize,
        /// Number of guids sent on the deleted stream
        deleted: usize,
    },

    /// The cancellation token fired; no deleted batch was sent
    Cancelled,

    /// A consumer dropped one of the output streams; no deleted batch was sent
    Aborted { stream: StreamKind },
}

/// Output side of a differ run.
///
/// All four receivers close once the run ends, whichever way it ends.
#[derive(Debug)]
pub struct DiffStreams {
    pub missing: mpsc::Receiver<Vec<Fingerprint>>,
    pub stale: mpsc::Receiver<Vec<Fingerprint>>,
    pub deleted: mpsc::Receiver<Vec<String>>,
    pub errors: mpsc::Receiver<DiffError>,
    pub handle: JoinHandle<DiffOutcome>,
}

/// Everything a differ run produced, gathered in memory
#[derive(Debug)]
pub struct DiffReport {
    pub missing: Vec<Vec<Fingerprint>>,
    pub stale: Vec<Vec<Fingerprint>>,
    pub deleted: Vec<Vec<String>>,
    pub errors: Vec<DiffError>,
    pub outcome: DiffOutcome,
}

impl DiffReport {
    pub fn missing_fingerprints(&self) -> Vec<&Fingerprint> {
        self.missing.iter().flatten().collect()
    }

    pub fn deleted_guids(&self) -> Vec<&str> {
        self.deleted.iter().flatten().map(String::as_str).collect()
    }
}

impl DiffStreams {
    /// Drain every stream until the run ends
    pub async fn collect(self) -> Result<DiffReport> {
        let DiffStreams {
            missing,
            stale,
            deleted,
            errors,
            handle,
        } = self;

        let (missing, stale, deleted, errors) = tokio::join!(
            drain(missing),
            drain(stale),
            drain(deleted),
            drain(errors)
        );

        let outcome = handle
            .await
            .map_err(|e| DiffError::TaskFailed(e.to_string()))?;

        Ok(DiffReport {
            missing,
            stale,
            deleted,
            errors,
            outcome,
        })
    }
}

async fn drain<T>(mut rx: mpsc::Receiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Some(item) = rx.recv().await {
        items.push(item);
    }
    items
}

/// Differ over one scheduler snapshot
#[derive(Debug, Clone)]
pub struct Differ {
    snapshot: Vec<ExistingWorkload>,
    config: DifferConfig,
}

impl Differ {
    pub fn new(snapshot: Vec<ExistingWorkload>) -> Self {
        Self::with_config(snapshot, DifferConfig::default())
    }

    pub fn with_config(snapshot: Vec<ExistingWorkload>, config: DifferConfig) -> Self {
        Self { snapshot, config }
    }

    /// Start diffing `desired` against the snapshot on a new tokio task.
    ///
    /// Must be called from within a tokio runtime. The run ends when
    /// `desired` closes or `cancel` fires.
    pub fn diff(
        self,
        cancel: CancellationToken,
        desired: mpsc::Receiver<Vec<Fingerprint>>,
    ) -> DiffStreams {
        let capacity = self.config.effective_capacity();
        let (missing_tx, missing) = mpsc::channel(capacity);
        let (stale_tx, stale) = mpsc::channel(capacity);
        let (deleted_tx, deleted) = mpsc::channel(1);
        let (errors_tx, errors) = mpsc::channel(1);

        let run = DiffRun {
            index: SnapshotIndex::from_snapshot(self.snapshot),
            cancel,
            desired,
            missing_tx,
            stale_tx,
            deleted_tx,
            errors_tx,
            batches: 0,
        };

        DiffStreams {
            missing,
            stale,
            deleted,
            errors,
            handle: tokio::spawn(run.run()),
        }
    }
}

enum Phase {
    WaitingForBatch,
    Classifying(Vec<Fingerprint>),
    Draining,
    Cancelled,
    Aborted(StreamKind),
    Done(DiffOutcome),
}

enum Emit {
    Sent,
    Cancelled,
    Closed,
}

struct DiffRun {
    index: SnapshotIndex,
    cancel: CancellationToken,
    desired: mpsc::Receiver<Vec<Fingerprint>>,
    missing_tx: mpsc::Sender<Vec<Fingerprint>>,
    stale_tx: mpsc::Sender<Vec<Fingerprint>>,
    deleted_tx: mpsc::Sender<Vec<String>>,
    errors_tx: mpsc::Sender<DiffError>,
    batches: usize,
}

impl DiffRun {
    async fn run(mut self) -> DiffOutcome {
        info!(existing = self.index.remaining(), "Diff starting");

        let mut phase = Phase::WaitingForBatch;
        let outcome = loop {
            phase = match phase {
                Phase::WaitingForBatch => self.next_batch().await,
                Phase::Classifying(batch) => self.classify(batch).await,
                Phase::Draining => self.drain().await,
                Phase::Cancelled => {
                    info!(batches = self.batches, "Diff cancelled");
                    Phase::Done(DiffOutcome::Cancelled)
                }
                Phase::Aborted(stream) => {
                    warn!(%stream, batches = self.batches, "Diff consumer went away");
                    if let Err(e) = self.errors_tx.try_send(DiffError::ConsumerClosed { stream }) {
                        debug!(error = %e, "Could not report consumer loss");
                    }
                    Phase::Done(DiffOutcome::Aborted { stream })
                }
                Phase::Done(outcome) => break outcome,
            };
        };

        info!(?outcome, "Diff finished");
        outcome
    }

    async fn next_batch(&mut self) -> Phase {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Phase::Cancelled,
            batch = self.desired.recv() => match batch {
                Some(batch) => Phase::Classifying(batch),
                None => Phase::Draining,
            },
        }
    }

    async fn classify(&mut self, batch: Vec<Fingerprint>) -> Phase {
        let BatchDiff { missing, stale } = self.index.classify(batch);
        self.batches += 1;

        match emit(&self.cancel, &self.missing_tx, missing).await {
            Emit::Sent => {}
            Emit::Cancelled => return Phase::Cancelled,
            Emit::Closed => return Phase::Aborted(StreamKind::Missing),
        }

        match emit(&self.cancel, &self.stale_tx, stale).await {
            Emit::Sent => Phase::WaitingForBatch,
            Emit::Cancelled => Phase::Cancelled,
            Emit::Closed => Phase::Aborted(StreamKind::Stale),
        }
    }

    async fn drain(&mut self) -> Phase {
        let deleted = std::mem::take(&mut self.index).into_deleted();
        let count = deleted.len();

        if deleted.is_empty() {
            return Phase::Done(DiffOutcome::Completed {
                batches: self.batches,
                deleted: 0,
            });
        }

        match emit(&self.cancel, &self.deleted_tx, deleted).await {
            Emit::Sent => Phase::Done(DiffOutcome::Completed {
                batches: self.batches,
                deleted: count,
            }),
            Emit::Cancelled => Phase::Cancelled,
            Emit::Closed => Phase::Aborted(StreamKind::Deleted),
        }
    }
}

async fn emit<T>(cancel: &CancellationToken, tx: &mpsc::Sender<T>, value: T) -> Emit {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Emit::Cancelled,
        sent = tx.send(value) => match sent {
            Ok(()) => Emit::Sent,
            Err(_) => Emit::Closed,
        },
    }
}

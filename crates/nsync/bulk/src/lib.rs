//! nsync Bulk Differ
//!
//! Classifies pages of desired-app fingerprints from the upstream catalog
//! against a snapshot of the LRPs the scheduler already runs.
//!
//! ## Outputs
//!
//! - **missing**: desired, unknown to the scheduler (create)
//! - **stale**: desired and known, but the version token differs (update)
//! - **deleted**: known to the scheduler, never named by the catalog (remove)
//!
//! The differ runs as a single tokio task. Each input batch yields exactly
//! one missing batch and one stale batch, in input order, even when empty.
//! The deleted batch is sent at most once, after the input stream closes,
//! and never after cancellation.
//!
//! ## Usage
//!
//! ```no_run
//! use nsync_bulk::Differ;
//! use nsync_types::{ExistingWorkload, Fingerprint};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = vec![ExistingWorkload::new("guid-a", "etag-1")];
//! let (desired_tx, desired_rx) = mpsc::channel(1);
//!
//! let streams = Differ::new(snapshot).diff(CancellationToken::new(), desired_rx);
//!
//! desired_tx.send(vec![Fingerprint::new("guid-b", "etag-1")]).await?;
//! drop(desired_tx);
//!
//! let report = streams.collect().await?;
//! assert_eq!(report.missing_fingerprints().len(), 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod differ;
pub mod error;
pub mod index;

pub use config::DifferConfig;
pub use differ::{DiffOutcome, DiffReport, DiffStreams, Differ};
pub use error::{DiffError, Result, StreamKind};
pub use index::{BatchDiff, SnapshotIndex};

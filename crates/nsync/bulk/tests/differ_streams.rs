//! Stream-level behaviour of the bulk differ.
//!
//! Run with:
//! ```bash
//! cargo test -p nsync-bulk --test differ_streams
//! ```

use nsync_bulk::{DiffOutcome, DiffStreams, Differ, DifferConfig};
use nsync_types::{ExistingWorkload, Fingerprint};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn snapshot(entries: &[(&str, &str)]) -> Vec<ExistingWorkload> {
    entries
        .iter()
        .map(|(guid, etag)| ExistingWorkload::new(*guid, *etag))
        .collect()
}

fn fp(guid: &str, etag: &str) -> Fingerprint {
    Fingerprint::new(guid, etag)
}

/// Feed every batch, close the input and gather the whole run
async fn run_to_completion(
    existing: Vec<ExistingWorkload>,
    batches: Vec<Vec<Fingerprint>>,
) -> nsync_bulk::DiffReport {
    let (desired_tx, desired_rx) = mpsc::channel(batches.len().max(1));
    for batch in batches {
        desired_tx.send(batch).await.unwrap();
    }
    drop(desired_tx);

    Differ::new(existing)
        .diff(CancellationToken::new(), desired_rx)
        .collect()
        .await
        .unwrap()
}

/// Cancel, then check every stream closes and nothing was deleted
async fn assert_cancelled_cleanly(streams: DiffStreams, cancel: CancellationToken) {
    cancel.cancel();

    let report = streams.collect().await.unwrap();
    assert_eq!(report.outcome, DiffOutcome::Cancelled);
    assert!(report.deleted.is_empty());
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_no_op_convergence() {
    let report = run_to_completion(
        snapshot(&[("a", "e1"), ("b", "e1")]),
        vec![vec![fp("a", "e1")], vec![fp("b", "e1")]],
    )
    .await;

    assert_eq!(report.missing.len(), 2);
    assert!(report.missing.iter().all(Vec::is_empty));
    assert_eq!(report.stale.len(), 2);
    assert!(report.stale.iter().all(Vec::is_empty));
    assert!(report.deleted.is_empty());
    assert_eq!(
        report.outcome,
        DiffOutcome::Completed {
            batches: 2,
            deleted: 0
        }
    );
}

#[tokio::test]
async fn test_exhaustive_deletion() {
    let report = run_to_completion(
        snapshot(&[("a", "e1"), ("b", "e1"), ("c", "e1")]),
        vec![vec![fp("a", "e1")]],
    )
    .await;

    assert_eq!(report.deleted.len(), 1);
    let deleted: HashSet<&str> = report.deleted_guids().into_iter().collect();
    assert_eq!(deleted, HashSet::from(["b", "c"]));
}

#[tokio::test]
async fn test_missing_detection() {
    let report = run_to_completion(
        snapshot(&[("a", "e1")]),
        vec![vec![fp("a", "e1"), fp("x", "ex"), fp("y", "ey")]],
    )
    .await;

    assert_eq!(report.missing, vec![vec![fp("x", "ex"), fp("y", "ey")]]);
    assert_eq!(report.stale, vec![Vec::<Fingerprint>::new()]);
    assert!(report.deleted_guids().is_empty());
}

#[tokio::test]
async fn test_staleness_detection() {
    let report = run_to_completion(snapshot(&[("a", "e1")]), vec![vec![fp("a", "e2")]]).await;

    assert_eq!(report.stale, vec![vec![fp("a", "e2")]]);
    assert_eq!(report.missing, vec![Vec::<Fingerprint>::new()]);
    assert!(report.deleted_guids().is_empty());
}

#[tokio::test]
async fn test_guid_repeated_in_later_batch_is_missing() {
    let report = run_to_completion(
        snapshot(&[("a", "e1")]),
        vec![vec![fp("a", "e1")], vec![fp("a", "e1")]],
    )
    .await;

    assert_eq!(report.missing, vec![vec![], vec![fp("a", "e1")]]);
    assert!(report.deleted.is_empty());
}

#[tokio::test]
async fn test_batches_keep_input_order() {
    let batches: Vec<Vec<Fingerprint>> = (0..5)
        .map(|i| vec![fp(&format!("guid-{i}"), "etag")])
        .collect();

    let report = run_to_completion(Vec::new(), batches.clone()).await;

    assert_eq!(report.missing, batches);
}

#[tokio::test]
async fn test_keeps_processing_while_input_open() {
    let (desired_tx, desired_rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let mut streams = Differ::new(snapshot(&[("a", "e1")])).diff(cancel.clone(), desired_rx);

    desired_tx.send(vec![fp("x", "ex")]).await.unwrap();
    assert_eq!(streams.missing.recv().await, Some(vec![fp("x", "ex")]));
    assert_eq!(streams.stale.recv().await, Some(vec![]));

    desired_tx.send(vec![]).await.unwrap();
    assert_eq!(streams.missing.recv().await, Some(vec![]));
    assert_eq!(streams.stale.recv().await, Some(vec![]));

    let pending = tokio::time::timeout(Duration::from_millis(50), streams.deleted.recv()).await;
    assert!(pending.is_err(), "deleted stream must stay open while input is open");

    drop(desired_tx);
    assert_eq!(streams.deleted.recv().await, Some(vec!["a".to_string()]));
    assert_eq!(streams.deleted.recv().await, None);
    assert_eq!(
        streams.handle.await.unwrap(),
        DiffOutcome::Completed {
            batches: 2,
            deleted: 1
        }
    );
}

#[tokio::test]
async fn test_cancel_while_waiting_for_batches() {
    let (_desired_tx, desired_rx) = mpsc::channel::<Vec<Fingerprint>>(1);
    let cancel = CancellationToken::new();
    let streams = Differ::new(snapshot(&[("a", "e1")])).diff(cancel.clone(), desired_rx);

    assert_cancelled_cleanly(streams, cancel).await;
}

#[tokio::test]
async fn test_cancel_before_start() {
    let (desired_tx, desired_rx) = mpsc::channel(1);
    desired_tx.send(vec![fp("a", "e1")]).await.unwrap();
    drop(desired_tx);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let streams =
        Differ::new(snapshot(&[("a", "e1"), ("b", "e1")])).diff(cancel.clone(), desired_rx);

    let report = streams.collect().await.unwrap();
    assert_eq!(report.outcome, DiffOutcome::Cancelled);
    assert!(report.missing.is_empty());
    assert!(report.deleted.is_empty());
}

#[tokio::test]
async fn test_cancel_while_waiting_to_send_missing() {
    let (desired_tx, desired_rx) = mpsc::channel(2);
    let cancel = CancellationToken::new();
    let streams = Differ::new(snapshot(&[("a", "e1")])).diff(cancel.clone(), desired_rx);

    // The first batch fills both one-slot buffers, the second blocks on missing.
    desired_tx.send(vec![fp("x", "ex")]).await.unwrap();
    desired_tx.send(vec![fp("y", "ey")]).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_cancelled_cleanly(streams, cancel).await;
}

#[tokio::test]
async fn test_cancel_while_waiting_to_send_stale() {
    let (desired_tx, desired_rx) = mpsc::channel(2);
    let cancel = CancellationToken::new();
    let mut streams =
        Differ::new(snapshot(&[("a", "e1"), ("b", "e1")])).diff(cancel.clone(), desired_rx);

    desired_tx.send(vec![fp("a", "e2")]).await.unwrap();
    desired_tx.send(vec![fp("b", "e2")]).await.unwrap();

    // Free the missing slot so the second batch gets stuck on stale.
    assert_eq!(streams.missing.recv().await, Some(vec![]));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_cancelled_cleanly(streams, cancel).await;
}

#[tokio::test]
async fn test_cancel_after_several_batches() {
    let (desired_tx, desired_rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let mut streams = Differ::with_config(
        snapshot(&[("a", "e1"), ("b", "e1")]),
        DifferConfig::with_channel_capacity(4),
    )
    .diff(cancel.clone(), desired_rx);

    for batch in [vec![fp("a", "e1")], vec![fp("x", "ex")], vec![]] {
        desired_tx.send(batch).await.unwrap();
        streams.missing.recv().await.unwrap();
        streams.stale.recv().await.unwrap();
    }

    assert_cancelled_cleanly(streams, cancel).await;
    drop(desired_tx);
}

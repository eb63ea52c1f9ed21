//! Snapshot index consumed in place as batches are classified

use nsync_types::{ExistingWorkload, Fingerprint};
use std::collections::HashMap;
use tracing::debug;

/// Classification of one input batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDiff {
    /// Desired but unknown to the scheduler
    pub missing: Vec<Fingerprint>,
    /// Known to the scheduler at a different version
    pub stale: Vec<Fingerprint>,
}

/// Scheduler LRPs not yet matched by any desired fingerprint.
///
/// A guid leaves the index the first time a fingerprint names it, whatever
/// its version. A later fingerprint for the same guid no longer finds it and
/// is classified as missing.
#[derive(Debug, Default)]
pub struct SnapshotIndex {
    remaining: HashMap<String, ExistingWorkload>,
}

impl SnapshotIndex {
    /// Index a snapshot by process guid; for duplicate guids the last entry wins
    pub fn from_snapshot(snapshot: impl IntoIterator<Item = ExistingWorkload>) -> Self {
        let remaining = snapshot
            .into_iter()
            .map(|workload| (workload.process_guid.clone(), workload))
            .collect();

        Self { remaining }
    }

    /// Number of snapshot LRPs not yet matched by any fingerprint
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Classify a batch, removing every matched guid from the index
    pub fn classify(&mut self, batch: Vec<Fingerprint>) -> BatchDiff {
        let mut diff = BatchDiff::default();

        for fingerprint in batch {
            match self.remaining.remove(&fingerprint.process_guid) {
                Some(existing) if existing.etag == fingerprint.etag => continue,
                Some(_) => {
                    debug!(
                        guid = %fingerprint.process_guid,
                        etag = %fingerprint.etag,
                        "Found stale desired LRP"
                    );
                    diff.stale.push(fingerprint);
                }
                None => {
                    debug!(
                        guid = %fingerprint.process_guid,
                        etag = %fingerprint.etag,
                        "Found missing desired LRP"
                    );
                    diff.missing.push(fingerprint);
                }
            }
        }

        diff
    }

    /// Guids never matched by any fingerprint, in no particular order
    pub fn into_deleted(self) -> Vec<String> {
        self.remaining.into_keys().collect()
    }
}

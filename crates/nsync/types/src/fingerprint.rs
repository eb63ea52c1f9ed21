//! Desired-state fingerprints and scheduler snapshot entries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity and version of one desired app as the catalog knows it.
///
/// Two fingerprints with the same `process_guid` and equal `etag` describe
/// the same deployable version; no re-desire is needed between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Stable identity of the process
    pub process_guid: String,

    /// Opaque version token
    pub etag: String,
}

impl Fingerprint {
    pub fn new(process_guid: impl Into<String>, etag: impl Into<String>) -> Self {
        Self {
            process_guid: process_guid.into(),
            etag: etag.into(),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.process_guid, self.etag)
    }
}

/// A desired LRP currently registered with the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingWorkload {
    pub process_guid: String,

    /// Version token recorded when the LRP was desired.
    /// The scheduler API calls this field `annotation`.
    #[serde(alias = "annotation")]
    pub etag: String,

    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub instances: u32,

    #[serde(default)]
    pub stack: String,
}

impl ExistingWorkload {
    pub fn new(process_guid: impl Into<String>, etag: impl Into<String>) -> Self {
        Self {
            process_guid: process_guid.into(),
            etag: etag.into(),
            domain: String::new(),
            instances: 0,
            stack: String::new(),
        }
    }
}

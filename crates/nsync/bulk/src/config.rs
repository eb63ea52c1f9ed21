//! Differ configuration

use serde::{Deserialize, Serialize};

/// Tuning for a differ run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferConfig {
    /// Buffer size of each output stream. 1 hands every batch over one at a
    /// time, so the differ never runs more than a batch ahead of a consumer.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for DifferConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl DifferConfig {
    pub fn with_channel_capacity(capacity: usize) -> Self {
        Self {
            channel_capacity: capacity,
        }
    }

    /// Capacity actually used; tokio channels need at least one slot
    pub fn effective_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

fn default_channel_capacity() -> usize {
    1
}

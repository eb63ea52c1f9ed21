//! Differ error types

use std::fmt;
use thiserror::Error;

/// One of the differ's output streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Missing,
    Stale,
    Deleted,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Missing => write!(f, "missing"),
            StreamKind::Stale => write!(f, "stale"),
            StreamKind::Deleted => write!(f, "deleted"),
        }
    }
}

/// Differ errors
///
/// Cancellation is not an error; it is reported as
/// [`DiffOutcome::Cancelled`](crate::DiffOutcome::Cancelled).
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Consumer of the {stream} stream went away")]
    ConsumerClosed { stream: StreamKind },

    #[error("Differ task failed: {0}")]
    TaskFailed(String),
}

/// Result type for differ operations
pub type Result<T> = std::result::Result<T, DiffError>;

//! Source traits the feed loop consumes, plus in-memory stubs.
//!
//! The aggregator never talks to `PostgreSQL` or NATS directly. It is
//! constructed with a [`SnapshotSource`] (bounded bulk reads across the
//! source collections) and a [`ChangeSource`] (the incremental change
//! stream), so the run loop can be exercised end-to-end with the stubs in
//! this module before any infrastructure exists.

use std::collections::VecDeque;

use mediahub_types::{ChangeNotification, SnapshotBatch};

/// Errors surfaced by snapshot and change sources.
///
/// Sources recover what they can internally (per-collection failures are
/// carried inside [`SnapshotBatch`]); only total failures reach this type.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A snapshot round failed for every collection.
    #[error("snapshot source error: {message}")]
    Snapshot {
        /// Description of the failure.
        message: String,
    },

    /// The change stream failed irrecoverably.
    #[error("change source error: {message}")]
    Stream {
        /// Description of the failure.
        message: String,
    },
}

/// A source of bounded snapshots across all source collections.
pub trait SnapshotSource {
    /// Fetch one snapshot round.
    ///
    /// Collections that fail individually are reported inside the batch;
    /// the call itself fails only when every collection failed.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Snapshot`] on total failure.
    async fn fetch_snapshot(&self) -> Result<SnapshotBatch, SourceError>;
}

/// A source of incremental change notifications.
///
/// Delivery order across collections is not guaranteed; duplicates and
/// gaps are expected and absorbed by the feed's idempotent semantics.
pub trait ChangeSource {
    /// Await the next change notification.
    ///
    /// `Ok(None)` means the stream ended; the caller is expected to
    /// rebuild the source and re-bootstrap rather than resume.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Stream`] if the transport failed.
    async fn next_change(&mut self) -> Result<Option<ChangeNotification>, SourceError>;
}

/// A snapshot source that returns a fixed batch.
///
/// Used in tests and for exercising the loop without a database.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshotSource {
    batch: SnapshotBatch,
}

impl StaticSnapshotSource {
    /// Create a source that always returns `batch`.
    pub const fn new(batch: SnapshotBatch) -> Self {
        Self { batch }
    }
}

impl SnapshotSource for StaticSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<SnapshotBatch, SourceError> {
        Ok(self.batch.clone())
    }
}

/// A snapshot source that always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingSnapshotSource;

impl SnapshotSource for FailingSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<SnapshotBatch, SourceError> {
        Err(SourceError::Snapshot {
            message: String::from("all collections failed"),
        })
    }
}

/// A change source that replays a scripted sequence, then ends.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChangeSource {
    changes: VecDeque<ChangeNotification>,
}

impl ScriptedChangeSource {
    /// Create a source that yields `changes` in order, then `None`.
    pub fn new(changes: Vec<ChangeNotification>) -> Self {
        Self {
            changes: changes.into(),
        }
    }
}

impl ChangeSource for ScriptedChangeSource {
    async fn next_change(&mut self) -> Result<Option<ChangeNotification>, SourceError> {
        Ok(self.changes.pop_front())
    }
}

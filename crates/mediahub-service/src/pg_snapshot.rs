//! `PostgreSQL`-backed snapshot source for the feed loop.
//!
//! [`PgSnapshotSource`] adapts the [`SnapshotFetcher`] to the
//! [`SnapshotSource`] trait the feed loop consumes, fixing the set of
//! collections at construction so the loop itself never sees collection
//! names.

use mediahub_db::{DbError, SnapshotFetcher};
use mediahub_feed::source::{SnapshotSource, SourceError};
use mediahub_types::SnapshotBatch;

/// A snapshot source backed by bounded `PostgreSQL` queries.
#[derive(Debug, Clone)]
pub struct PgSnapshotSource {
    fetcher: SnapshotFetcher,
    collections: Vec<String>,
}

impl PgSnapshotSource {
    /// Create a source that snapshots the given collections.
    pub const fn new(fetcher: SnapshotFetcher, collections: Vec<String>) -> Self {
        Self {
            fetcher,
            collections,
        }
    }
}

impl SnapshotSource for PgSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<SnapshotBatch, SourceError> {
        self.fetcher
            .fetch(&self.collections)
            .await
            .map_err(|e: DbError| SourceError::Snapshot {
                message: e.to_string(),
            })
    }
}

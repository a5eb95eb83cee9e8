//! Error types for the snapshot layer.
//!
//! Per-collection failures are *not* represented here -- they are isolated
//! into the snapshot batch so sibling collections keep contributing.
//! [`DbError`] covers connection problems, invalid configuration, and the
//! one aggregate case where every collection failed in the same round.

/// Errors that can occur in the snapshot layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A collection name is not a safe SQL identifier.
    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    /// Every collection failed in one snapshot round.
    ///
    /// The per-collection reasons travel with the error so the caller can
    /// log them; the previously built feed is left untouched.
    #[error("snapshot failed for all {} collections", failures.len())]
    AllCollectionsFailed {
        /// The per-collection failure reports.
        failures: Vec<mediahub_types::CollectionFailure>,
    },
}

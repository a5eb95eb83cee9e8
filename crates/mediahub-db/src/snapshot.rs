//! Bounded, concurrent snapshot queries across the source collections.
//!
//! One query per collection, newest-first and `LIMIT`-bounded, all issued
//! concurrently with an independent timeout each. A failing collection
//! contributes zero records and a failure report; it never aborts its
//! siblings. Only a round where *every* collection failed surfaces as an
//! error, and even then the caller keeps serving its previous feed.
//!
//! Rows come back as `jsonb` so the fetcher stays schema-agnostic: the
//! collections are heterogeneous and only the normalizer knows their
//! fields.

use std::time::Duration;

use futures::future::join_all;
use mediahub_types::{CollectionFailure, RawRecord, SnapshotBatch};
use tracing::{debug, warn};

use crate::error::DbError;
use crate::postgres::PostgresPool;

/// Default newest-first row limit per collection.
const DEFAULT_LIMIT: u32 = 5;

/// Default per-query timeout.
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Validate that a collection name is a safe SQL identifier.
///
/// Table names cannot be bound as parameters, so the name is interpolated
/// into the query text. This restricts it to `[a-z_][a-z0-9_]*`, at most
/// 63 bytes (the `PostgreSQL` identifier limit), before any interpolation
/// happens.
///
/// # Errors
///
/// Returns [`DbError::InvalidCollection`] if the name does not conform.
pub fn validate_collection(name: &str) -> Result<(), DbError> {
    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    let rest_ok = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if name.is_empty() || name.len() > 63 || !starts_ok || !rest_ok {
        return Err(DbError::InvalidCollection(name.to_owned()));
    }
    Ok(())
}

/// Issues bounded snapshot queries against the source collections.
///
/// Stateless beyond its configuration; one instance serves the whole
/// service lifetime.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    pool: PostgresPool,
    limit: u32,
    query_timeout: Duration,
}

impl SnapshotFetcher {
    /// Create a fetcher with default limit and timeout.
    pub fn new(pool: PostgresPool) -> Self {
        Self {
            pool,
            limit: DEFAULT_LIMIT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Set the newest-first row limit per collection.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the per-query timeout.
    #[must_use]
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Fetch one snapshot round across `collections`.
    ///
    /// All queries run concurrently; the call joins every outstanding
    /// query (each under its own timeout) before returning. Completion
    /// order has no effect on the result.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::AllCollectionsFailed`] when every collection
    /// failed. Individual failures are reported inside the batch.
    pub async fn fetch(&self, collections: &[String]) -> Result<SnapshotBatch, DbError> {
        let rounds = join_all(
            collections
                .iter()
                .map(|name| async move { (name.as_str(), self.fetch_collection(name).await) }),
        )
        .await;

        let mut batch = SnapshotBatch::default();
        for (name, outcome) in rounds {
            match outcome {
                Ok(rows) => {
                    debug!(collection = name, rows = rows.len(), "collection snapshot read");
                    batch.records.extend(rows.into_iter().map(|record| RawRecord {
                        collection: name.to_owned(),
                        record,
                    }));
                }
                Err(reason) => {
                    warn!(collection = name, reason = %reason, "collection snapshot failed");
                    batch.failures.push(CollectionFailure {
                        collection: name.to_owned(),
                        reason,
                    });
                }
            }
        }

        if !collections.is_empty() && batch.failures.len() == collections.len() {
            return Err(DbError::AllCollectionsFailed {
                failures: batch.failures,
            });
        }

        Ok(batch)
    }

    /// Query one collection, newest first, bounded by the configured limit.
    ///
    /// Failures are folded into a string reason here so the caller can
    /// treat every per-collection problem (bad name, timeout, query error)
    /// uniformly.
    async fn fetch_collection(&self, name: &str) -> Result<Vec<serde_json::Value>, String> {
        validate_collection(name).map_err(|e| e.to_string())?;

        // The name is validated above; limits are bound as parameters.
        let sql = format!(
            r#"SELECT row_to_json(t)::jsonb FROM
               (SELECT * FROM "{name}" ORDER BY created_at DESC LIMIT $1) AS t"#
        );

        let query = sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .bind(i64::from(self.limit))
            .fetch_all(self.pool.pool());

        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "query timed out after {}ms",
                self.query_timeout.as_millis()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_validate() {
        for name in ["media", "channels", "messages", "audit_log", "_private", "t2"] {
            assert!(validate_collection(name).is_ok(), "{name} should validate");
        }
    }

    #[test]
    fn unsafe_names_are_rejected() {
        for name in [
            "",
            "Media",
            "media;drop table users",
            "media records",
            "2fast",
            "media\"",
            "média",
        ] {
            assert!(validate_collection(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn overlong_names_are_rejected() {
        let name = "a".repeat(64);
        assert!(validate_collection(&name).is_err());
    }

    #[test]
    fn sixty_three_byte_names_validate() {
        let name = "a".repeat(63);
        assert!(validate_collection(&name).is_ok());
    }
}

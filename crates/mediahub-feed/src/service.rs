//! The feed run loop: bootstrap once, then apply the change stream.
//!
//! [`run_feed`] is the single logical owner of an [`ActivityFeed`] for the
//! duration of a run. It serializes every mutation by construction: the
//! loop holds the only mutable reference, so no locking discipline is
//! required of callers. Consumers observe the feed through a
//! [`FeedCallback`] that fires after each mutation.
//!
//! The loop prefers fresh data over stale state: it bootstraps from the
//! snapshot source before consuming any changes, and when the change
//! stream ends it returns [`FeedEndReason::StreamEnded`] so the caller can
//! rebuild the stream and re-enter the loop (which bootstraps again).
//! Missed notifications during an outage cannot be recovered from the
//! stream alone.
//!
//! A total snapshot failure never clears the feed; the previous contents
//! keep being served.

use tokio::sync::watch;
use tracing::{info, warn};

use mediahub_types::ActivityEvent;

use crate::feed::ActivityFeed;
use crate::normalize::normalize;
use crate::source::{ChangeSource, SnapshotSource};

/// Why the feed loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEndReason {
    /// The shutdown signal fired; the feed must not be mutated again.
    ShutdownRequested,
    /// The change stream ended or failed; the caller should rebuild the
    /// stream and re-run the loop to bootstrap afresh.
    StreamEnded,
}

/// Result of one [`run_feed`] invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRunResult {
    /// Why the loop returned.
    pub end_reason: FeedEndReason,
    /// Number of change notifications applied this run.
    pub changes_applied: u64,
}

/// Callback invoked after every feed mutation.
///
/// Implementations publish the new snapshot to whoever renders it (the
/// observer server, a test probe). The slice is the feed's current
/// contents, newest first.
pub trait FeedCallback: Send {
    /// Called after the feed changed.
    fn on_feed_updated(&mut self, feed: &[ActivityEvent]);
}

/// A no-op feed callback for tests and headless runs.
pub struct NoOpCallback;

impl FeedCallback for NoOpCallback {
    fn on_feed_updated(&mut self, _feed: &[ActivityEvent]) {}
}

/// Run the feed loop until shutdown or stream end.
///
/// Phase one bootstraps the feed from a snapshot round; phase two applies
/// change notifications one at a time. Both phases race the shutdown
/// receiver, so teardown interrupts an in-flight snapshot fetch and the
/// abandoned result is never written into the feed.
///
/// Any wake on the shutdown channel (a value change or a dropped sender)
/// is treated as a stop request.
pub async fn run_feed<S, C, F>(
    feed: &mut ActivityFeed,
    snapshots: &S,
    changes: &mut C,
    callback: &mut F,
    shutdown: &mut watch::Receiver<bool>,
) -> FeedRunResult
where
    S: SnapshotSource,
    C: ChangeSource,
    F: FeedCallback,
{
    let mut changes_applied: u64 = 0;

    // --- Phase one: bootstrap ---
    tokio::select! {
        biased;

        _ = shutdown.changed() => {
            info!("shutdown requested during bootstrap");
            return FeedRunResult {
                end_reason: FeedEndReason::ShutdownRequested,
                changes_applied,
            };
        }
        result = snapshots.fetch_snapshot() => match result {
            Ok(batch) => {
                for failure in &batch.failures {
                    warn!(
                        collection = %failure.collection,
                        reason = %failure.reason,
                        "collection skipped this snapshot round"
                    );
                }

                let events: Vec<ActivityEvent> = batch
                    .records
                    .iter()
                    .map(|raw| normalize(&raw.collection, &raw.record))
                    .collect();

                feed.bootstrap(events);
                info!(feed_len = feed.len(), "feed bootstrapped");
                callback.on_feed_updated(feed.events());
            }
            Err(e) => {
                // Never clear the feed on failure; serve the previous
                // contents until a later round succeeds.
                warn!(error = %e, "snapshot failed, serving previous feed");
            }
        }
    }

    // --- Phase two: apply the change stream ---
    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => {
                info!(changes_applied, "shutdown requested");
                return FeedRunResult {
                    end_reason: FeedEndReason::ShutdownRequested,
                    changes_applied,
                };
            }
            next = changes.next_change() => match next {
                Ok(Some(change)) => {
                    let event = normalize(&change.collection, &change.record);
                    feed.apply(event, change.op);
                    changes_applied = changes_applied.saturating_add(1);
                    callback.on_feed_updated(feed.events());
                }
                Ok(None) => {
                    warn!(changes_applied, "change stream ended");
                    return FeedRunResult {
                        end_reason: FeedEndReason::StreamEnded,
                        changes_applied,
                    };
                }
                Err(e) => {
                    warn!(error = %e, changes_applied, "change stream failed");
                    return FeedRunResult {
                        end_reason: FeedEndReason::StreamEnded,
                        changes_applied,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mediahub_types::{
        ChangeNotification, ChangeOp, RawRecord, SnapshotBatch,
    };

    use super::*;
    use crate::source::{
        FailingSnapshotSource, ScriptedChangeSource, SourceError, StaticSnapshotSource,
    };

    /// A snapshot source that never resolves, for teardown tests.
    struct PendingSnapshotSource;

    impl SnapshotSource for PendingSnapshotSource {
        async fn fetch_snapshot(&self) -> Result<SnapshotBatch, SourceError> {
            std::future::pending().await
        }
    }

    /// Records every published feed snapshot.
    #[derive(Default)]
    struct RecordingCallback {
        updates: usize,
        last: Vec<ActivityEvent>,
    }

    impl FeedCallback for RecordingCallback {
        fn on_feed_updated(&mut self, feed: &[ActivityEvent]) {
            self.updates = self.updates.saturating_add(1);
            self.last = feed.to_vec();
        }
    }

    fn raw(collection: &str, key: &str, epoch_secs: i64) -> RawRecord {
        let created_at = chrono::DateTime::from_timestamp(epoch_secs, 0)
            .unwrap_or_default()
            .to_rfc3339();
        RawRecord {
            collection: collection.to_owned(),
            record: serde_json::json!({"id": key, "created_at": created_at}),
        }
    }

    fn change(collection: &str, key: &str, epoch_secs: i64, op: ChangeOp) -> ChangeNotification {
        let created_at = chrono::DateTime::from_timestamp(epoch_secs, 0)
            .unwrap_or_default()
            .to_rfc3339();
        ChangeNotification {
            collection: collection.to_owned(),
            op,
            record: serde_json::json!({"id": key, "created_at": created_at}),
        }
    }

    #[tokio::test]
    async fn bootstraps_then_applies_changes_until_stream_end() {
        let mut feed = ActivityFeed::new();
        let snapshots = StaticSnapshotSource::new(SnapshotBatch {
            records: vec![raw("media", "m1", 100), raw("channels", "c1", 80)],
            failures: Vec::new(),
        });
        let mut changes = ScriptedChangeSource::new(vec![
            change("messages", "n1", 200, ChangeOp::Insert),
            change("channels", "c1", 80, ChangeOp::Delete),
        ]);
        let mut callback = RecordingCallback::default();
        let (_tx, mut shutdown) = watch::channel(false);

        let result = run_feed(
            &mut feed,
            &snapshots,
            &mut changes,
            &mut callback,
            &mut shutdown,
        )
        .await;

        assert_eq!(result.end_reason, FeedEndReason::StreamEnded);
        assert_eq!(result.changes_applied, 2);
        // One bootstrap publish plus one per change.
        assert_eq!(callback.updates, 3);

        let ids: Vec<&str> = feed.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["messages:n1", "media:m1"]);
    }

    #[tokio::test]
    async fn total_snapshot_failure_preserves_previous_feed() {
        let mut feed = ActivityFeed::new();
        feed.bootstrap(vec![
            normalize("media", &serde_json::json!({"id": "m1"})),
            normalize("channels", &serde_json::json!({"id": "c1"})),
        ]);
        let before = feed.snapshot();

        let mut changes = ScriptedChangeSource::new(Vec::new());
        let mut callback = RecordingCallback::default();
        let (_tx, mut shutdown) = watch::channel(false);

        let result = run_feed(
            &mut feed,
            &FailingSnapshotSource,
            &mut changes,
            &mut callback,
            &mut shutdown,
        )
        .await;

        assert_eq!(result.end_reason, FeedEndReason::StreamEnded);
        assert_eq!(feed.snapshot(), before);
        // The failed bootstrap must not publish.
        assert_eq!(callback.updates, 0);
    }

    #[tokio::test]
    async fn shutdown_interrupts_inflight_bootstrap() {
        let mut feed = ActivityFeed::new();
        let mut changes = ScriptedChangeSource::new(Vec::new());
        let mut callback = RecordingCallback::default();

        let (tx, mut shutdown) = watch::channel(false);
        let _ = tx.send(true);

        let result = run_feed(
            &mut feed,
            &PendingSnapshotSource,
            &mut changes,
            &mut callback,
            &mut shutdown,
        )
        .await;

        assert_eq!(result.end_reason, FeedEndReason::ShutdownRequested);
        assert!(feed.is_empty());
        assert_eq!(callback.updates, 0);
    }

    #[tokio::test]
    async fn duplicate_stream_delivery_is_idempotent() {
        let mut feed = ActivityFeed::new();
        let snapshots = StaticSnapshotSource::new(SnapshotBatch::default());
        let mut changes = ScriptedChangeSource::new(vec![
            change("media", "m1", 100, ChangeOp::Insert),
            change("media", "m1", 100, ChangeOp::Insert),
        ]);
        let mut callback = NoOpCallback;
        let (_tx, mut shutdown) = watch::channel(false);

        let result = run_feed(
            &mut feed,
            &snapshots,
            &mut changes,
            &mut callback,
            &mut shutdown,
        )
        .await;

        assert_eq!(result.changes_applied, 2);
        assert_eq!(feed.len(), 1);
    }
}

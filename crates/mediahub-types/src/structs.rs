//! Core structs for the Media Hub activity feed.
//!
//! [`ActivityEvent`] is the normalized shape every source record is reduced
//! to. The remaining types carry raw records between the snapshot fetcher,
//! the change stream, and the normalizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ChangeOp, EventKind};
use crate::ids::EventId;

/// A normalized feed event.
///
/// The only shape the aggregator stores and the dashboard renders. All
/// source-collection specifics are erased by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActivityEvent {
    /// Unique per (source collection, record) pair; later events with the
    /// same id replace earlier ones.
    pub id: EventId,
    /// Event category.
    pub kind: EventKind,
    /// Short human-readable label.
    pub title: String,
    /// Human-readable summary of what happened.
    pub description: String,
    /// When the event occurred; source of truth for feed ordering.
    pub occurred_at: DateTime<Utc>,
}

/// A raw change delivered by the change stream.
///
/// The record payload is kept as loose JSON: collections are heterogeneous
/// and the normalizer owns the mapping into [`ActivityEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    /// Source collection the change came from.
    pub collection: String,
    /// Operation kind.
    pub op: ChangeOp,
    /// The affected row, as JSON. `null` when the payload was malformed;
    /// the normalizer fills safe defaults.
    pub record: serde_json::Value,
}

/// A raw record returned by a snapshot query, tagged with its collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Source collection the record was read from.
    pub collection: String,
    /// The row, as JSON.
    pub record: serde_json::Value,
}

/// A per-collection snapshot failure.
///
/// Failures are isolated: one failing collection contributes zero records
/// and one of these entries, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionFailure {
    /// The collection whose query failed.
    pub collection: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Result of a snapshot round across all source collections.
///
/// Contains the union of whatever succeeded plus the failures that were
/// isolated along the way. A round where *every* collection failed is
/// surfaced as an error by the fetcher instead of an empty batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotBatch {
    /// Records from all collections that answered, in no particular order.
    pub records: Vec<RawRecord>,
    /// Collections that failed this round.
    pub failures: Vec<CollectionFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_event_json_shape() {
        let event = ActivityEvent {
            id: EventId::scoped("media", "m1"),
            kind: EventKind::Media,
            title: String::from("sunset.jpg"),
            description: String::from("New image uploaded"),
            occurred_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
        };

        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json.get("id").and_then(|v| v.as_str()), Some("media:m1"));
        assert_eq!(json.get("kind").and_then(|v| v.as_str()), Some("media"));
    }

    #[test]
    fn change_notification_round_trips() {
        let change = ChangeNotification {
            collection: String::from("channels"),
            op: ChangeOp::Update,
            record: serde_json::json!({"id": "c1", "is_active": true}),
        };

        let json = serde_json::to_string(&change).unwrap_or_default();
        let back: ChangeNotification = serde_json::from_str(&json).unwrap_or(ChangeNotification {
            collection: String::new(),
            op: ChangeOp::Insert,
            record: serde_json::Value::Null,
        });
        assert_eq!(back, change);
    }

    #[test]
    fn snapshot_batch_default_is_empty() {
        let batch = SnapshotBatch::default();
        assert!(batch.records.is_empty());
        assert!(batch.failures.is_empty());
    }
}

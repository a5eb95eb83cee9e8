//! Shared type definitions for the Media Hub activity service.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries. Dashboard-facing types flow downstream to `TypeScript` via
//! `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- the opaque, collection-scoped event identifier
//! - [`enums`] -- event categories, change operations, presentation icons
//! - [`structs`] -- the normalized event and raw-record carrier types

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ChangeOp, EventKind, FeedIcon};
pub use ids::EventId;
pub use structs::{ActivityEvent, ChangeNotification, CollectionFailure, RawRecord, SnapshotBatch};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::EventId::export_all();
        let _ = crate::enums::EventKind::export_all();
        let _ = crate::enums::FeedIcon::export_all();
        let _ = crate::structs::ActivityEvent::export_all();
    }
}

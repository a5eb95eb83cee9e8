//! Activity feed aggregation core for the Media Hub service.
//!
//! This crate owns the interesting logic of the hub: reducing raw records
//! from heterogeneous source collections into one normalized event shape,
//! maintaining a bounded newest-first feed of them, and driving that feed
//! from a snapshot source plus an incremental change stream. Transport
//! (`PostgreSQL`, NATS) and presentation (the observer server) live in
//! sibling crates behind the traits defined here.
//!
//! # Modules
//!
//! - [`feed`] -- the capped, sorted, deduplicated feed state
//! - [`normalize`] -- table-driven raw-record normalization
//! - [`icon`] -- category-to-icon presentation mapping
//! - [`source`] -- snapshot/change source traits and in-memory stubs
//! - [`service`] -- the run loop that owns the feed
//! - [`config`] -- typed YAML configuration

pub mod config;
pub mod feed;
pub mod icon;
pub mod normalize;
pub mod service;
pub mod source;

// Re-export primary types for convenience.
pub use config::{ConfigError, FeedSettings, HubConfig, InfrastructureConfig};
pub use feed::{ActivityFeed, DEFAULT_FEED_CAP};
pub use icon::icon_for;
pub use normalize::normalize;
pub use service::{run_feed, FeedCallback, FeedEndReason, FeedRunResult, NoOpCallback};
pub use source::{
    ChangeSource, FailingSnapshotSource, ScriptedChangeSource, SnapshotSource, SourceError,
    StaticSnapshotSource,
};

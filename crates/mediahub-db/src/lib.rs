//! `PostgreSQL` snapshot layer for the Media Hub activity service.
//!
//! The hosted database is an external collaborator reached through a
//! narrow query interface: this crate issues the bounded, newest-first
//! snapshot queries that seed the activity feed, one per source
//! collection, concurrently and with per-collection failure isolation.
//! It owns no schema, runs no migrations, and never writes.
//!
//! # Modules
//!
//! - [`postgres`] -- connection pool and configuration
//! - [`snapshot`] -- the concurrent snapshot fetcher
//! - [`error`] -- shared error types

pub mod error;
pub mod postgres;
pub mod snapshot;

// Re-export primary types for convenience.
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use snapshot::{validate_collection, SnapshotFetcher};

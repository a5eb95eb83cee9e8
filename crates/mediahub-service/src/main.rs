//! Media Hub activity service binary.
//!
//! This is the entry point that wires together the snapshot fetcher, the
//! NATS change stream, the feed loop, and the Observer API server. It
//! loads configuration, initializes all subsystems, and runs the feed
//! until the process is told to stop.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `mediahub-config.yaml`
//! 3. Connect to `PostgreSQL` and build the snapshot source
//! 4. Start the Observer API server
//! 5. Wire the shutdown signal (Ctrl-C)
//! 6. Connect the NATS change stream
//! 7. Run the feed loop, rebuilding the stream whenever it ends
//! 8. Tear down: close the subscription, stop the observer
//!
//! The feed is owned by the loop for the whole run; every reconnect
//! re-enters the loop and re-bootstraps from a fresh snapshot, because
//! notifications missed during an outage cannot be recovered from the
//! stream alone.

mod error;
mod nats_changes;
mod observer_callback;
mod pg_snapshot;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mediahub_db::{PostgresConfig, PostgresPool, SnapshotFetcher};
use mediahub_feed::config::HubConfig;
use mediahub_feed::feed::ActivityFeed;
use mediahub_feed::service::{run_feed, FeedEndReason};
use mediahub_observer::{spawn_observer, AppState, ServerConfig};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ServiceError;
use crate::nats_changes::NatsChangeSource;
use crate::observer_callback::ObserverCallback;
use crate::pg_snapshot::PgSnapshotSource;

/// Application entry point for the activity service.
///
/// Initializes all subsystems and runs the feed loop. Returns an error
/// if any startup step fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("mediahub-service starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        feed_cap = config.feed.cap,
        snapshot_limit = config.feed.snapshot_limit,
        collections = ?config.collections,
        "Configuration loaded"
    );

    // 3. Connect to PostgreSQL and build the snapshot source.
    let pg_config = PostgresConfig::new(&config.infrastructure.postgres_url);
    let pool = PostgresPool::connect(&pg_config)
        .await
        .map_err(ServiceError::from)?;
    let fetcher = SnapshotFetcher::new(pool)
        .with_limit(config.feed.snapshot_limit)
        .with_query_timeout(Duration::from_millis(config.feed.snapshot_timeout_ms));
    let snapshots = PgSnapshotSource::new(fetcher, config.collections.clone());
    info!("Snapshot source ready");

    // 4. Start the Observer API server.
    let app_state = Arc::new(AppState::new());
    let server_config = ServerConfig {
        host: config.infrastructure.observer_host.clone(),
        port: config.infrastructure.observer_port,
    };
    let observer_handle = spawn_observer(&server_config, Arc::clone(&app_state))
        .await
        .map_err(ServiceError::from)?;
    info!(port = server_config.port, "Observer API server started");

    // 5. Wire the shutdown signal.
    let (shutdown_tx, mut shutdown) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for shutdown signal");
        }
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    // 6. Connect the NATS change stream. A failure here is fatal: the
    //    service exists to stay current, not to serve a frozen snapshot.
    let nats_url = &config.infrastructure.nats_url;
    let subject_prefix = &config.infrastructure.subject_prefix;
    let mut changes = NatsChangeSource::connect(nats_url, subject_prefix)
        .await
        .map_err(|e| ServiceError::Nats {
            message: e.to_string(),
        })?;

    // 7. Run the feed loop, rebuilding the stream whenever it ends.
    let mut feed = ActivityFeed::with_cap(config.feed.cap);
    let mut callback = ObserverCallback::new(Arc::clone(&app_state));
    let resubscribe_delay = Duration::from_millis(config.feed.resubscribe_delay_ms);
    let mut total_changes: u64 = 0;

    loop {
        let result = run_feed(
            &mut feed,
            &snapshots,
            &mut changes,
            &mut callback,
            &mut shutdown,
        )
        .await;
        total_changes = total_changes.saturating_add(result.changes_applied);

        // Unsubscribe before deciding what happens next; a torn-down
        // stream must never deliver into the feed again.
        let ended = changes;
        ended.close().await;

        match result.end_reason {
            FeedEndReason::ShutdownRequested => break,
            FeedEndReason::StreamEnded => {
                warn!("change stream ended, rebuilding subscription");
                match rebuild_changes(nats_url, subject_prefix, resubscribe_delay, &shutdown)
                    .await
                {
                    Some(rebuilt) => changes = rebuilt,
                    None => break,
                }
            }
        }
    }

    // 8. Tear down.
    observer_handle.abort();
    info!(
        total_changes,
        feed_len = feed.len(),
        "mediahub-service shutdown complete"
    );

    Ok(())
}

/// Load the service configuration from `mediahub-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// a missing file yields the default configuration (with environment
/// overrides still applied).
fn load_config() -> Result<HubConfig, ServiceError> {
    let config_path = Path::new("mediahub-config.yaml");
    if config_path.exists() {
        let config = HubConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        let mut config = HubConfig::default();
        config.infrastructure.apply_env_overrides();
        Ok(config)
    }
}

/// Rebuild the change stream after it ended, retrying until it connects.
///
/// Returns `None` when shutdown was requested while waiting, so the
/// caller can exit instead of reconnecting.
async fn rebuild_changes(
    url: &str,
    prefix: &str,
    delay: Duration,
    shutdown: &watch::Receiver<bool>,
) -> Option<NatsChangeSource> {
    loop {
        tokio::time::sleep(delay).await;

        if *shutdown.borrow() {
            return None;
        }

        match NatsChangeSource::connect(url, prefix).await {
            Ok(source) => return Some(source),
            Err(e) => warn!(error = %e, "NATS reconnect failed, retrying"),
        }
    }
}

//! NATS-backed change source for the feed loop.
//!
//! [`NatsChangeSource`] implements the [`ChangeSource`] trait over a
//! wildcard NATS subscription. The database-side bridge publishes one
//! message per row change on subjects of the form
//! `{prefix}.{collection}.{op}` (e.g. `mediahub.changes.media.insert`)
//! with the affected row as the JSON payload.
//!
//! # Delivery contract
//!
//! Subjects carry the routing facts (collection, operation); the payload
//! is only the row. A malformed payload is delivered as a null record --
//! the normalizer fills safe defaults -- while a message on an
//! unrecognizable subject is skipped with a warning, since without an
//! operation there is nothing to apply.
//!
//! `async-nats` reconnects internally; from this source's perspective the
//! subscription either yields messages or ends, and the caller rebuilds
//! it on end.

use futures::StreamExt as _;
use tracing::{debug, warn};

use mediahub_feed::source::{ChangeSource, SourceError};
use mediahub_types::{ChangeNotification, ChangeOp};

/// A change source that consumes row-change messages from NATS.
pub struct NatsChangeSource {
    /// Kept alive for the subscription's lifetime; dropping the last
    /// client handle tears down the connection under the subscriber.
    client: async_nats::Client,
    subscriber: async_nats::Subscriber,
    prefix: String,
}

impl NatsChangeSource {
    /// Connect to a NATS server and subscribe to all change subjects
    /// under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Stream`] if the connection or the
    /// subscription fails.
    pub async fn connect(url: &str, prefix: &str) -> Result<Self, SourceError> {
        let client = async_nats::connect(url).await.map_err(|e| SourceError::Stream {
            message: format!("failed to connect to NATS at {url}: {e}"),
        })?;

        let subject = format!("{prefix}.>");
        debug!(subject = %subject, "subscribing to change subjects");
        let subscriber = client
            .subscribe(subject.clone())
            .await
            .map_err(|e| SourceError::Stream {
                message: format!("failed to subscribe to {subject}: {e}"),
            })?;

        tracing::info!(url, subject = %subject, "NATS change stream connected");
        Ok(Self {
            client,
            subscriber,
            prefix: prefix.to_owned(),
        })
    }

    /// Unsubscribe and drop the connection.
    ///
    /// Failures are logged, not propagated: teardown must not fail.
    pub async fn close(mut self) {
        if let Err(e) = self.subscriber.unsubscribe().await {
            warn!(error = %e, "failed to unsubscribe from change subjects");
        }
        drop(self.client);
    }
}

impl ChangeSource for NatsChangeSource {
    async fn next_change(&mut self) -> Result<Option<ChangeNotification>, SourceError> {
        loop {
            let Some(msg) = self.subscriber.next().await else {
                return Ok(None);
            };

            let Some((collection, op)) = parse_subject(&self.prefix, msg.subject.as_str())
            else {
                warn!(subject = %msg.subject, "skipping change on unrecognized subject");
                continue;
            };

            let record = serde_json::from_slice(&msg.payload).unwrap_or_else(|e| {
                warn!(
                    subject = %msg.subject,
                    error = %e,
                    "malformed change payload, delivering null record"
                );
                serde_json::Value::Null
            });

            return Ok(Some(ChangeNotification {
                collection,
                op,
                record,
            }));
        }
    }
}

/// Extract the collection and operation from a change subject.
///
/// Subject format: `{prefix}.{collection}.{op}`. Returns `None` when the
/// subject does not match the expected shape or carries an unknown
/// operation token.
fn parse_subject(prefix: &str, subject: &str) -> Option<(String, ChangeOp)> {
    let rest = subject.strip_prefix(prefix)?.strip_prefix('.')?;

    let mut parts = rest.split('.');
    let collection = parts.next()?;
    let op = ChangeOp::parse(parts.next()?)?;

    // Anything beyond `{collection}.{op}` is not ours.
    if parts.next().is_some() || collection.is_empty() {
        return None;
    }

    Some((collection.to_owned(), op))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "mediahub.changes";

    #[test]
    fn parse_valid_subject() {
        let parsed = parse_subject(PREFIX, "mediahub.changes.media.insert");
        assert_eq!(parsed, Some((String::from("media"), ChangeOp::Insert)));
    }

    #[test]
    fn parse_delete_subject() {
        let parsed = parse_subject(PREFIX, "mediahub.changes.channels.delete");
        assert_eq!(parsed, Some((String::from("channels"), ChangeOp::Delete)));
    }

    #[test]
    fn reject_foreign_prefix() {
        assert_eq!(parse_subject(PREFIX, "otherapp.changes.media.insert"), None);
    }

    #[test]
    fn reject_missing_segments() {
        assert_eq!(parse_subject(PREFIX, "mediahub.changes.media"), None);
        assert_eq!(parse_subject(PREFIX, "mediahub.changes"), None);
    }

    #[test]
    fn reject_unknown_operation() {
        assert_eq!(parse_subject(PREFIX, "mediahub.changes.media.truncate"), None);
    }

    #[test]
    fn reject_extra_segments() {
        assert_eq!(
            parse_subject(PREFIX, "mediahub.changes.media.insert.extra"),
            None
        );
    }

    #[test]
    fn reject_empty_collection() {
        assert_eq!(parse_subject(PREFIX, "mediahub.changes..insert"), None);
    }

    // Integration tests that require a live NATS server are marked #[ignore].
    #[tokio::test]
    #[ignore = "requires live NATS server (docker compose up -d)"]
    async fn connect_and_subscribe() {
        let result = NatsChangeSource::connect("nats://localhost:4222", PREFIX).await;
        assert!(result.is_ok());
    }
}

//! Versioned answer store with push distribution.
//!
//! Publishes are serialized through a single write lock, so version
//! numbers reflect true publish order even under concurrent publish
//! attempts. Reads take only the read lock and run concurrently.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::registry::{Outbound, SessionRegistry};
use crate::models::answer::AnswerRecord;
use crate::models::protocol::ServerFrame;
use crate::models::role::Role;

/// Holds the current answer and pushes updates to the subscriber.
pub struct AnswerDistributor {
    record: RwLock<AnswerRecord>,
    registry: Arc<SessionRegistry>,
}

impl AnswerDistributor {
    /// Create an empty distributor (no value, version 0).
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            record: RwLock::new(AnswerRecord::default()),
            registry,
        }
    }

    /// Publish a new answer value, bumping the version by exactly 1.
    ///
    /// Always succeeds, even when the value is unchanged. If a subscriber
    /// session is registered the new record is pushed to it immediately;
    /// push failure is logged and never retried — the pull path is the
    /// recovery mechanism.
    #[must_use]
    pub fn publish(&self, value: String) -> AnswerRecord {
        let record = {
            let mut record = self.record.write().unwrap_or_else(PoisonError::into_inner);
            record.version += 1;
            record.value = Some(value);
            record.clone()
        };
        info!(version = record.version, "answer published");

        if let (Some(subscriber), Some(value)) =
            (self.registry.get(Role::Subscriber), record.value.clone())
        {
            let frame = ServerFrame::Answer {
                value,
                version: record.version,
            };
            if subscriber.tx.try_send(Outbound::Frame(frame)).is_err() {
                warn!(
                    version = record.version,
                    "answer push to subscriber failed; pull remains the recovery path"
                );
            } else {
                debug!(version = record.version, "answer pushed to subscriber");
            }
        }

        record
    }

    /// The latest stored record. Value is absent and version is 0 until
    /// the first publish.
    #[must_use]
    pub fn current(&self) -> AnswerRecord {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Normalize an operator-supplied answer to its canonical short token:
/// the first character of the trimmed, lowercased input.
///
/// Returns `None` when the input is empty or whitespace-only.
#[must_use]
pub fn normalize_answer(raw: &str) -> Option<String> {
    raw.trim().to_lowercase().chars().next().map(String::from)
}

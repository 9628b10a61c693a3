//! Versioned answer record.

use serde::{Deserialize, Serialize};

/// The current answer and its monotonically increasing version.
///
/// `version` totally orders publishes: a client holding version `v` is
/// stale exactly when the server's version is strictly greater, whether
/// the record arrived by push or by pull. Version 0 means nothing has
/// been published yet and `value` is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AnswerRecord {
    /// Short opaque answer token; `None` before the first publish.
    pub value: Option<String>,
    /// Publish counter, bumped by exactly 1 per publish even when the
    /// value is unchanged. Resets to 0 only on process restart.
    pub version: u64,
}

impl AnswerRecord {
    /// Whether a locally cached `version` is stale relative to this record.
    #[must_use]
    pub fn is_newer_than(&self, cached_version: u64) -> bool {
        self.version > cached_version
    }
}

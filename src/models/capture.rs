//! Capture request state machine types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Occupancy of the single capture slot.
///
/// `Fulfilled` and `TimedOut` are instantaneous terminal states: the slot
/// returns to `Idle` in the same critical section that resolves the
/// waiting caller, so they are represented by [`CaptureOutcome`] rather
/// than by slot states of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureState {
    /// No capture in flight; the slot is free.
    #[default]
    Idle,
    /// A command has been forwarded to the provider and a caller is waiting.
    Requested,
}

/// An in-flight capture request occupying the slot.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Unique request identifier, used for log correlation only.
    pub id: Uuid,
    /// When the requester asked for the capture.
    pub requested_at: DateTime<Utc>,
}

impl CaptureRequest {
    /// Create a request stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            requested_at: Utc::now(),
        }
    }
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal resolution of a capture request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The provider delivered a payload within the timeout window.
    Fulfilled(String),
    /// The timeout fired before the provider replied. A defined,
    /// reportable outcome — not an error.
    TimedOut,
}

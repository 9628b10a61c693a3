//! WebSocket wire frames exchanged with providers and subscribers.
//!
//! Frames are JSON objects tagged by a `type` field. Liveness probes are
//! not frames: they ride on native WebSocket ping/pong messages handled
//! by the transport layer.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Frames a peer sends to the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Claim a role on this connection, superseding any previous holder.
    Register {
        /// Requested role name; validated against the known role set.
        role: String,
    },
    /// Provider delivering the payload for the in-flight capture.
    CaptureResult {
        /// Opaque captured payload.
        payload: String,
    },
}

/// Frames the coordinator sends to a peer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Registration acknowledgement. Subscribers additionally receive a
    /// snapshot of the current answer so they can reconcile immediately.
    Registered {
        /// The role that was granted.
        role: Role,
        /// Current answer value, present for subscribers only.
        #[serde(skip_serializing_if = "Option::is_none")]
        answer: Option<String>,
        /// Current answer version, present for subscribers only.
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<u64>,
    },
    /// Command instructing the provider to capture now.
    Capture,
    /// Answer push to the subscriber.
    Answer {
        /// The just-published answer value.
        value: String,
        /// Version assigned to this publish.
        version: u64,
    },
}

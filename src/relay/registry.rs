//! Session registry: at most one live connection per role.
//!
//! A new registration for a role silently supersedes the previous holder
//! (last writer wins); the superseded connection's outbound channel is
//! dropped, which closes its socket loop. Unregistration is guarded by
//! connection identity so a late disconnect from a superseded connection
//! cannot evict its replacement.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::protocol::ServerFrame;
use crate::models::role::Role;

/// Message handed to a connection's outbound writer task.
#[derive(Debug)]
pub enum Outbound {
    /// JSON frame to serialize onto the socket.
    Frame(ServerFrame),
    /// Native WebSocket ping for the liveness probe.
    Ping,
}

/// Cloneable handle to a registered peer connection.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    /// Connection identity, used for identity-guarded unregistration.
    pub conn_id: Uuid,
    /// Sender feeding the connection's outbound writer task.
    pub tx: mpsc::Sender<Outbound>,
}

struct SessionEntry {
    conn_id: Uuid,
    tx: mpsc::Sender<Outbound>,
    last_seen: DateTime<Utc>,
    awaiting_pong: bool,
}

/// Tracks the single live connection per role.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Role, SessionEntry>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Role, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `conn_id` as the live connection for `role`.
    ///
    /// Any previous holder is replaced without error; dropping its sender
    /// closes the superseded connection's outbound loop.
    pub fn register(&self, role: Role, conn_id: Uuid, tx: mpsc::Sender<Outbound>) {
        let entry = SessionEntry {
            conn_id,
            tx,
            last_seen: Utc::now(),
            awaiting_pong: false,
        };
        let superseded = self.lock().insert(role, entry);
        if let Some(old) = superseded {
            info!(%role, old_conn_id = %old.conn_id, new_conn_id = %conn_id, "registration superseded previous connection");
        } else {
            info!(%role, %conn_id, "peer registered");
        }
    }

    /// Current connection handle for `role`, if one is registered.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<PeerHandle> {
        self.lock().get(&role).map(|entry| PeerHandle {
            conn_id: entry.conn_id,
            tx: entry.tx.clone(),
        })
    }

    /// Whether any connection currently holds `role`.
    #[must_use]
    pub fn is_registered(&self, role: Role) -> bool {
        self.lock().contains_key(&role)
    }

    /// Remove whatever role `conn_id` currently holds, if any.
    ///
    /// A no-op when the connection was already superseded: only the
    /// current occupant of a role can be removed by its own disconnect.
    #[must_use]
    pub fn unregister(&self, conn_id: Uuid) -> Option<Role> {
        let mut sessions = self.lock();
        let role = sessions
            .iter()
            .find(|(_, entry)| entry.conn_id == conn_id)
            .map(|(role, _)| *role)?;
        sessions.remove(&role);
        info!(%role, %conn_id, "peer unregistered");
        Some(role)
    }

    /// Record a pong from `conn_id`, clearing its awaiting flag and
    /// refreshing its last-seen timestamp.
    pub fn record_pong(&self, conn_id: Uuid) {
        let mut sessions = self.lock();
        if let Some(entry) = sessions.values_mut().find(|e| e.conn_id == conn_id) {
            entry.awaiting_pong = false;
            entry.last_seen = Utc::now();
            debug!(%conn_id, "pong received");
        }
    }

    /// One liveness pass: evict sessions that missed the previous probe,
    /// then probe the survivors.
    ///
    /// Returns the evicted roles with their last-seen timestamps so the
    /// monitor can log them. Probe delivery is best effort; a session
    /// whose outbound queue rejects the ping stays marked awaiting and
    /// falls to the next sweep.
    #[must_use]
    pub fn sweep(&self) -> Vec<(Role, DateTime<Utc>)> {
        let mut sessions = self.lock();

        let stale: Vec<(Role, DateTime<Utc>)> = sessions
            .iter()
            .filter(|(_, entry)| entry.awaiting_pong)
            .map(|(role, entry)| (*role, entry.last_seen))
            .collect();
        for (role, _) in &stale {
            sessions.remove(role);
        }

        for (role, entry) in &mut *sessions {
            entry.awaiting_pong = true;
            if entry.tx.try_send(Outbound::Ping).is_err() {
                debug!(%role, conn_id = %entry.conn_id, "ping not delivered; outbound queue unavailable");
            }
        }

        stale
    }
}

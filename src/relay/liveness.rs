//! Liveness monitor for registered peer sessions.
//!
//! Runs as a background task probing every registered session on a fixed
//! interval. A session that fails to answer one probe before the next
//! tick is evicted. Best-effort liveness only: evicting a slow-but-alive
//! peer is acceptable, and a dead peer survives at most one interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::registry::SessionRegistry;

/// Spawn the liveness probe background task.
///
/// Each tick evicts sessions still awaiting the previous pong, then
/// pings the rest. Cancelling `cancel` stops the task.
#[must_use]
pub fn spawn_liveness_monitor(
    registry: Arc<SessionRegistry>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("liveness monitor shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    for (role, last_seen) in registry.sweep() {
                        warn!(%role, %last_seen, "evicted unresponsive session");
                    }
                }
            }
        }
    })
}

//! Single-flight capture coordinator.
//!
//! Enforces at most one in-flight capture request and correlates the
//! provider's asynchronous reply (or a timeout) back to the one waiting
//! caller. Correlation is positional: with a single slot, any result
//! received while `Requested` belongs to the in-flight request.
//!
//! The slot is guarded by a synchronous mutex so a drop guard can free it
//! when the requester's connection drops mid-wait; the lock is never held
//! across an await point.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::registry::{Outbound, SessionRegistry};
use crate::models::capture::{CaptureOutcome, CaptureRequest, CaptureState};
use crate::models::protocol::ServerFrame;
use crate::models::role::Role;
use crate::{AppError, Result};

#[derive(Default)]
struct CaptureSlot {
    state: CaptureState,
    /// Identity of the current arming; a stale timer or guard whose
    /// generation no longer matches cannot touch a newer request.
    generation: u64,
    request: Option<CaptureRequest>,
    waiter: Option<oneshot::Sender<CaptureOutcome>>,
    last_result: Option<String>,
}

/// Owns the single capture slot and its resolution machinery.
pub struct CaptureCoordinator {
    slot: Mutex<CaptureSlot>,
    timeout: Duration,
}

impl CaptureCoordinator {
    /// Create a coordinator with the given provider-reply timeout window.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            slot: Mutex::new(CaptureSlot::default()),
            timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CaptureSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a capture and wait for its resolution.
    ///
    /// Forwards a capture command to the current provider, then suspends
    /// until the provider delivers a result or the timeout window closes.
    /// If this future is dropped before resolution (requester disconnect)
    /// the slot is freed for the next caller.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProviderUnavailable` when no provider session
    /// exists, or `AppError::AlreadyInFlight` when the slot is busy; in
    /// both cases the in-flight request, if any, is undisturbed. A
    /// timeout is not an error: it resolves to
    /// [`CaptureOutcome::TimedOut`].
    pub async fn start_capture(&self, registry: &SessionRegistry) -> Result<CaptureOutcome> {
        let provider = registry
            .get(Role::Provider)
            .ok_or(AppError::ProviderUnavailable)?;

        let (generation, request_id, rx) = {
            let mut slot = self.lock();
            if slot.state == CaptureState::Requested {
                return Err(AppError::AlreadyInFlight);
            }
            let request = CaptureRequest::new();
            let request_id = request.id;
            let (tx, rx) = oneshot::channel();
            slot.generation += 1;
            slot.state = CaptureState::Requested;
            slot.request = Some(request);
            slot.waiter = Some(tx);
            (slot.generation, request_id, rx)
        };

        // Frees the slot on early drop or timeout; a generation mismatch
        // makes it a no-op once a newer request has armed the slot.
        let _guard = SlotGuard {
            coordinator: self,
            generation,
        };

        info!(%request_id, "capture requested; forwarding command to provider");

        if provider
            .tx
            .send(Outbound::Frame(ServerFrame::Capture))
            .await
            .is_err()
        {
            warn!(%request_id, "provider connection closed before command delivery");
            return Err(AppError::ProviderUnavailable);
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) | Err(_) => {
                info!(
                    %request_id,
                    timeout_seconds = self.timeout.as_secs(),
                    "capture timed out"
                );
                Ok(CaptureOutcome::TimedOut)
            }
        }
    }

    /// Accept a capture result from the provider.
    ///
    /// While a request is in flight the waiting caller is resolved with
    /// the payload and the slot returns to idle. A result arriving while
    /// idle (late, after a timeout already resolved the caller) is stored
    /// as the latest result but resolves nobody and changes no state.
    pub fn deliver_result(&self, payload: String) {
        let mut slot = self.lock();
        slot.last_result = Some(payload.clone());

        if slot.state != CaptureState::Requested {
            debug!("capture result arrived while idle; stored as latest result only");
            return;
        }

        let request = slot.request.take();
        if let Some(waiter) = slot.waiter.take() {
            let _ = waiter.send(CaptureOutcome::Fulfilled(payload));
        }
        slot.state = CaptureState::Idle;

        if let Some(request) = request {
            let elapsed_ms = (Utc::now() - request.requested_at).num_milliseconds();
            info!(request_id = %request.id, elapsed_ms, "capture fulfilled");
        }
    }

    /// Latest stored capture payload, including late arrivals.
    #[must_use]
    pub fn last_result(&self) -> Option<String> {
        self.lock().last_result.clone()
    }

    /// Whether a capture request is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.lock().state == CaptureState::Requested
    }

    fn release_if_pending(&self, generation: u64) {
        let mut slot = self.lock();
        if slot.generation == generation && slot.state == CaptureState::Requested {
            slot.state = CaptureState::Idle;
            slot.request = None;
            slot.waiter = None;
        }
    }
}

struct SlotGuard<'a> {
    coordinator: &'a CaptureCoordinator,
    generation: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.release_if_pending(self.generation);
    }
}

//! Unit tests for the capture coordinator state machine: single-flight
//! enforcement, timeout resolution, late results, and cancellation.

use std::sync::Arc;
use std::time::Duration;

use capture_relay::models::capture::CaptureOutcome;
use capture_relay::models::protocol::ServerFrame;
use capture_relay::models::role::Role;
use capture_relay::relay::registry::{Outbound, SessionRegistry};
use capture_relay::relay::CaptureCoordinator;
use capture_relay::AppError;
use tokio::sync::mpsc;
use uuid::Uuid;

fn setup(
    timeout: Duration,
) -> (
    Arc<CaptureCoordinator>,
    Arc<SessionRegistry>,
    mpsc::Receiver<Outbound>,
) {
    let registry = Arc::new(SessionRegistry::new());
    let (tx, rx) = mpsc::channel(8);
    registry.register(Role::Provider, Uuid::new_v4(), tx);
    (Arc::new(CaptureCoordinator::new(timeout)), registry, rx)
}

#[tokio::test]
async fn no_provider_fails_immediately() {
    let registry = SessionRegistry::new();
    let coordinator = CaptureCoordinator::new(Duration::from_secs(5));

    let err = coordinator.start_capture(&registry).await.unwrap_err();
    assert!(matches!(err, AppError::ProviderUnavailable));
    assert!(!coordinator.is_in_flight());
}

#[tokio::test]
async fn provider_reply_fulfills_the_waiting_caller() {
    let (coordinator, registry, mut provider_rx) = setup(Duration::from_secs(5));

    let waiting = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        let registry = Arc::clone(&registry);
        async move { coordinator.start_capture(&registry).await }
    });

    // Provider receives the forwarded command.
    let command = provider_rx.recv().await.expect("capture command");
    assert!(matches!(command, Outbound::Frame(ServerFrame::Capture)));

    coordinator.deliver_result("payload-1".into());

    let outcome = waiting.await.expect("task").expect("capture succeeds");
    assert_eq!(outcome, CaptureOutcome::Fulfilled("payload-1".into()));
    assert!(!coordinator.is_in_flight());
    assert_eq!(coordinator.last_result().as_deref(), Some("payload-1"));
}

#[tokio::test]
async fn second_capture_while_in_flight_fails_without_disturbing_first() {
    let (coordinator, registry, mut provider_rx) = setup(Duration::from_secs(5));

    let waiting = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        let registry = Arc::clone(&registry);
        async move { coordinator.start_capture(&registry).await }
    });

    // Wait until the first request has armed the slot.
    let _command = provider_rx.recv().await.expect("capture command");
    assert!(coordinator.is_in_flight());

    let err = coordinator.start_capture(&registry).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyInFlight));

    // The rejected call must not have produced a second provider command.
    assert!(provider_rx.try_recv().is_err());

    // The in-flight request still resolves normally.
    coordinator.deliver_result("payload-2".into());
    let outcome = waiting.await.expect("task").expect("capture succeeds");
    assert_eq!(outcome, CaptureOutcome::Fulfilled("payload-2".into()));
}

#[tokio::test]
async fn timeout_resolves_caller_and_frees_slot() {
    let (coordinator, registry, mut provider_rx) = setup(Duration::from_millis(100));

    let outcome = coordinator
        .start_capture(&registry)
        .await
        .expect("timeout is an outcome, not an error");
    assert_eq!(outcome, CaptureOutcome::TimedOut);
    assert!(!coordinator.is_in_flight());

    // The command was still forwarded before the window closed.
    assert!(matches!(
        provider_rx.try_recv(),
        Ok(Outbound::Frame(ServerFrame::Capture))
    ));
}

#[tokio::test]
async fn late_result_after_timeout_is_stored_but_resolves_nobody() {
    let (coordinator, registry, _provider_rx) = setup(Duration::from_millis(100));

    let outcome = coordinator.start_capture(&registry).await.expect("timeout");
    assert_eq!(outcome, CaptureOutcome::TimedOut);

    // Provider replies after the caller was already resolved.
    coordinator.deliver_result("late-payload".into());
    assert!(!coordinator.is_in_flight());
    assert_eq!(coordinator.last_result().as_deref(), Some("late-payload"));
}

#[tokio::test]
async fn slot_is_reusable_after_timeout() {
    let (coordinator, registry, mut provider_rx) = setup(Duration::from_millis(100));

    let first = coordinator.start_capture(&registry).await.expect("timeout");
    assert_eq!(first, CaptureOutcome::TimedOut);
    let _ = provider_rx.try_recv();

    let waiting = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        let registry = Arc::clone(&registry);
        async move { coordinator.start_capture(&registry).await }
    });

    let _command = provider_rx.recv().await.expect("second capture command");
    coordinator.deliver_result("second".into());

    let outcome = waiting.await.expect("task").expect("capture succeeds");
    assert_eq!(outcome, CaptureOutcome::Fulfilled("second".into()));
}

#[tokio::test]
async fn requester_disconnect_frees_the_slot() {
    let (coordinator, registry, mut provider_rx) = setup(Duration::from_secs(30));

    let waiting = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        let registry = Arc::clone(&registry);
        async move { coordinator.start_capture(&registry).await }
    });

    let _command = provider_rx.recv().await.expect("capture command");
    assert!(coordinator.is_in_flight());

    // Dropping the waiting future models the requester's connection
    // going away before resolution.
    waiting.abort();
    let _ = waiting.await;

    assert!(!coordinator.is_in_flight());

    // The slot is immediately available to the next requester.
    let next = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        let registry = Arc::clone(&registry);
        async move { coordinator.start_capture(&registry).await }
    });
    let _command = provider_rx.recv().await.expect("next capture command");
    coordinator.deliver_result("after-cancel".into());
    let outcome = next.await.expect("task").expect("capture succeeds");
    assert_eq!(outcome, CaptureOutcome::Fulfilled("after-cancel".into()));
}

#[tokio::test]
async fn result_while_idle_never_marks_in_flight() {
    let coordinator = CaptureCoordinator::new(Duration::from_secs(5));
    coordinator.deliver_result("unsolicited".into());
    assert!(!coordinator.is_in_flight());
    assert_eq!(coordinator.last_result().as_deref(), Some("unsolicited"));
}

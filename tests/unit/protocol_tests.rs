//! Unit tests for wire frame serialization.

use capture_relay::models::protocol::{ClientFrame, ServerFrame};
use capture_relay::models::role::Role;
use serde_json::json;

#[test]
fn register_frame_parses_from_wire_json() {
    let frame: ClientFrame =
        serde_json::from_value(json!({"type": "register", "role": "provider"})).unwrap();
    assert_eq!(
        frame,
        ClientFrame::Register {
            role: "provider".into()
        }
    );
}

#[test]
fn register_frame_accepts_unknown_role_strings() {
    // Role validation happens at registration time, not at parse time.
    let frame: ClientFrame =
        serde_json::from_value(json!({"type": "register", "role": "intruder"})).unwrap();
    assert!(matches!(frame, ClientFrame::Register { ref role } if role == "intruder"));
}

#[test]
fn capture_result_frame_carries_opaque_payload() {
    let frame: ClientFrame =
        serde_json::from_value(json!({"type": "capture_result", "payload": "aGVsbG8="})).unwrap();
    assert_eq!(
        frame,
        ClientFrame::CaptureResult {
            payload: "aGVsbG8=".into()
        }
    );
}

#[test]
fn unknown_frame_type_is_rejected() {
    let result = serde_json::from_value::<ClientFrame>(json!({"type": "shutdown"}));
    assert!(result.is_err());
}

#[test]
fn capture_command_serializes_to_bare_tag() {
    let json = serde_json::to_value(&ServerFrame::Capture).unwrap();
    assert_eq!(json, json!({"type": "capture"}));
}

#[test]
fn provider_ack_omits_absent_snapshot_fields() {
    let json = serde_json::to_value(&ServerFrame::Registered {
        role: Role::Provider,
        answer: None,
        version: None,
    })
    .unwrap();
    assert_eq!(json, json!({"type": "registered", "role": "provider"}));
}

#[test]
fn subscriber_ack_includes_snapshot() {
    let json = serde_json::to_value(&ServerFrame::Registered {
        role: Role::Subscriber,
        answer: Some("b".into()),
        version: Some(4),
    })
    .unwrap();
    assert_eq!(
        json,
        json!({"type": "registered", "role": "subscriber", "answer": "b", "version": 4})
    );
}

#[test]
fn answer_push_round_trips() {
    let frame = ServerFrame::Answer {
        value: "c".into(),
        version: 7,
    };
    let json = serde_json::to_string(&frame).unwrap();
    let parsed: ServerFrame = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, frame);
}

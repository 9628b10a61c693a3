//! Unit tests for role parsing and serialization.

use capture_relay::models::role::Role;
use capture_relay::AppError;

#[test]
fn known_roles_parse() {
    assert_eq!("provider".parse::<Role>().unwrap(), Role::Provider);
    assert_eq!("subscriber".parse::<Role>().unwrap(), Role::Subscriber);
}

#[test]
fn unknown_role_is_invalid_role_error() {
    let err = "requester".parse::<Role>().unwrap_err();
    assert!(matches!(err, AppError::InvalidRole(ref name) if name == "requester"));
}

#[test]
fn case_sensitive_parsing() {
    assert!("Provider".parse::<Role>().is_err());
    assert!(" provider".parse::<Role>().is_err());
}

#[test]
fn display_round_trips_through_parse() {
    for role in [Role::Provider, Role::Subscriber] {
        let parsed: Role = role.to_string().parse().unwrap();
        assert_eq!(parsed, role);
    }
}

#[test]
fn serde_uses_snake_case_names() {
    assert_eq!(
        serde_json::to_string(&Role::Provider).unwrap(),
        "\"provider\""
    );
    assert_eq!(
        serde_json::from_str::<Role>("\"subscriber\"").unwrap(),
        Role::Subscriber
    );
}

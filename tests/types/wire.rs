use core::time::Duration;

use serde::Deserialize;
use vault_rail::retry::BackoffPolicy;
use vault_rail::sentinels::{GENERAL_FAILURE, NOT_READY, PEER_CONNECTION};
use vault_rail::StructuredError;

#[derive(Deserialize)]
struct Envelope {
    status: u16,
    error: Option<StructuredError>,
}

#[test]
fn error_survives_response_envelope() {
    let json = format!(r#"{{"status":503,"error":{}}}"#, serde_json::to_string(&NOT_READY).unwrap());
    let envelope: Envelope = serde_json::from_str(&json).unwrap();

    assert_eq!(envelope.status, 503);
    let error = envelope.error.unwrap();
    assert_eq!(error, NOT_READY);
    assert_eq!(error.message(), NOT_READY.message());
}

#[test]
fn cause_is_not_transmitted() {
    let sent = PEER_CONNECTION.wrap("dial tcp 10.0.0.4:8200: connection refused");
    let received: StructuredError =
        serde_json::from_str(&serde_json::to_string(&sent).unwrap()).unwrap();

    assert_eq!(received, sent);
    assert!(received.cause().is_none());
}

#[test]
fn unknown_code_in_envelope_degrades() {
    let envelope: Envelope =
        serde_json::from_str(r#"{"status":500,"error":"introduced_in_v9"}"#).unwrap();
    assert_eq!(envelope.error.unwrap(), GENERAL_FAILURE);
}

#[test]
fn non_string_code_is_rejected() {
    assert!(serde_json::from_str::<StructuredError>("42").is_err());
}

#[test]
fn backoff_policy_fills_missing_fields_with_defaults() {
    let policy: BackoffPolicy = serde_json::from_str(r#"{"multiplier":2.0}"#).unwrap();

    assert_eq!(policy.multiplier, 2.0);
    assert_eq!(policy, BackoffPolicy::new().with_multiplier(2.0));
}

#[test]
fn backoff_policy_null_ceiling_is_unbounded() {
    let policy: BackoffPolicy = serde_json::from_str(
        r#"{"initial_interval":{"secs":0,"nanos":1000000},"max_elapsed_time":null}"#,
    )
    .unwrap();

    assert_eq!(policy.initial_interval, Duration::from_millis(1));
    assert_eq!(policy.max_elapsed_time, None);
    assert!(policy.validate().is_ok());
}

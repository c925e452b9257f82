//! Tests for the error payload and the access failure mapping.

use super::*;
use rstest::rstest;

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "bad");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::internal("boom").try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn trace_id_is_captured_in_scope() {
    let trace_id = TraceId::generate();
    let error = TraceId::scope(trace_id, async { Error::forbidden("nope") }).await;
    assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise");
    assert_eq!(value, json!({ "code": "not_found", "message": "missing" }));

    let traced = Error::not_found("missing").with_trace_id("abc");
    let value = serde_json::to_value(traced).expect("serialise");
    assert_eq!(value.get("traceId").and_then(Value::as_str), Some("abc"));
}

#[rstest]
#[case(AccessError::validation("title", "must not be empty"), ErrorCode::InvalidRequest)]
#[case(AccessError::DuplicateUsername, ErrorCode::Conflict)]
#[case(AccessError::DuplicateEmail, ErrorCode::Conflict)]
#[case(AccessError::AuthenticationFailed, ErrorCode::Unauthorized)]
#[case(AccessError::AuthorizationDenied, ErrorCode::Forbidden)]
#[case(AccessError::SelfDeletionForbidden, ErrorCode::Forbidden)]
#[case(AccessError::not_found("note"), ErrorCode::NotFound)]
#[case(AccessError::unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(AccessError::internal("boom"), ErrorCode::InternalError)]
fn access_errors_map_to_stable_codes(#[case] failure: AccessError, #[case] expected: ErrorCode) {
    assert_eq!(Error::from(failure).code(), expected);
}

#[rstest]
fn validation_details_name_the_field() {
    let error = Error::from(AccessError::validation("email", "bad shape"));
    let details = error.details().expect("details");
    assert_eq!(details.get("field").and_then(Value::as_str), Some("email"));
    assert_eq!(details.get("reason").and_then(Value::as_str), Some("bad shape"));
}

#[rstest]
fn forbidden_kinds_are_distinguished_by_detail_code() {
    let denied = Error::from(AccessError::AuthorizationDenied);
    let self_delete = Error::from(AccessError::SelfDeletionForbidden);
    assert_eq!(
        denied.details().and_then(|d| d.get("code")).and_then(Value::as_str),
        Some("authorization_denied")
    );
    assert_eq!(
        self_delete.details().and_then(|d| d.get("code")).and_then(Value::as_str),
        Some("self_deletion_forbidden")
    );
}

#[rstest]
fn authentication_failure_message_is_generic() {
    let error = Error::from(AccessError::AuthenticationFailed);
    assert_eq!(error.message(), "invalid credentials");
    assert!(error.details().is_none());
}

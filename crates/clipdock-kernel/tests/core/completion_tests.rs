use super::*;
use clipdock_contracts::{CommandOutcome, codes, not_implemented};
use serde_json::Value;

#[tokio::test]
async fn resolve_should_deliver_success_exactly_once() {
    let (handle, ticket) = completion_channel("extractFrame");
    handle.success(Value::String("/tmp/frame_1.png".to_string()));

    match ticket.wait().await {
        CommandOutcome::Success(Value::String(path)) => assert_eq!(path, "/tmp/frame_1.png"),
        other => panic!("expected success outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_should_stay_distinct_from_error() {
    let (handle, ticket) = completion_channel("saveFile");
    handle.cancelled();

    let outcome = ticket.wait().await;
    assert!(outcome.is_cancelled());
    assert!(outcome.error_code().is_none());
}

#[tokio::test]
async fn dropped_handle_should_surface_completion_dropped() {
    let (handle, ticket) = completion_channel("saveFile");
    drop(handle);

    let outcome = ticket.wait().await;
    assert_eq!(outcome.error_code(), Some("completion_dropped"));
}

#[tokio::test]
async fn error_should_carry_channel_code() {
    let (handle, ticket) = completion_channel("transcodeAudio");
    handle.error(not_implemented("transcodeAudio"));

    let outcome = ticket.wait().await;
    assert_eq!(outcome.error_code(), Some(codes::NOT_IMPLEMENTED));
}

#[tokio::test]
async fn resolving_after_ticket_dropped_should_not_panic() {
    let (handle, ticket) = completion_channel("saveFile");
    drop(ticket);
    handle.cancelled();
}

use super::*;
use crate::net::test_helpers::{MockConnection, MockConnector};

fn mounted(state: ReadyState) -> (ChatView<MockConnection>, MockConnector) {
    let mut connector = MockConnector::new(state);
    let mut view = ChatView::new();
    view.on_mount(&mut connector);
    (view, connector)
}

// =============================================================
// Mount / unmount
// =============================================================

#[test]
fn mount_opens_fixed_endpoint_once() {
    let (mut view, mut connector) = mounted(ReadyState::Connecting);
    view.on_mount(&mut connector);
    assert_eq!(connector.endpoints(), vec!["ws://localhost:8080/ws".to_owned()]);
    assert!(view.is_mounted());
    assert_eq!(view.connection_state(), Some(ReadyState::Connecting));
}

#[test]
fn failed_open_leaves_view_state_untouched() {
    let (view, _connector) = mounted(ReadyState::Closed);
    assert!(view.messages().is_empty());
    assert_eq!(view.input(), "");
    assert_eq!(view.connection_state(), Some(ReadyState::Closed));
}

#[test]
fn unmount_closes_exactly_once_and_stops_processing_frames() {
    let (mut view, connector) = mounted(ReadyState::Open);
    view.on_inbound_frame(r#"{"username":"a","text":"before"}"#).expect("frame");

    view.on_unmount();
    view.on_unmount();
    view.on_inbound_frame(r#"{"username":"a","text":"after"}"#).expect("ignored");

    assert_eq!(connector.closes(), 1);
    assert_eq!(view.messages().len(), 1);
    assert!(!view.is_mounted());
}

#[test]
fn remount_after_unmount_does_not_open_second_connection() {
    let (mut view, mut connector) = mounted(ReadyState::Open);
    view.on_unmount();
    view.on_mount(&mut connector);
    assert_eq!(connector.endpoints().len(), 1);
}

// =============================================================
// Inbound frames
// =============================================================

#[test]
fn inbound_frames_append_in_arrival_order() {
    let (mut view, _connector) = mounted(ReadyState::Open);
    let frames = [
        r#"{"username":"ana","text":"one"}"#,
        r#"{"username":"bo","text":"two"}"#,
        r#"{"username":"ana","text":"one"}"#,
    ];
    for raw in frames {
        view.on_inbound_frame(raw).expect("valid frame");
    }

    let texts: Vec<String> = view.messages().iter().map(ReceivedMessage::text).collect();
    assert_eq!(texts, vec!["one", "two", "one"]);
    assert_eq!(view.messages()[1].username(), "bo");
}

#[test]
fn inbound_frame_missing_text_is_still_appended() {
    let (mut view, _connector) = mounted(ReadyState::Open);
    view.on_inbound_frame(r#"{"username":"ana"}"#).expect("valid json");

    assert_eq!(view.messages().len(), 1);
    assert_eq!(view.messages()[0].value(), &serde_json::json!({"username":"ana"}));
    assert_eq!(view.messages()[0].text(), "");
}

#[test]
fn inbound_frame_keeps_extra_fields_unchanged() {
    let (mut view, _connector) = mounted(ReadyState::Open);
    let raw = r#"{"username":"ana","text":"hi","time":"2024-03-01T12:30:00Z"}"#;
    view.on_inbound_frame(raw).expect("valid json");
    assert_eq!(view.messages()[0].value()["time"], "2024-03-01T12:30:00Z");
}

#[test]
fn malformed_inbound_frame_is_rejected_and_not_appended() {
    let (mut view, _connector) = mounted(ReadyState::Open);
    let err = view.on_inbound_frame("{not json").expect_err("malformed");
    assert!(matches!(err, ViewError::MalformedFrame(_)));
    assert!(view.messages().is_empty());

    view.on_inbound_frame(r#"{"username":"a","text":"b"}"#).expect("later frames still work");
    assert_eq!(view.messages().len(), 1);
}

#[test]
fn received_message_renders_non_string_fields_as_json() {
    let msg = ReceivedMessage::new(serde_json::json!({"username": 7, "text": null}));
    assert_eq!(msg.username(), "7");
    assert_eq!(msg.text(), "");
}

// =============================================================
// Input + send
// =============================================================

#[test]
fn input_change_replaces_buffer_verbatim() {
    let (mut view, _connector) = mounted(ReadyState::Open);
    view.on_input_change("  spaced  ");
    assert_eq!(view.input(), "  spaced  ");
    view.on_input_change("");
    assert_eq!(view.input(), "");
}

#[test]
fn whitespace_send_is_ignored_and_buffer_kept() {
    let (mut view, connector) = mounted(ReadyState::Open);
    view.on_input_change("  ");

    assert_eq!(view.on_send_clicked(), SendOutcome::Ignored);
    assert_eq!(view.input(), "  ");
    assert!(view.messages().is_empty());
    assert!(connector.sent().is_empty());
}

#[test]
fn send_while_open_emits_one_frame_and_clears_buffer() {
    let (mut view, connector) = mounted(ReadyState::Open);
    view.on_input_change("hello");

    assert_eq!(view.on_send_clicked(), SendOutcome::Sent);
    assert_eq!(connector.sent(), vec![r#"{"username":"User","text":"hello"}"#.to_owned()]);
    assert_eq!(view.input(), "");
}

#[test]
fn send_keeps_untrimmed_text() {
    let (mut view, connector) = mounted(ReadyState::Open);
    view.on_input_change(" hello ");
    view.on_send_clicked();
    assert_eq!(connector.sent(), vec![r#"{"username":"User","text":" hello "}"#.to_owned()]);
}

#[test]
fn send_while_not_open_drops_message_and_clears_buffer() {
    for state in [ReadyState::Connecting, ReadyState::Closing, ReadyState::Closed] {
        let (mut view, connector) = mounted(state);
        view.on_input_change("hello");

        assert_eq!(view.on_send_clicked(), SendOutcome::Dropped);
        assert!(connector.sent().is_empty());
        assert_eq!(view.input(), "");
    }
}

#[test]
fn send_does_not_append_locally() {
    let (mut view, _connector) = mounted(ReadyState::Open);
    view.on_input_change("hello");
    view.on_send_clicked();
    assert!(view.messages().is_empty());
}

#[test]
fn send_after_connection_drops_is_silently_dropped() {
    let (mut view, connector) = mounted(ReadyState::Open);
    connector.set_state(ReadyState::Closed);
    view.on_input_change("hello");
    assert_eq!(view.on_send_clicked(), SendOutcome::Dropped);
    assert!(connector.sent().is_empty());
}

#[test]
fn send_before_mount_is_dropped() {
    let mut view = ChatView::<MockConnection>::new();
    view.on_input_change("hello");
    assert_eq!(view.on_send_clicked(), SendOutcome::Dropped);
    assert_eq!(view.input(), "");
}

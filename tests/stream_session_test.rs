//! End-to-end tests for stream sessions fed by in-memory byte streams.
//!
//! Covers chunk-boundary independence, UTF-8 and CRLF handling, completion
//! and cancellation, and reuse of a session after `reset()`.

mod common;

use bytes::Bytes;
use chatstream::adapters::mock::channel_stream;
use chatstream::{SessionSnapshot, StreamError, StreamHandle, StreamSession, StreamStatus};
use common::{chunked, content_event, parse_text, run_chunks, split_at, sse_body};

fn multibyte_body() -> Vec<u8> {
    let events = [
        content_event("héllo "),
        content_event("wörld "),
        content_event("日本語 "),
        content_event("🚀🎉"),
        "[DONE]".to_string(),
    ];
    let refs: Vec<&str> = events.iter().map(String::as_str).collect();
    sse_body(&refs)
}

#[tokio::test]
async fn test_every_two_way_split_yields_same_text() {
    let body = multibyte_body();
    let expected = "héllo wörld 日本語 🚀🎉";

    for at in 0..=body.len() {
        let snapshot = run_chunks(split_at(&body, at)).await;
        assert_eq!(snapshot.text, expected, "split at byte {}", at);
        assert_eq!(snapshot.status, StreamStatus::Completed, "split at byte {}", at);
        assert!(snapshot.error.is_none());
    }
}

#[test]
fn test_parser_chunk_size_independence() {
    let body = multibyte_body();
    let whole = parse_text(&[body.clone()]);
    for size in 1..=16 {
        assert_eq!(parse_text(&chunked(&body, size)), whole, "chunk size {}", size);
    }
}

#[tokio::test]
async fn test_multibyte_character_split_across_chunks() {
    // "é" is 0xC3 0xA9; split between the two bytes
    let body = "data: caf\u{e9}\n\n".as_bytes().to_vec();
    let at = body.iter().position(|&b| b == 0xC3).unwrap() + 1;
    let snapshot = run_chunks(split_at(&body, at)).await;
    assert_eq!(snapshot.text, "café");
    assert!(!snapshot.text.contains('\u{FFFD}'));
}

#[tokio::test]
async fn test_crlf_split_between_cr_and_lf() {
    let body = b"data: {\"content\":\"x\"}\r\n\r\ndata: [DONE]\r\n\r\n".to_vec();
    let at = body.iter().position(|&b| b == b'\r').unwrap() + 1;
    let snapshot = run_chunks(split_at(&body, at)).await;
    assert_eq!(snapshot.text, "x");
    assert_eq!(snapshot.status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_json_event_split_mid_object() {
    let snapshot = run_chunks(vec![
        b"data: {\"content\":\"ab\"}\n\ndata: {\"con".to_vec(),
        b"tent\":\"cd\"}\n\ndata: [DONE]\n\n".to_vec(),
    ])
    .await;
    assert_eq!(snapshot.text, "abcd");
    assert_eq!(snapshot.status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_literal_text_payload() {
    let snapshot = run_chunks(vec![b"data: hello\n\n".to_vec()]).await;
    assert_eq!(snapshot.text, "hello");
    assert_eq!(snapshot.status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_empty_data_line_is_ignored() {
    let snapshot = run_chunks(vec![b"data: \n\ndata: [DONE]\n\n".to_vec()]).await;
    assert_eq!(snapshot.text, "");
    assert_eq!(snapshot.status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_unexpected_field_types_do_not_drop_content() {
    let body = sse_body(&[
        r#"{"content":"a","choices":null}"#,
        r#"{"content":5,"text":"b"}"#,
        r#"{"content":"c","delta":"x","usage":[1]}"#,
        r#"{"choices":[null,{"delta":{"content":"d"}}]}"#,
        r#"{"content":false}"#,
        "[DONE]",
    ]);
    let snapshot = run_chunks(chunked(&body, 5)).await;
    assert_eq!(snapshot.text, "abcd");
    assert_eq!(snapshot.status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_non_data_lines_are_ignored() {
    let body = b": keep-alive\n\nevent: message\nid: 7\ndata:nospace\ndata: ok\n\n".to_vec();
    let snapshot = run_chunks(vec![body]).await;
    assert_eq!(snapshot.text, "ok");
}

#[tokio::test]
async fn test_payloads_after_done_are_not_applied() {
    let body = sse_body(&["one", "[DONE]", "two"]);
    let snapshot = run_chunks(vec![body]).await;
    assert_eq!(snapshot.text, "one");
    assert_eq!(snapshot.status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_trailing_line_without_newline_is_flushed() {
    let snapshot = run_chunks(vec![b"data: tail".to_vec()]).await;
    assert_eq!(snapshot.text, "tail");
    assert_eq!(snapshot.status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_clean_close_without_marker_completes() {
    let snapshot = run_chunks(vec![sse_body(&["partial"])]).await;
    assert_eq!(snapshot.text, "partial");
    assert_eq!(snapshot.status, StreamStatus::Completed);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_cancel_discards_late_delivery() {
    let (tx, bytes) = channel_stream();
    let handle = StreamHandle::from_stream(bytes);
    let mut rx = handle.subscribe();

    tx.send(Ok(Bytes::from_static(b"data: {\"content\":\"kept\"}\n\n")))
        .unwrap();
    rx.wait_for(|s| s.text == "kept").await.unwrap();

    handle.cancel();
    let _ = tx.send(Ok(Bytes::from_static(b"data: {\"content\":\" late\"}\n\n")));

    let snapshot = handle.wait().await;
    assert_eq!(snapshot.text, "kept");
    assert_eq!(snapshot.status, StreamStatus::Errored);
    assert_eq!(snapshot.error, Some(StreamError::Cancelled));
    assert!(!snapshot.error.unwrap().kind().is_user_visible_failure());
}

#[tokio::test]
async fn test_transport_error_mid_stream() {
    let (tx, bytes) = channel_stream();
    let handle = StreamHandle::from_stream(bytes);
    let mut rx = handle.subscribe();

    tx.send(Ok(Bytes::from_static(b"data: par"))).unwrap();
    tx.send(Ok(Bytes::from_static(b"tial\n"))).unwrap();
    rx.wait_for(|s| s.text == "partial").await.unwrap();

    tx.send(Err(chatstream::traits::HttpError::ConnectionFailed(
        "reset by peer".to_string(),
    )))
    .unwrap();

    let snapshot = handle.wait().await;
    assert_eq!(snapshot.text, "partial");
    assert_eq!(snapshot.status, StreamStatus::Errored);
    let error = snapshot.error.unwrap();
    assert!(matches!(error, StreamError::ConnectionLost { .. }));
    assert!(error.kind().is_user_visible_failure());
}

#[test]
fn test_reset_after_completed_allows_restart() {
    let mut session = StreamSession::new();
    session.start().unwrap();
    assert!(session.on_fragment("first"));
    session.on_terminate();
    assert_eq!(session.status(), StreamStatus::Completed);

    session.reset();
    assert_eq!(session.snapshot(), SessionSnapshot::default());

    session.start().unwrap();
    assert!(session.on_fragment("second"));
    assert_eq!(session.text(), "second");
}

#[test]
fn test_reset_after_errored_clears_error() {
    let mut session = StreamSession::new();
    session.start().unwrap();
    session.on_error(StreamError::Timeout {
        message: "idle".to_string(),
    });
    assert_eq!(session.status(), StreamStatus::Errored);

    session.reset();
    assert_eq!(session.status(), StreamStatus::Idle);
    assert!(session.last_error().is_none());
    assert!(session.text().is_empty());

    session.start().unwrap();
    assert_eq!(session.status(), StreamStatus::Streaming);
    assert!(!session.cancel_token().is_cancelled());
}

#[tokio::test]
async fn test_subscribers_observe_each_fragment() {
    let (tx, bytes) = channel_stream();
    let handle = StreamHandle::from_stream(bytes);
    let mut rx = handle.subscribe();

    for (part, expected) in [("a", "a"), ("b", "ab"), ("c", "abc")] {
        tx.send(Ok(Bytes::from(format!("data: {}\n", part)))).unwrap();
        rx.wait_for(|s| s.text == expected).await.unwrap();
        assert_eq!(handle.status(), StreamStatus::Streaming);
    }

    drop(tx);
    let snapshot = handle.wait().await;
    assert_eq!(snapshot.text, "abc");
    assert_eq!(snapshot.status, StreamStatus::Completed);
}

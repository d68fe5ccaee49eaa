// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end chat turn scenarios against a scripted transport.

use std::sync::Arc;

use chrono::{Local, TimeZone, Utc};
use columbus_core::{ColumbusError, Role};
use columbus_session::{
    Attachment, ChatOrchestrator, FailureKind, Rejection, SubmissionPhase, SubmitOutcome,
};
use columbus_test_utils::{MockTransport, png_attachment_bytes, reply, reply_with_session};

fn cat_png() -> Attachment {
    Attachment::new("cat.png", "image/png", png_attachment_bytes())
}

fn setup(transport: MockTransport) -> (ChatOrchestrator, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    let orchestrator = ChatOrchestrator::new(transport.clone());
    (orchestrator, transport)
}

#[tokio::test]
async fn successful_turn_appends_user_and_assistant() {
    let (chat, transport) =
        setup(MockTransport::with_replies(vec![reply_with_session("A photo.", "abc123")]));
    chat.add_attachments([cat_png()]);

    let outcome = chat.submit("  describe this ").await.unwrap();
    let turn = match outcome {
        SubmitOutcome::Answered(turn) => turn,
        other => panic!("expected an answer, got {other:?}"),
    };
    assert_eq!(turn.text, "A photo.");

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, Role::User);
    assert_eq!(transcript[0].text, "describe this");
    assert_eq!(transcript[0].attachments.len(), 1);
    assert_eq!(transcript[0].attachments[0].display_name, "cat.png");
    assert_eq!(transcript[1].role, Role::Assistant);
    assert_eq!(transcript[1].text, "A photo.");
    assert!(transcript[0].created_at <= transcript[1].created_at);

    assert_eq!(chat.session_id().as_deref(), Some("abc123"));
    assert!(!chat.is_busy());
    assert_eq!(chat.phase(), SubmissionPhase::Idle);

    let requests = transport.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "describe this");
    assert_eq!(requests[0].images.len(), 1);
    assert_eq!(requests[0].images[0].filename, "cat.png");
    assert_eq!(requests[0].images[0].content_type, "image/png");
    assert_eq!(requests[0].session_id, None);
}

#[tokio::test]
async fn transport_failure_appends_error_turn() {
    let transport = MockTransport::new();
    transport.push_error(ColumbusError::transport("network down")).await;
    let (chat, _transport) = setup(transport);
    chat.add_attachments([cat_png()]);

    let outcome = chat.submit("describe this").await.unwrap();
    let (kind, turn) = match outcome {
        SubmitOutcome::Failed { kind, turn } => (kind, turn),
        other => panic!("expected a failure, got {other:?}"),
    };
    assert_eq!(kind, FailureKind::Transport);
    assert!(turn.text.contains("network down"));
    assert!(turn.text.starts_with("Sorry, I encountered an error"));

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].role, Role::Assistant);
    assert_eq!(transcript[1].text, turn.text);
    assert_eq!(chat.session_id(), None);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn failure_keeps_existing_session_id() {
    let transport = MockTransport::with_replies(vec![reply_with_session("ok", "abc123")]);
    transport.push_error(ColumbusError::transport("boom")).await;
    let (chat, _transport) = setup(transport);
    chat.add_attachments([cat_png()]);

    chat.submit("first").await.unwrap();
    chat.submit("second").await.unwrap();
    assert_eq!(chat.session_id().as_deref(), Some("abc123"));
    assert_eq!(chat.transcript_len(), 4);
}

#[tokio::test]
async fn submit_without_attachments_is_rejected() {
    let (chat, transport) = setup(MockTransport::new());

    let rejection = chat.submit("describe this").await.unwrap_err();
    assert_eq!(rejection, Rejection::NoAttachments);
    assert!(rejection.is_user_facing());
    assert_eq!(chat.transcript_len(), 0);
    assert!(!chat.is_busy());
    assert_eq!(transport.call_count().await, 0);
}

#[tokio::test]
async fn blank_prompt_is_rejected() {
    let (chat, transport) = setup(MockTransport::new());
    chat.add_attachments([cat_png()]);

    assert_eq!(chat.submit("   ").await.unwrap_err(), Rejection::EmptyPrompt);
    assert_eq!(chat.transcript_len(), 0);
    assert_eq!(transport.call_count().await, 0);
}

#[tokio::test]
async fn submit_while_busy_is_a_no_op() {
    let (transport, gate) = MockTransport::gated();
    let (chat, transport) = setup(transport);
    chat.add_attachments([cat_png()]);

    let in_flight = {
        let chat = chat.clone();
        tokio::spawn(async move { chat.submit("first").await })
    };
    gate.entered().await;

    assert!(chat.is_busy());
    assert_eq!(chat.phase(), SubmissionPhase::Dispatching);
    assert_eq!(chat.submit("second").await.unwrap_err(), Rejection::AlreadyBusy);
    assert_eq!(chat.transcript_len(), 1);

    gate.release();
    let outcome = in_flight.await.unwrap().unwrap();
    assert!(matches!(outcome, SubmitOutcome::Answered(_)));
    assert_eq!(transport.call_count().await, 1);
    assert_eq!(chat.transcript_len(), 2);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn default_mode_is_omitted_from_request() {
    let (chat, transport) = setup(MockTransport::new());
    chat.add_attachments([cat_png()]);

    chat.submit("describe this").await.unwrap();
    chat.set_mode("technical");
    chat.submit("and now?").await.unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].mode, None);
    assert_eq!(requests[1].mode.as_deref(), Some("technical"));
}

#[tokio::test]
async fn switching_back_to_default_drops_mode() {
    let (chat, transport) = setup(MockTransport::new());
    chat.add_attachments([cat_png()]);

    chat.set_mode("describe");
    chat.submit("first").await.unwrap();
    chat.set_mode("default");
    chat.submit("second").await.unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].mode.as_deref(), Some("describe"));
    assert_eq!(requests[1].mode, None);
    assert_eq!(chat.mode(), "default");
}

#[tokio::test]
async fn configured_mode_is_selected_initially() {
    let transport = Arc::new(MockTransport::new());
    let config = columbus_config::model::SessionConfig {
        default_mode: "analyze".to_string(),
        ..Default::default()
    };
    let chat = ChatOrchestrator::from_config(transport.clone(), &config);
    assert_eq!(chat.mode(), "analyze");

    chat.add_attachments([cat_png()]);
    chat.submit("look").await.unwrap();
    assert_eq!(transport.requests().await[0].mode.as_deref(), Some("analyze"));
}

#[tokio::test]
async fn rotated_session_id_is_carried_forward() {
    let (chat, transport) = setup(MockTransport::with_replies(vec![
        reply_with_session("one", "abc123"),
        reply_with_session("two", "xyz999"),
        reply("three"),
    ]));
    chat.add_attachments([cat_png()]);

    chat.submit("a").await.unwrap();
    chat.submit("b").await.unwrap();
    assert_eq!(chat.session_id().as_deref(), Some("xyz999"));
    chat.submit("c").await.unwrap();
    // A reply without an identifier keeps the current one.
    assert_eq!(chat.session_id().as_deref(), Some("xyz999"));

    let requests = transport.requests().await;
    assert_eq!(requests[0].session_id, None);
    assert_eq!(requests[1].session_id.as_deref(), Some("abc123"));
    assert_eq!(requests[2].session_id.as_deref(), Some("xyz999"));
}

#[tokio::test]
async fn clear_transcript_forgets_session() {
    let (chat, transport) =
        setup(MockTransport::with_replies(vec![reply_with_session("one", "abc123")]));
    chat.add_attachments([cat_png()]);
    chat.submit("a").await.unwrap();

    chat.clear_transcript();
    assert_eq!(chat.transcript_len(), 0);
    assert_eq!(chat.session_id(), None);
    assert_eq!(chat.attachment_count(), 1);

    chat.submit("b").await.unwrap();
    assert_eq!(transport.requests().await[1].session_id, None);
}

#[tokio::test]
async fn clear_attachments_keeps_transcript() {
    let (chat, _transport) = setup(MockTransport::new());
    chat.add_attachments([cat_png(), cat_png()]);
    chat.submit("a").await.unwrap();

    let registry = chat.preview_registry();
    assert_eq!(registry.live(), 2);
    chat.clear_attachments();
    assert_eq!(chat.attachment_count(), 0);
    assert_eq!(registry.live(), 0);
    assert_eq!(chat.transcript_len(), 2);
    // The user turn keeps displaying its references.
    assert_eq!(chat.transcript()[0].attachments.len(), 2);
}

#[tokio::test]
async fn attachments_are_resent_each_turn() {
    let (chat, transport) = setup(MockTransport::new());
    chat.add_attachments([cat_png()]);
    chat.submit("a").await.unwrap();
    chat.submit("b").await.unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].images, requests[1].images);
    assert_eq!(chat.attachment_count(), 1);
}

#[tokio::test]
async fn remove_attachment_by_index() {
    let (chat, _transport) = setup(MockTransport::new());
    chat.add_attachments([
        cat_png(),
        Attachment::new("dog.jpg", "image/jpeg", vec![0xFF, 0xD8]),
    ]);

    assert!(chat.remove_attachment(5).is_none());
    let removed = chat.remove_attachment(0).unwrap();
    assert_eq!(removed.display_name(), "cat.png");
    let remaining = chat.attachments();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].display_name, "dog.jpg");
}

#[tokio::test]
async fn encoding_failure_never_reaches_transport() {
    let (chat, transport) = setup(MockTransport::new());
    chat.add_attachments([Attachment::with_declared_size(
        "truncated.png",
        "image/png",
        vec![1, 2, 3],
        10,
    )]);

    let outcome = chat.submit("describe this").await.unwrap();
    let (kind, turn) = match outcome {
        SubmitOutcome::Failed { kind, turn } => (kind, turn),
        other => panic!("expected a failure, got {other:?}"),
    };
    assert_eq!(kind, FailureKind::Encoding);
    assert!(turn.text.contains("truncated.png"));
    assert_eq!(transport.call_count().await, 0);
    assert_eq!(chat.transcript_len(), 2);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn empty_reply_text_is_treated_as_failure() {
    let (chat, _transport) =
        setup(MockTransport::with_replies(vec![reply_with_session("  ", "abc123")]));
    chat.add_attachments([cat_png()]);

    let outcome = chat.submit("describe this").await.unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            kind: FailureKind::Protocol,
            ..
        }
    ));
    assert_eq!(chat.session_id(), None);
    assert_eq!(chat.transcript_len(), 2);
}

#[tokio::test]
async fn server_timestamp_is_used_for_reply() {
    let mut answer = reply("A photo.");
    answer.timestamp = Some("2099-01-01T00:00:00".to_string());
    let (chat, _transport) = setup(MockTransport::with_replies(vec![answer]));
    chat.add_attachments([cat_png()]);

    chat.submit("describe this").await.unwrap();
    let transcript = chat.transcript();
    let expected = Local
        .with_ymd_and_hms(2099, 1, 1, 0, 0, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(transcript[1].created_at, expected);
}

#[tokio::test]
async fn local_server_time_does_not_pin_later_turns() {
    let stamp = Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.f")
        .to_string();
    let mut answer = reply("A photo.");
    answer.timestamp = Some(stamp);
    let (chat, _transport) = setup(MockTransport::with_replies(vec![answer]));
    chat.add_attachments([cat_png()]);

    chat.submit("describe this").await.unwrap();
    chat.submit("and the colours?").await.unwrap();
    let wall_clock = Utc::now();

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 4);
    let drift = transcript[1].created_at - wall_clock;
    assert!(drift.num_seconds() < 5, "reply dated {drift} ahead");
    assert!(transcript[2].created_at <= wall_clock);
}

#[tokio::test]
async fn clear_during_flight_discards_late_reply() {
    let (transport, gate) = MockTransport::gated();
    transport.push_reply(reply_with_session("late", "abc123")).await;
    let (chat, _transport) = setup(transport);
    chat.add_attachments([cat_png()]);

    let in_flight = {
        let chat = chat.clone();
        tokio::spawn(async move { chat.submit("describe this").await })
    };
    gate.entered().await;
    chat.clear_transcript();
    gate.release();

    let outcome = in_flight.await.unwrap().unwrap();
    assert_eq!(outcome, SubmitOutcome::Discarded);
    assert_eq!(chat.transcript_len(), 0);
    assert_eq!(chat.session_id(), None);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn dropped_submission_clears_busy() {
    let (transport, gate) = MockTransport::gated();
    let (chat, _transport) = setup(transport);
    chat.add_attachments([cat_png()]);

    let in_flight = {
        let chat = chat.clone();
        tokio::spawn(async move { chat.submit("describe this").await })
    };
    gate.entered().await;
    assert!(chat.is_busy());

    in_flight.abort();
    let _ = in_flight.await;
    assert!(!chat.is_busy());
    assert_eq!(chat.phase(), SubmissionPhase::Idle);
}

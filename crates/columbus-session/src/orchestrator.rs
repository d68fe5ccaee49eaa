// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat turn orchestration.
//!
//! Each submission goes through: Idle -> Encoding -> Dispatching ->
//! (Succeeding | Failing) -> Idle. Validation happens synchronously, under the
//! session lock, before any of that: a rejected submission changes nothing.
//!
//! The user's turn is appended as soon as the submission is accepted. Every
//! outcome after that appends exactly one assistant turn (the reply or a
//! synthetic error) and clears `busy` exactly once. The transport call is the
//! only await point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use columbus_config::model::SessionConfig;
use columbus_core::{
    AttachmentRef, ChatTransport, ChatTurnRequest, ChatTurnResponse, ColumbusError, TurnRecord,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::attachments::{Attachment, AttachmentSet, AttachmentSnapshot, PreviewRegistry};
use crate::encoder;
use crate::modes::DEFAULT_MODE_ID;
use crate::state::SessionState;
use crate::transcript::{TranscriptLog, parse_server_timestamp};

/// Why a submission was not accepted. Rejections never touch the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The trimmed input text is empty.
    #[error("message is empty")]
    EmptyPrompt,
    /// No attachments are pending.
    #[error("please attach at least one image first")]
    NoAttachments,
    /// A submission is already in flight.
    #[error("a message is already being sent")]
    AlreadyBusy,
}

impl Rejection {
    /// Whether the caller should tell the user. The busy guard is silent.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Rejection::NoAttachments)
    }
}

/// Where the current submission is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Encoding,
    Dispatching,
    Succeeding,
    Failing,
}

impl std::fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionPhase::Idle => write!(f, "idle"),
            SubmissionPhase::Encoding => write!(f, "encoding"),
            SubmissionPhase::Dispatching => write!(f, "dispatching"),
            SubmissionPhase::Succeeding => write!(f, "succeeding"),
            SubmissionPhase::Failing => write!(f, "failing"),
        }
    }
}

/// Which stage a failed submission broke at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// An attachment could not be encoded; nothing was sent.
    Encoding,
    /// The transport reported an error.
    Transport,
    /// The server answered without reply text.
    Protocol,
}

/// How an accepted submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The assistant replied; the reply turn was appended.
    Answered(TurnRecord),
    /// The submission failed; a synthetic assistant turn describing it was appended.
    Failed { kind: FailureKind, turn: TurnRecord },
    /// The transcript was cleared while the request was in flight; the result was dropped.
    Discarded,
}

/// The single owned aggregate behind an orchestrator.
#[derive(Debug)]
struct ChatSession {
    state: SessionState,
    transcript: TranscriptLog,
    attachments: AttachmentSet,
    phase: SubmissionPhase,
    /// Bumped by every transcript clear.
    epoch: u64,
}

/// What an accepted submission carries out of the lock.
struct Accepted {
    snapshot: AttachmentSnapshot,
    mode: Option<String>,
    session_id: Option<String>,
    epoch: u64,
}

impl ChatSession {
    fn create(mode: String) -> Self {
        Self {
            state: SessionState::new(mode),
            transcript: TranscriptLog::new(),
            attachments: AttachmentSet::new(),
            phase: SubmissionPhase::Idle,
            epoch: 0,
        }
    }

    fn accept(&mut self, prompt: &str) -> Result<Accepted, Rejection> {
        if prompt.is_empty() {
            return Err(Rejection::EmptyPrompt);
        }
        if self.attachments.is_empty() {
            return Err(Rejection::NoAttachments);
        }
        self.state.begin_submission()?;

        let snapshot = self.attachments.snapshot();
        self.transcript.append(TurnRecord::user(
            prompt,
            snapshot.references().to_vec(),
            Utc::now(),
        ));
        self.set_phase(SubmissionPhase::Encoding);

        Ok(Accepted {
            snapshot,
            mode: self.state.request_mode(),
            session_id: self.state.session_id().map(str::to_string),
            epoch: self.epoch,
        })
    }

    fn reset_on_clear(&mut self) {
        self.transcript.clear();
        self.state.reset_session();
        self.epoch += 1;
    }

    fn set_phase(&mut self, phase: SubmissionPhase) {
        debug!(from = %self.phase, to = %phase, "submission phase");
        self.phase = phase;
    }
}

fn lock(session: &Mutex<ChatSession>) -> MutexGuard<'_, ChatSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Text of the synthetic assistant turn for a failure.
fn failure_text(err: &ColumbusError) -> String {
    let detail = err.user_detail();
    format!(
        "Sorry, I encountered an error: {}. Please try again.",
        detail.trim_end_matches('.')
    )
}

/// Owns the completion of one accepted submission.
///
/// Finishing through [`succeed`](Self::succeed) or [`fail`](Self::fail) clears
/// `busy`; if the submission future is dropped first, `Drop` clears it instead.
struct SubmissionGuard<'a> {
    session: &'a Mutex<ChatSession>,
    epoch: u64,
    finished: bool,
}

impl<'a> SubmissionGuard<'a> {
    fn new(session: &'a Mutex<ChatSession>, epoch: u64) -> Self {
        Self {
            session,
            epoch,
            finished: false,
        }
    }

    fn set_phase(&self, phase: SubmissionPhase) {
        lock(self.session).set_phase(phase);
    }

    fn succeed(mut self, response: ChatTurnResponse) -> SubmitOutcome {
        let mut session = lock(self.session);
        session.set_phase(SubmissionPhase::Succeeding);

        let outcome = if session.epoch != self.epoch {
            session.state.complete_submission(None);
            warn!("transcript cleared during request, dropping reply");
            SubmitOutcome::Discarded
        } else {
            session
                .state
                .complete_submission(response.session_id.as_deref());
            let at = response
                .timestamp
                .as_deref()
                .and_then(parse_server_timestamp)
                .unwrap_or_else(Utc::now);
            let turn = session
                .transcript
                .append(TurnRecord::assistant(response.text, at))
                .clone();
            info!(
                session_id = session.state.session_id().unwrap_or("-"),
                reply_chars = turn.text.len(),
                "assistant replied"
            );
            SubmitOutcome::Answered(turn)
        };

        session.set_phase(SubmissionPhase::Idle);
        self.finished = true;
        outcome
    }

    fn fail(mut self, kind: FailureKind, err: &ColumbusError) -> SubmitOutcome {
        let mut session = lock(self.session);
        session.set_phase(SubmissionPhase::Failing);
        session.state.complete_submission(None);

        let outcome = if session.epoch != self.epoch {
            warn!(error = %err, "transcript cleared during request, dropping failure");
            SubmitOutcome::Discarded
        } else {
            warn!(kind = ?kind, error = %err, "submission failed");
            let turn = session
                .transcript
                .append(TurnRecord::assistant(failure_text(err), Utc::now()))
                .clone();
            SubmitOutcome::Failed { kind, turn }
        };

        session.set_phase(SubmissionPhase::Idle);
        self.finished = true;
        outcome
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut session = lock(self.session);
            session.state.complete_submission(None);
            session.set_phase(SubmissionPhase::Idle);
            warn!("submission dropped before completion");
        }
    }
}

/// Coordinates attachments, transcript, and session state for one chat.
///
/// Cheap to clone; clones share the same session. All methods take `&self`
/// so a presentation layer can keep reading and editing attachments while a
/// submission is in flight.
#[derive(Clone)]
pub struct ChatOrchestrator {
    transport: Arc<dyn ChatTransport>,
    session: Arc<Mutex<ChatSession>>,
}

impl ChatOrchestrator {
    /// Creates an orchestrator with the default mode selected.
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self::with_mode(transport, DEFAULT_MODE_ID)
    }

    /// Creates an orchestrator with `mode` selected.
    pub fn with_mode(transport: Arc<dyn ChatTransport>, mode: impl Into<String>) -> Self {
        let mode = mode.into();
        debug!(transport = transport.name(), mode = %mode, "chat session created");
        Self {
            transport,
            session: Arc::new(Mutex::new(ChatSession::create(mode))),
        }
    }

    /// Creates an orchestrator with the configured default mode selected.
    pub fn from_config(transport: Arc<dyn ChatTransport>, config: &SessionConfig) -> Self {
        Self::with_mode(transport, config.default_mode.clone())
    }

    /// Submits `text` with the pending attachments.
    ///
    /// Returns `Err` when the submission is rejected (nothing changes).
    /// Otherwise the user's turn is appended before the request is sent and the
    /// returned outcome describes the single assistant turn appended after.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, Rejection> {
        let prompt = text.trim();
        let accepted = {
            let mut session = lock(&self.session);
            session.accept(prompt)?
        };
        let guard = SubmissionGuard::new(&self.session, accepted.epoch);

        info!(
            attachments = accepted.snapshot.len(),
            mode = accepted.mode.as_deref().unwrap_or(DEFAULT_MODE_ID),
            session_id = accepted.session_id.as_deref().unwrap_or("-"),
            "submitting chat turn"
        );

        let images = match encoder::encode_all(accepted.snapshot.attachments()) {
            Ok(images) => images,
            Err(err) => return Ok(guard.fail(FailureKind::Encoding, &err)),
        };

        guard.set_phase(SubmissionPhase::Dispatching);
        let request = ChatTurnRequest {
            prompt: prompt.to_string(),
            images,
            mode: accepted.mode,
            session_id: accepted.session_id,
        };

        let outcome = match self.transport.send_chat_turn(request).await {
            Ok(response) if !response.text.trim().is_empty() => guard.succeed(response),
            Ok(_) => guard.fail(
                FailureKind::Protocol,
                &ColumbusError::Protocol("the server reply did not include any text".into()),
            ),
            Err(err) => guard.fail(FailureKind::Transport, &err),
        };
        Ok(outcome)
    }

    /// Appends files to the pending attachments.
    pub fn add_attachments(&self, files: impl IntoIterator<Item = Attachment>) {
        lock(&self.session).attachments.add(files);
    }

    /// Removes the pending attachment at `index`; out of range is a no-op.
    pub fn remove_attachment(&self, index: usize) -> Option<Attachment> {
        lock(&self.session).attachments.remove_at(index)
    }

    /// Empties the pending attachments. The transcript is untouched.
    pub fn clear_attachments(&self) {
        lock(&self.session).attachments.clear();
    }

    /// Empties the transcript and forgets the server session identifier.
    pub fn clear_transcript(&self) {
        lock(&self.session).reset_on_clear();
        info!("chat history cleared");
    }

    /// Selects an analysis mode. Always succeeds, even mid-submission.
    pub fn set_mode(&self, mode: impl Into<String>) {
        lock(&self.session).state.set_mode(mode);
    }

    /// Copy of the transcript, oldest first.
    pub fn transcript(&self) -> Vec<TurnRecord> {
        lock(&self.session).transcript.all().to_vec()
    }

    pub fn transcript_len(&self) -> usize {
        lock(&self.session).transcript.len()
    }

    /// Display references of the pending attachments, in order.
    pub fn attachments(&self) -> Vec<AttachmentRef> {
        lock(&self.session).attachments.snapshot().references().to_vec()
    }

    pub fn attachment_count(&self) -> usize {
        lock(&self.session).attachments.len()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.session).state.is_busy()
    }

    pub fn mode(&self) -> String {
        lock(&self.session).state.mode().to_string()
    }

    pub fn session_id(&self) -> Option<String> {
        lock(&self.session).state.session_id().map(str::to_string)
    }

    pub fn phase(&self) -> SubmissionPhase {
        lock(&self.session).phase
    }

    /// Registry holding the display handles of the pending attachments.
    pub fn preview_registry(&self) -> PreviewRegistry {
        lock(&self.session).attachments.registry().clone()
    }

    /// Name of the underlying transport.
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }
}

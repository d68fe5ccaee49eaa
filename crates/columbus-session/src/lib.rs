// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session core for Columbus.
//!
//! Accumulates pending image attachments, encodes them for the wire, sends
//! chat turns through a [`ChatTransport`](columbus_core::ChatTransport), and
//! keeps the transcript and server session identifier consistent across
//! successes and failures.

pub mod attachments;
pub mod encoder;
pub mod modes;
pub mod orchestrator;
pub mod state;
pub mod transcript;

pub use attachments::{
    Attachment, AttachmentSet, AttachmentSnapshot, DisplayHandle, PendingAttachment, PreviewRegistry,
};
pub use modes::{DEFAULT_MODE_ID, Mode, ModeCatalog};
pub use orchestrator::{ChatOrchestrator, FailureKind, Rejection, SubmissionPhase, SubmitOutcome};
pub use state::SessionState;
pub use transcript::TranscriptLog;

// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the transport, the session orchestrator, and the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An attachment in wire form: original filename and media type plus the
/// base64-encoded payload. Derived from a pending attachment at encode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAttachment {
    pub filename: String,
    /// Standard base64 of the raw bytes.
    pub content: String,
    pub content_type: String,
}

/// A single chat turn handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurnRequest {
    pub prompt: String,
    pub images: Vec<EncodedAttachment>,
    /// Analysis mode. `None` lets the server apply its default.
    pub mode: Option<String>,
    /// Server-issued session identifier. `None` until the first exchange returns one.
    pub session_id: Option<String>,
}

/// The transport's answer to a [`ChatTurnRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurnResponse {
    /// Assistant reply text. Empty when the server omitted it.
    pub text: String,
    pub session_id: Option<String>,
    /// Server timestamp, as sent.
    pub timestamp: Option<String>,
}

/// Who authored a transcript turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Displayable reference to an attachment carried by a user turn.
///
/// Plain data: holding one does not keep any preview resource alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub handle_id: String,
    pub display_name: String,
    pub media_type: String,
    pub size: usize,
}

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentRef>,
}

impl TurnRecord {
    /// A user turn with a fresh id.
    pub fn user(text: impl Into<String>, attachments: Vec<AttachmentRef>, at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            text: text.into(),
            created_at: at,
            attachments,
        }
    }

    /// An assistant turn with a fresh id.
    pub fn assistant(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            text: text.into(),
            created_at: at,
            attachments: Vec::new(),
        }
    }
}

/// Result of probing the server's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Per-file entry of an upload response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub stored: bool,
    #[serde(default)]
    pub path: Option<String>,
}

/// Response of the optional upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub files: Vec<UploadedFile>,
    pub stored: bool,
}

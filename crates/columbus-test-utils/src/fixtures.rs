// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned values for tests.

use columbus_core::ChatTurnResponse;

/// Smallest valid PNG (1x1, transparent).
pub fn png_attachment_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// A reply without session identifier or timestamp.
pub fn reply(text: &str) -> ChatTurnResponse {
    ChatTurnResponse {
        text: text.to_string(),
        session_id: None,
        timestamp: None,
    }
}

/// A reply carrying a session identifier.
pub fn reply_with_session(text: &str, session_id: &str) -> ChatTurnResponse {
    ChatTurnResponse {
        text: text.to_string(),
        session_id: Some(session_id.to_string()),
        timestamp: None,
    }
}

// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Columbus chat client.
//!
//! Provides the error taxonomy, the types exchanged between the session
//! orchestrator and its transport, and the [`ChatTransport`] trait that
//! transport implementations provide.

pub mod error;
pub mod traits;
pub mod types;

pub use error::ColumbusError;
pub use traits::ChatTransport;
pub use types::{
    AttachmentRef, ChatTurnRequest, ChatTurnResponse, EncodedAttachment, HealthReport, Role,
    TurnRecord, UploadResponse, UploadedFile,
};

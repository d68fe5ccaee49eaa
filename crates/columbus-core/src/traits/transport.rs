// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait consumed by the chat orchestrator.

use async_trait::async_trait;

use crate::error::ColumbusError;
use crate::types::{ChatTurnRequest, ChatTurnResponse, HealthReport};

/// Sends chat turns to the remote vision assistant.
///
/// Implementations own all transport mechanics (HTTP, timeouts, body
/// decoding). Every failure is reported as a [`ColumbusError`] whose
/// [`user_detail`](ColumbusError::user_detail) is fit to show to a user.
#[async_trait]
pub trait ChatTransport: Send + Sync + 'static {
    /// Human-readable name of this transport, for logs.
    fn name(&self) -> &str;

    /// Sends one chat turn and waits for the reply. Exactly one attempt is made.
    async fn send_chat_turn(
        &self,
        request: ChatTurnRequest,
    ) -> Result<ChatTurnResponse, ColumbusError>;

    /// Probes the server's health endpoint.
    async fn health_check(&self) -> Result<HealthReport, ColumbusError>;
}

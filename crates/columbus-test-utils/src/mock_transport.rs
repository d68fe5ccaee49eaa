// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted chat transport for deterministic testing.
//!
//! `MockTransport` implements `ChatTransport` with pre-configured results and
//! records every request it receives. A [`TransportGate`] can hold requests in
//! flight so tests can observe the orchestrator while it is busy.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use columbus_core::{ChatTransport, ChatTurnRequest, ChatTurnResponse, ColumbusError, HealthReport};
use tokio::sync::{Mutex, Notify};

/// Holds requests inside the transport until released.
#[derive(Debug, Clone, Default)]
pub struct TransportGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl TransportGate {
    /// Waits until a request has reached the transport.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets one held request continue.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// A chat transport that returns pre-configured results.
///
/// Results are popped from a FIFO queue. When the queue is empty, a reply
/// with the text "mock response" is returned.
pub struct MockTransport {
    results: Arc<Mutex<VecDeque<Result<ChatTurnResponse, ColumbusError>>>>,
    requests: Arc<Mutex<Vec<ChatTurnRequest>>>,
    gate: Option<TransportGate>,
}

impl MockTransport {
    /// Create a mock transport with an empty result queue.
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Create a mock transport pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<ChatTurnResponse>) -> Self {
        Self {
            results: Arc::new(Mutex::new(replies.into_iter().map(Ok).collect())),
            ..Self::new()
        }
    }

    /// Create a gated mock transport and the gate controlling it.
    pub fn gated() -> (Self, TransportGate) {
        let gate = TransportGate::default();
        let transport = Self {
            gate: Some(gate.clone()),
            ..Self::new()
        };
        (transport, gate)
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, reply: ChatTurnResponse) {
        self.results.lock().await.push_back(Ok(reply));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: ColumbusError) {
        self.results.lock().await.push_back(Err(error));
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ChatTurnRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_result(&self) -> Result<ChatTurnResponse, ColumbusError> {
        self.results.lock().await.pop_front().unwrap_or_else(|| {
            Ok(ChatTurnResponse {
                text: "mock response".to_string(),
                session_id: None,
                timestamp: None,
            })
        })
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    async fn send_chat_turn(
        &self,
        request: ChatTurnRequest,
    ) -> Result<ChatTurnResponse, ColumbusError> {
        tracing::debug!(images = request.images.len(), "mock transport received turn");
        self.requests.lock().await.push(request);
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.next_result().await
    }

    async fn health_check(&self) -> Result<HealthReport, ColumbusError> {
        Ok(HealthReport {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}

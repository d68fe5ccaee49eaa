// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport for the Columbus analysis server.
//!
//! [`HttpTransport`] implements [`ChatTransport`] on top of [`ApiClient`],
//! translating between the session core's request/response types and the
//! server's JSON bodies.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use columbus_config::ColumbusConfig;
use columbus_core::{
    ChatTransport, ChatTurnRequest, ChatTurnResponse, ColumbusError, HealthReport, UploadResponse,
};
use tracing::{debug, info};

pub use crate::client::ApiClient;
pub use crate::types::UploadFile;
use crate::types::ChatRequestBody;

/// [`ChatTransport`] backed by the server's HTTP API.
pub struct HttpTransport {
    client: ApiClient,
}

impl HttpTransport {
    /// Creates a transport from the `[api]` section of the configuration.
    pub fn new(config: &ColumbusConfig) -> Result<Self, ColumbusError> {
        let client = ApiClient::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        )?;

        info!(
            base_url = client.base_url(),
            timeout_secs = config.api.timeout_secs,
            "HTTP transport initialized"
        );

        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }

    /// Uploads files through the optional upload endpoint.
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        store_files: bool,
    ) -> Result<UploadResponse, ColumbusError> {
        self.client.upload(files, store_files).await
    }
}

/// Converts a [`ChatTurnRequest`] into the server's request body.
fn to_request_body(request: ChatTurnRequest) -> ChatRequestBody {
    ChatRequestBody {
        prompt: request.prompt,
        images: request.images,
        template: request.mode,
        session_id: request.session_id,
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send_chat_turn(
        &self,
        request: ChatTurnRequest,
    ) -> Result<ChatTurnResponse, ColumbusError> {
        debug!(
            images = request.images.len(),
            mode = request.mode.as_deref().unwrap_or("<server default>"),
            has_session = request.session_id.is_some(),
            "sending chat turn"
        );

        let body = self.client.chat(&to_request_body(request)).await?;

        Ok(ChatTurnResponse {
            text: body.response.unwrap_or_default(),
            session_id: body.session_id,
            timestamp: body.timestamp,
        })
    }

    async fn health_check(&self) -> Result<HealthReport, ColumbusError> {
        self.client.health().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(server: &MockServer) -> HttpTransport {
        let mut config = ColumbusConfig::default();
        config.api.base_url = format!("{}/api", server.uri());
        HttpTransport::new(&config).unwrap()
    }

    fn request(mode: Option<&str>) -> ChatTurnRequest {
        ChatTurnRequest {
            prompt: "what is this?".into(),
            images: Vec::new(),
            mode: mode.map(str::to_string),
            session_id: None,
        }
    }

    #[tokio::test]
    async fn mode_is_sent_as_template() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(wiremock::matchers::body_partial_json(
                serde_json::json!({"template": "technical"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "ok",
                "session_id": null,
                "timestamp": "2026-10-17T10:00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = transport_for(&server)
            .send_chat_turn(request(Some("technical")))
            .await
            .unwrap();
        assert_eq!(reply.text, "ok");
        assert!(reply.session_id.is_none());
    }

    #[tokio::test]
    async fn missing_reply_text_maps_to_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "session_id": "s-1",
                "timestamp": "2026-10-17T10:00:00"
            })))
            .mount(&server)
            .await;

        let reply = transport_for(&server).send_chat_turn(request(None)).await.unwrap();
        assert!(reply.text.is_empty());
        assert_eq!(reply.session_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn request_body_conversion_keeps_absent_fields_absent() {
        let body = to_request_body(request(None));
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("template").is_none());
        assert!(json.get("session_id").is_none());
    }
}

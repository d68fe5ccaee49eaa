// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the analysis server API.
//!
//! Provides [`ApiClient`], which builds requests, decodes bodies, and turns
//! every failure into a [`ColumbusError::Transport`] with a readable message.
//! Exactly one attempt is made per call.

use std::time::Duration;

use columbus_core::{ColumbusError, HealthReport, UploadResponse};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequestBody, ChatResponseBody, UploadFile};

/// HTTP client for the analysis server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ColumbusError> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ColumbusError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Sends one chat turn.
    pub async fn chat(&self, body: &ChatRequestBody) -> Result<ChatResponseBody, ColumbusError> {
        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(body)
            .send()
            .await
            .map_err(request_failed)?;

        decode(response, "Chat request failed").await
    }

    /// Probes `GET /health`.
    pub async fn health(&self) -> Result<HealthReport, ColumbusError> {
        let response = self
            .client
            .get(self.endpoint("health"))
            .send()
            .await
            .map_err(request_failed)?;

        decode(response, "Health check failed").await
    }

    /// Uploads files to `POST /upload`, optionally asking the server to keep them.
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        store_files: bool,
    ) -> Result<UploadResponse, ColumbusError> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.filename.clone())
                .mime_str(&file.content_type)
                .map_err(|e| ColumbusError::Transport {
                    message: format!(
                        "invalid content type `{}` for {}: {e}",
                        file.content_type, file.filename
                    ),
                    status: None,
                    source: Some(Box::new(e)),
                })?;
            form = form.part("files", part);
        }
        form = form.text("store_files", store_files.to_string());

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(request_failed)?;

        decode(response, "Upload failed").await
    }
}

fn request_failed(e: reqwest::Error) -> ColumbusError {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("could not connect to server: {e}")
    } else {
        format!("HTTP request failed: {e}")
    };
    ColumbusError::Transport {
        message,
        status: None,
        source: Some(Box::new(e)),
    }
}

/// Reads the body and decodes it, or maps a non-success status to an error
/// using the server's `detail` when it sent one and `fallback` otherwise.
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, ColumbusError> {
    let status = response.status();
    debug!(status = %status, url = %response.url(), "response received");

    let body = response.text().await.map_err(|e| ColumbusError::Transport {
        message: format!("failed to read response body: {e}"),
        status: Some(status.as_u16()),
        source: Some(Box::new(e)),
    })?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(|err| err.message())
            .unwrap_or_else(|| format!("{fallback} ({status})"));
        return Err(ColumbusError::Transport {
            message,
            status: Some(status.as_u16()),
            source: None,
        });
    }

    serde_json::from_str(&body).map_err(|e| ColumbusError::Transport {
        message: format!("malformed response from server: {e}"),
        status: Some(status.as_u16()),
        source: Some(Box::new(e)),
    })
}

// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies of the analysis server's HTTP API.

use columbus_core::EncodedAttachment;
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
///
/// Absent optional fields are omitted from the JSON, not sent as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequestBody {
    pub prompt: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<EncodedAttachment>,

    /// Analysis mode; the server calls it a template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Success body of `POST /chat`.
///
/// Every field is optional at this layer so that a reply missing its text can
/// be reported as a protocol problem rather than a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponseBody {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Error body returned by the server on non-success statuses.
///
/// `detail` is usually a string but request-validation failures carry a list
/// of objects.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorResponse {
    /// Best human-readable message carried by the body, if any.
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Null) | None => self.error.clone().filter(|e| !e.is_empty()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// One file for the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

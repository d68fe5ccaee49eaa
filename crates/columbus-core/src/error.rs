// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Columbus chat client.

use thiserror::Error;

/// The primary error type shared by the transport, encoder, and configuration layers.
#[derive(Debug, Error)]
pub enum ColumbusError {
    /// Configuration errors (invalid TOML, bad values, unknown mode ids).
    #[error("configuration error: {0}")]
    Config(String),

    /// An attachment could not be converted into its wire form.
    #[error("could not encode attachment `{filename}`: {message}")]
    Encoding { filename: String, message: String },

    /// The transport failed: non-success status, network error, or unreadable body.
    #[error("{message}")]
    Transport {
        message: String,
        /// HTTP status code, when the server answered at all.
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered successfully but the reply is missing required content.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Local I/O failure (reading attachment files, config files).
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ColumbusError {
    /// Shorthand for a transport error without status or source.
    pub fn transport(message: impl Into<String>) -> Self {
        ColumbusError::Transport {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// The human-readable detail shown to the user in a synthetic assistant turn.
    ///
    /// Transport errors surface the server-provided detail verbatim; every other
    /// variant falls back to its `Display` form.
    pub fn user_detail(&self) -> String {
        match self {
            ColumbusError::Transport { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

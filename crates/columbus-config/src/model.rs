// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Columbus chat client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Mode id that means "let the server choose". Never sent on the wire.
pub const DEFAULT_MODE_ID: &str = "default";

/// Top-level Columbus configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColumbusConfig {
    /// Analysis server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Chat session behavior.
    #[serde(default)]
    pub session: SessionConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analysis server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the API, without trailing `/chat`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout applied by the HTTP transport, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Chat session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Mode selected when a chat starts.
    #[serde(default = "default_mode")]
    pub default_mode: String,

    /// Ask the server to keep uploaded files (upload command only).
    #[serde(default)]
    pub store_files: bool,

    /// Catalog of analysis modes offered to the user.
    #[serde(default = "default_modes")]
    pub modes: Vec<ModeConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            store_files: false,
            modes: default_modes(),
        }
    }
}

fn default_mode() -> String {
    DEFAULT_MODE_ID.to_string()
}

/// One entry of the analysis mode catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModeConfig {
    /// Identifier forwarded to the server.
    pub id: String,
    /// Short display name.
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ModeConfig {
    fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

fn default_modes() -> Vec<ModeConfig> {
    vec![
        ModeConfig::new(
            DEFAULT_MODE_ID,
            "Default Analysis",
            "General analysis without specific focus",
        ),
        ModeConfig::new(
            "analyze",
            "Detailed Analysis",
            "Comprehensive insights and detailed examination",
        ),
        ModeConfig::new(
            "describe",
            "Description Mode",
            "Focus on describing what is visible in the images",
        ),
        ModeConfig::new(
            "technical",
            "Technical Analysis",
            "Technical aspects and professional evaluation",
        ),
    ]
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

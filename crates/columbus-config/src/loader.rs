// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./columbus.toml` > `~/.config/columbus/columbus.toml` >
//! `/etc/columbus/columbus.toml` with environment variable overrides via `COLUMBUS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ColumbusConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/columbus/columbus.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "columbus.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/columbus/columbus.toml` (system-wide)
/// 3. `~/.config/columbus/columbus.toml` (user XDG config)
/// 4. `./columbus.toml` (local directory)
/// 5. `COLUMBUS_*` environment variables
pub fn load_config() -> Result<ColumbusConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string on top of the defaults (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ColumbusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ColumbusConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ColumbusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ColumbusConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("columbus").join(LOCAL_CONFIG_FILE))
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ColumbusConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `COLUMBUS_API_BASE_URL` must become `api.base_url`.
fn env_provider() -> Env {
    Env::prefixed("COLUMBUS_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("api_", "api.", 1)
            .replacen("session_", "session.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}

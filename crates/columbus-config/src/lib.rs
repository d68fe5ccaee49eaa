// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Columbus chat client.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use columbus_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("server: {}", config.api.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, SourceSet, closest_match, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ColumbusConfig, DEFAULT_MODE_ID, ModeConfig};

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<ColumbusConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<ColumbusConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        let mut sources = SourceSet::new();
        if let Ok(content) = std::fs::read_to_string(path) {
            sources.push(path.display().to_string(), content);
        }
        sources
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ColumbusConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        SourceSet::inline(toml_content)
    })
}

/// Source texts are only read when there is something to report.
fn finish(
    loaded: Result<ColumbusConfig, figment::Error>,
    sources: impl FnOnce() -> SourceSet,
) -> Result<ColumbusConfig, Vec<ConfigError>> {
    let config = match loaded {
        Ok(config) => config,
        Err(err) => return Err(diagnostic::from_figment(err, &sources())),
    };
    if let Err(mut errors) = validation::validate_config(&config) {
        diagnostic::locate_all(&mut errors, &sources());
        return Err(errors);
    }
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");
    Ok(config)
}

/// Read the TOML files of the hierarchy, highest precedence first.
fn collect_toml_sources() -> SourceSet {
    let mut sources = SourceSet::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG_FILE) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.to_string());
        sources.push(path, content);
    }

    if let Some(path) = loader::user_config_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push(path.display().to_string(), content);
    }

    if let Ok(content) = std::fs::read_to_string(loader::SYSTEM_CONFIG_PATH) {
        sources.push(loader::SYSTEM_CONFIG_PATH, content);
    }

    sources
}

// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, positive timeouts, and a coherent mode catalog.

use std::collections::HashSet;

use crate::diagnostic::{ConfigError, closest_match};
use crate::model::{ColumbusConfig, DEFAULT_MODE_ID};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &ColumbusConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::invalid("api.base_url", "must not be empty"));
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::invalid(
            "api.base_url",
            format!("`{base_url}` must start with http:// or https://"),
        ));
    }

    if config.api.timeout_secs == 0 {
        errors.push(ConfigError::invalid(
            "api.timeout_secs",
            "must be greater than zero",
        ));
    }

    let mut seen = HashSet::new();
    for (i, mode) in config.session.modes.iter().enumerate() {
        if mode.id.trim().is_empty() {
            errors.push(ConfigError::invalid(
                "session.modes",
                format!("entry {} has an empty id", i + 1),
            ));
        } else if !seen.insert(mode.id.as_str()) {
            errors.push(ConfigError::invalid(
                "session.modes",
                format!("mode id `{}` appears more than once", mode.id),
            ));
        }
    }

    if !seen.contains(DEFAULT_MODE_ID) {
        errors.push(ConfigError::invalid(
            "session.modes",
            format!("must include the `{DEFAULT_MODE_ID}` mode"),
        ));
    }

    let default_mode = config.session.default_mode.as_str();
    if !seen.contains(default_mode) {
        errors.push(ConfigError::unknown_mode(
            "session.default_mode",
            default_mode,
            config.session.modes.iter().map(|m| m.id.as_str()),
        ));
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        let hint = closest_match(&level, LOG_LEVELS.iter().copied())
            .map(|s| format!("; did you mean `{s}`?"))
            .unwrap_or_default();
        errors.push(ConfigError::invalid(
            "logging.level",
            format!(
                "`{}` must be one of: {}{hint}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModeConfig;

    fn mode(id: &str) -> ModeConfig {
        ModeConfig {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ColumbusConfig::default()).is_ok());
    }

    #[test]
    fn non_http_base_url_fails() {
        let mut config = ColumbusConfig::default();
        config.api.base_url = "ftp://files".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("http://"));
    }

    #[test]
    fn zero_timeout_fails() {
        let mut config = ColumbusConfig::default();
        config.api.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn duplicate_and_missing_default_mode_collected() {
        let mut config = ColumbusConfig::default();
        config.session.modes = vec![mode("analyze"), mode("analyze")];
        config.session.default_mode = "analyze".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2, "got: {errors:?}");
    }

    #[test]
    fn default_mode_must_be_in_catalog() {
        let mut config = ColumbusConfig::default();
        config.session.default_mode = "xray".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("xray"));
        assert!(matches!(
            &errors[0],
            ConfigError::UnknownMode { suggestion: None, .. }
        ));
    }

    #[test]
    fn misspelled_default_mode_gets_suggestion() {
        let mut config = ColumbusConfig::default();
        config.session.default_mode = "technicl".to_string();
        let errors = validate_config(&config).unwrap_err();
        match &errors[0] {
            ConfigError::UnknownMode {
                key, suggestion, ..
            } => {
                assert_eq!(key, "session.default_mode");
                assert_eq!(suggestion.as_deref(), Some("technical"));
            }
            other => panic!("expected UnknownMode, got {other:?}"),
        }
    }

    #[test]
    fn unknown_log_level_fails() {
        let mut config = ColumbusConfig::default();
        config.logging.level = "loud".to_string();
        assert!(validate_config(&config).is_err());

        config.logging.level = "inof".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("did you mean `info`"));
    }
}

// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog of analysis modes offered to the user.

use columbus_config::model::{ModeConfig, SessionConfig};
pub use columbus_config::DEFAULT_MODE_ID;

/// One analysis mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Mode {
    /// True for the sentinel that is never sent to the server.
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_MODE_ID
    }
}

impl From<&ModeConfig> for Mode {
    fn from(config: &ModeConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
        }
    }
}

/// Externally supplied, ordered list of modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeCatalog {
    modes: Vec<Mode>,
    initial: String,
}

impl ModeCatalog {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            modes: config.modes.iter().map(Mode::from).collect(),
            initial: config.default_mode.clone(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Mode selected when a chat starts.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl Default for ModeCatalog {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_lists_builtin_modes() {
        let catalog = ModeCatalog::default();
        let ids: Vec<&str> = catalog.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["default", "analyze", "describe", "technical"]);
        assert_eq!(catalog.initial(), DEFAULT_MODE_ID);
        assert!(catalog.get("default").unwrap().is_default());
        assert!(!catalog.get("describe").unwrap().is_default());
    }

    #[test]
    fn lookup_unknown_mode() {
        let catalog = ModeCatalog::default();
        assert!(!catalog.contains("xray"));
        assert!(catalog.get("xray").is_none());
    }
}

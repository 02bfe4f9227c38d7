//! Navigation options.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Options read at every navigation decision point.
///
/// All fields have defaults, so a partial TOML file is fine:
///
/// ```
/// use earshot_core::NavConfig;
///
/// let config = NavConfig::from_toml_str("wrap_navigation = false").unwrap();
/// assert!(!config.wrap_navigation);
/// assert!(config.announce_position);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Whether next/previous and button cycling wrap at the bounds.
    pub wrap_navigation: bool,
    /// Whether "X of Y" suffixes are spoken at all.
    pub announce_position: bool,
    /// Inactivity window after which a typeahead buffer starts over.
    pub typeahead_timeout_ms: u64,
    /// Inactivity window after which a numeric entry starts over.
    pub numeric_timeout_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            wrap_navigation: true,
            announce_position: true,
            typeahead_timeout_ms: 1000,
            numeric_timeout_ms: 1500,
        }
    }
}

impl NavConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn typeahead_timeout(&self) -> Duration {
        Duration::from_millis(self.typeahead_timeout_ms)
    }

    pub fn numeric_timeout(&self) -> Duration {
        Duration::from_millis(self.numeric_timeout_ms)
    }
}

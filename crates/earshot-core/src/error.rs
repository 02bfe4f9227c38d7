//! Error types shared across the engine.

/// Errors raised while navigating.
///
/// None of these are fatal to the host: the dispatcher and the menus catch
/// them at their boundaries and turn them into a spoken message.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A data-source callback could not produce what was asked of it.
    #[error("{source_name} unavailable: {reason}")]
    Source {
        /// Human-readable name of the collaborator.
        source_name: String,
        /// Why it failed.
        reason: String,
    },
    /// The host could not provide a field the engine needs.
    #[error("host field `{0}` is unavailable")]
    HostField(String),
    /// A button action failed.
    #[error("{label} failed: {reason}")]
    Action {
        /// The button label.
        label: String,
        /// Why it failed.
        reason: String,
    },
    /// A navigation state reached a condition it cannot recover from.
    #[error("{0}")]
    State(String),
}

impl NavError {
    /// A data-source failure.
    pub fn source(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// A failed button action.
    pub fn action(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Action {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for [`NavConfig`](crate::NavConfig).
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_collaborator() {
        let err = NavError::source("Trade items", "colony not loaded");
        assert_eq!(err.to_string(), "Trade items unavailable: colony not loaded");
        let err = NavError::action("Sell", "no buyer");
        assert_eq!(err.to_string(), "Sell failed: no buyer");
        let err = NavError::HostField("selectedTab".into());
        assert_eq!(err.to_string(), "host field `selectedTab` is unavailable");
    }
}

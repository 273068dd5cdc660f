//! Error types of the card and its editor.

use thiserror::Error;

/// Invalid card configuration.
///
/// Returned from configuration parsing; a card never falls back to defaults
/// for the required fields.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration must be an object")]
    NotAnObject,

    #[error("Please define main_card")]
    MissingMainCard,

    #[error("Please define drawer_cards as an array")]
    DrawerCardsNotArray,

    #[error("invalid configuration field: {0}")]
    InvalidField(#[from] serde_json::Error),
}

/// A panel factory could not build a panel.
///
/// Recovered by the lifecycle manager into an error placeholder; the
/// message becomes the placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("panel descriptor has no type")]
    MissingType,

    #[error("unknown panel type '{0}'")]
    UnknownType(String),

    #[error("{0}")]
    Build(String),
}

impl PanelError {
    /// Generic construction failure.
    pub fn build(message: impl Into<String>) -> Self {
        PanelError::Build(message.into())
    }
}

/// Editor action failure. Aborts the one action only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Cannot find host instance")]
    MissingHost,

    #[error("drawer panel index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("panel dialog failed: {0}")]
    Dialog(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_messages() {
        assert_eq!(ConfigError::MissingMainCard.to_string(), "Please define main_card");
        assert_eq!(
            ConfigError::DrawerCardsNotArray.to_string(),
            "Please define drawer_cards as an array"
        );
    }

    #[test]
    fn test_panel_error_is_placeholder_text() {
        let err = PanelError::build("entity not found");
        assert_eq!(err.to_string(), "entity not found");
        assert_eq!(
            PanelError::UnknownType("custom:nope".into()).to_string(),
            "unknown panel type 'custom:nope'"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let err: serde_json::Error = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let config: ConfigError = err.into();
        assert!(matches!(config, ConfigError::InvalidField(_)));
    }
}

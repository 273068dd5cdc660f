//! Card configuration.
//!
//! The host hands the card an untyped JSON value. It is validated once, at
//! set time, into a [`CardConfig`]; required fields are never defaulted.

use std::time::Duration;

use pulldown_ui::DrawerSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ConfigError;

pub const DEFAULT_HANDLE_COLOR: &str = "rgba(255, 255, 255, 0.4)";
pub const DEFAULT_HANDLE_HEIGHT: f32 = 24.0;
pub const DEFAULT_DRAWER_BACKGROUND: &str = "rgba(0, 0, 0, 0.5)";
pub const DEFAULT_DRAWER_BLUR: f32 = 20.0;
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 300;
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Opaque configuration of one panel, handed to the panel factory as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelDescriptor(Value);

impl PanelDescriptor {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The descriptor's `type` field.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for PanelDescriptor {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Validated card configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    pub main_card: PanelDescriptor,
    pub drawer_cards: Vec<PanelDescriptor>,
    #[serde(default = "default_handle_color")]
    pub handle_color: String,
    /// Handle grab zone height in px.
    #[serde(default = "default_handle_height")]
    pub handle_height: f32,
    #[serde(default = "default_drawer_background")]
    pub drawer_background: String,
    /// Backdrop blur radius in px.
    #[serde(default = "default_drawer_blur")]
    pub drawer_blur: f32,
    /// Settle animation length in ms.
    #[serde(default = "default_animation_duration")]
    pub animation_duration: u64,
    /// Drag distance in px a release must exceed to flip the drawer.
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f32,
    #[serde(default = "default_true")]
    pub auto_close_on_tap: bool,
}

fn default_handle_color() -> String {
    DEFAULT_HANDLE_COLOR.to_string()
}

fn default_handle_height() -> f32 {
    DEFAULT_HANDLE_HEIGHT
}

fn default_drawer_background() -> String {
    DEFAULT_DRAWER_BACKGROUND.to_string()
}

fn default_drawer_blur() -> f32 {
    DEFAULT_DRAWER_BLUR
}

fn default_animation_duration() -> u64 {
    DEFAULT_ANIMATION_DURATION_MS
}

fn default_swipe_threshold() -> f32 {
    DEFAULT_SWIPE_THRESHOLD
}

fn default_true() -> bool {
    true
}

/// Presentation values a renderer needs for the handle and drawer chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct CardStyle {
    pub handle_color: String,
    pub handle_height_px: f32,
    pub drawer_background: String,
    pub drawer_blur_px: f32,
}

impl CardConfig {
    /// Validate a raw configuration value.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let object = value.as_object().ok_or(ConfigError::NotAnObject)?;

        match object.get("main_card") {
            None | Some(Value::Null) => return Err(ConfigError::MissingMainCard),
            Some(_) => {}
        }
        if !object.get("drawer_cards").is_some_and(Value::is_array) {
            return Err(ConfigError::DrawerCardsNotArray);
        }

        Ok(CardConfig::deserialize(value)?)
    }

    /// Example configuration offered by card pickers.
    pub fn stub_value() -> Value {
        json!({
            "main_card": { "type": "markdown", "content": "Main content" },
            "drawer_cards": [
                { "type": "markdown", "content": "Drawer card 1" },
                { "type": "markdown", "content": "Drawer card 2" }
            ],
            "auto_close_on_tap": true
        })
    }

    /// [`CardConfig::stub_value`], validated.
    pub fn stub() -> Self {
        let stub = Self::stub_value();
        Self {
            main_card: PanelDescriptor::new(stub["main_card"].clone()),
            drawer_cards: stub["drawer_cards"]
                .as_array()
                .map(|cards| cards.iter().cloned().map(PanelDescriptor::new).collect())
                .unwrap_or_default(),
            handle_color: default_handle_color(),
            handle_height: DEFAULT_HANDLE_HEIGHT,
            drawer_background: default_drawer_background(),
            drawer_blur: DEFAULT_DRAWER_BLUR,
            animation_duration: DEFAULT_ANIMATION_DURATION_MS,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            auto_close_on_tap: true,
        }
    }

    /// Behavioral part of the configuration.
    pub fn drawer_settings(&self) -> DrawerSettings {
        DrawerSettings {
            swipe_threshold_px: self.swipe_threshold,
            animation_duration: Duration::from_millis(self.animation_duration),
            auto_close_on_tap: self.auto_close_on_tap,
        }
    }

    pub fn style(&self) -> CardStyle {
        CardStyle {
            handle_color: self.handle_color.clone(),
            handle_height_px: self.handle_height,
            drawer_background: self.drawer_background.clone(),
            drawer_blur_px: self.drawer_blur,
        }
    }

    /// Total number of panels a build constructs.
    pub fn panel_count(&self) -> usize {
        1 + self.drawer_cards.len()
    }
}

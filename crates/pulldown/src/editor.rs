//! Headless configuration editor.
//!
//! Works on the raw configuration value, which may be incomplete while the
//! user is still filling it in. Every mutation notifies subscribers with the
//! full updated configuration.

use futures_lite::future::BoxedLocal;
use pulldown_core::LOG_TARGET;
use serde_json::{Map, Value, json};

use crate::config::{DEFAULT_ANIMATION_DURATION_MS, PanelDescriptor};
use crate::error::EditorError;

const EDITOR_HANDLE_COLOR: &str = "rgba(255,255,255,0.4)";
const EDITOR_DRAWER_BACKGROUND: &str = "rgba(0,0,0,0.5)";
const EDITOR_DRAWER_BLUR: i64 = 20;

/// Which panel an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTarget {
    Main,
    Drawer(usize),
}

/// Host service that shows the per-panel editing dialog.
pub trait EditorDialogHost {
    /// Edit `descriptor`. Resolves to the saved descriptor, or `None` when
    /// the dialog was dismissed without saving.
    fn edit_panel(
        &self,
        descriptor: Option<PanelDescriptor>,
    ) -> BoxedLocal<Result<Option<PanelDescriptor>, EditorError>>;
}

/// Settings section as shown to the user, with display defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorFields {
    pub auto_close_on_tap: bool,
    pub handle_color: String,
    pub drawer_background: String,
    pub drawer_blur: i64,
    pub animation_duration: i64,
}

type ChangeListener = Box<dyn FnMut(&Value)>;

#[derive(Default)]
pub struct ConfigEditor {
    config: Map<String, Value>,
    listeners: Vec<ChangeListener>,
}

impl ConfigEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the edited configuration. Does not notify.
    pub fn set_config(&mut self, config: &Value) {
        self.config = match config {
            Value::Object(map) => map.clone(),
            other => {
                tracing::warn!(target: LOG_TARGET, "editor got non-object configuration: {}", other);
                Map::new()
            }
        };
    }

    pub fn config(&self) -> Value {
        Value::Object(self.config.clone())
    }

    /// Register a "configuration changed" listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&Value) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Human-readable name of a panel descriptor.
    ///
    /// `custom:mushroom-light-card` becomes `Mushroom Light Card`.
    pub fn panel_label(descriptor: Option<&Value>) -> String {
        let Some(descriptor) = descriptor.filter(|d| !d.is_null()) else {
            return "Not configured".to_string();
        };
        let kind = descriptor
            .get("type")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .unwrap_or("unknown");

        let spaced = kind.replacen("custom:", "", 1).replace('-', " ");
        title_case(&spaced)
    }

    pub fn main_label(&self) -> String {
        Self::panel_label(self.config.get("main_card"))
    }

    pub fn drawer_labels(&self) -> Vec<String> {
        self.drawer_cards()
            .iter()
            .map(|card| Self::panel_label(Some(card)))
            .collect()
    }

    pub fn drawer_len(&self) -> usize {
        self.drawer_cards().len()
    }

    /// Current effective values of the settings section.
    pub fn fields(&self) -> EditorFields {
        let text = |key: &str, fallback: &str| {
            self.config
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        let number = |key: &str, fallback: i64| {
            self.config
                .get(key)
                .filter(|v| !v.is_null())
                .map(|v| v.as_i64().unwrap_or(0))
                .unwrap_or(fallback)
        };

        EditorFields {
            auto_close_on_tap: self.config.get("auto_close_on_tap") != Some(&Value::Bool(false)),
            handle_color: text("handle_color", EDITOR_HANDLE_COLOR),
            drawer_background: text("drawer_background", EDITOR_DRAWER_BACKGROUND),
            drawer_blur: number("drawer_blur", EDITOR_DRAWER_BLUR),
            animation_duration: number("animation_duration", DEFAULT_ANIMATION_DURATION_MS as i64),
        }
    }

    /// Append a placeholder markdown panel.
    ///
    /// Returns the target the host should open the panel dialog for.
    pub fn add_drawer_panel(&mut self) -> PanelTarget {
        let mut cards = self.drawer_cards();
        cards.push(json!({ "type": "markdown", "content": "New card" }));
        let index = cards.len() - 1;
        self.set_drawer_cards(cards);
        PanelTarget::Drawer(index)
    }

    pub fn delete_drawer_panel(&mut self, index: usize) -> Result<(), EditorError> {
        let mut cards = self.drawer_cards();
        if index >= cards.len() {
            let err = EditorError::IndexOutOfRange {
                index,
                len: cards.len(),
            };
            tracing::warn!(target: LOG_TARGET, "cannot delete drawer panel: {}", err);
            return Err(err);
        }
        cards.remove(index);
        self.set_drawer_cards(cards);
        Ok(())
    }

    /// Swap a drawer panel with the one above it. No-op for the first.
    pub fn move_up(&mut self, index: usize) -> bool {
        let mut cards = self.drawer_cards();
        if index == 0 || index >= cards.len() {
            return false;
        }
        cards.swap(index - 1, index);
        self.set_drawer_cards(cards);
        true
    }

    /// Swap a drawer panel with the one below it. No-op for the last.
    pub fn move_down(&mut self, index: usize) -> bool {
        let mut cards = self.drawer_cards();
        if index >= cards.len().saturating_sub(1) {
            return false;
        }
        cards.swap(index, index + 1);
        self.set_drawer_cards(cards);
        true
    }

    pub fn set_auto_close_on_tap(&mut self, enabled: bool) {
        self.set_field("auto_close_on_tap", Value::Bool(enabled));
    }

    pub fn set_handle_color(&mut self, color: &str) {
        self.set_field("handle_color", Value::from(color));
    }

    pub fn set_drawer_background(&mut self, background: &str) {
        self.set_field("drawer_background", Value::from(background));
    }

    /// Blur radius as typed; unparsable input becomes 0.
    pub fn set_drawer_blur(&mut self, text: &str) {
        self.set_field("drawer_blur", Value::from(parse_int_lenient(text)));
    }

    /// Duration in ms as typed; unparsable input becomes 0.
    pub fn set_animation_duration(&mut self, text: &str) {
        self.set_field("animation_duration", Value::from(parse_int_lenient(text)));
    }

    /// Edit one panel through the host's dialog.
    ///
    /// Returns true if the panel was replaced. A missing host aborts the
    /// action and is logged; the configuration is left untouched.
    pub async fn edit_panel(
        &mut self,
        target: PanelTarget,
        host: Option<&dyn EditorDialogHost>,
    ) -> Result<bool, EditorError> {
        let Some(host) = host else {
            tracing::error!(target: LOG_TARGET, "{}", EditorError::MissingHost);
            return Err(EditorError::MissingHost);
        };

        let current = match target {
            PanelTarget::Main => self.config.get("main_card").cloned(),
            PanelTarget::Drawer(index) => {
                let cards = self.drawer_cards();
                match cards.get(index) {
                    Some(card) => Some(card.clone()),
                    None => {
                        return Err(EditorError::IndexOutOfRange {
                            index,
                            len: cards.len(),
                        });
                    }
                }
            }
        };

        let saved = host
            .edit_panel(current.map(PanelDescriptor::new))
            .await
            .inspect_err(|err| {
                tracing::error!(target: LOG_TARGET, "Error opening card editor: {}", err);
            })?;
        let Some(saved) = saved else {
            return Ok(false);
        };

        match target {
            PanelTarget::Main => self.set_field("main_card", saved.into_value()),
            PanelTarget::Drawer(index) => {
                let mut cards = self.drawer_cards();
                // The list may have shrunk while the dialog was open.
                if index >= cards.len() {
                    return Err(EditorError::IndexOutOfRange {
                        index,
                        len: cards.len(),
                    });
                }
                cards[index] = saved.into_value();
                self.set_drawer_cards(cards);
            }
        }
        Ok(true)
    }

    fn drawer_cards(&self) -> Vec<Value> {
        self.config
            .get("drawer_cards")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn set_drawer_cards(&mut self, cards: Vec<Value>) {
        self.set_field("drawer_cards", Value::Array(cards));
    }

    fn set_field(&mut self, key: &str, value: Value) {
        self.config.insert(key.to_string(), value);
        self.notify();
    }

    fn notify(&mut self) {
        let config = self.config();
        tracing::trace!(target: LOG_TARGET, "configuration changed");
        for listener in &mut self.listeners {
            listener(&config);
        }
    }
}

/// Uppercase the first character of every word.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        let word_char = c.is_ascii_alphanumeric() || c == '_';
        if word_char && !in_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        in_word = word_char;
    }
    out
}

/// Leading integer of `text`, or 0 if there is none: `"12px"` is 12.
fn parse_int_lenient(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative { -value } else { value }
}

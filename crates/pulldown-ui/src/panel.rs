//! Capability traits for content panels.
//!
//! A panel is whatever the host's panel factory built from a descriptor.
//! Panels differ in what they can do: some want the shared host state, some
//! can tell the host how much room they need, many do neither. Instead of
//! probing for settable fields at runtime, panels expose these abilities
//! through capability queries.
//!
//! # Example
//!
//! ```
//! use pulldown_core::SharedState;
//! use pulldown_ui::panel::{Panel, SharedStateReceiver};
//!
//! #[derive(Default)]
//! struct Clock {
//!     updates: usize,
//! }
//!
//! impl Panel for Clock {
//!     fn as_state_receiver_mut(&mut self) -> Option<&mut dyn SharedStateReceiver> {
//!         Some(self)
//!     }
//! }
//!
//! impl SharedStateReceiver for Clock {
//!     fn set_shared_state(&mut self, _state: &SharedState) {
//!         self.updates += 1;
//!     }
//! }
//!
//! let mut clock = Clock::default();
//! let state = SharedState::new(serde_json::json!({}));
//! if let Some(receiver) = clock.as_state_receiver_mut() {
//!     receiver.set_shared_state(&state);
//! }
//! assert_eq!(clock.updates, 1);
//! ```

use pulldown_core::SharedState;

/// Layout units reported when the main panel has no size hint.
pub const DEFAULT_PANEL_SIZE: u32 = 3;

/// Base trait for all content panels.
pub trait Panel {
    /// Get the panel's name for debugging.
    fn debug_name(&self) -> &str {
        "Panel"
    }

    /// Query if this panel accepts shared state.
    fn as_state_receiver_mut(&mut self) -> Option<&mut dyn SharedStateReceiver> {
        None
    }

    /// Query if this panel reports a size hint.
    fn as_size_reporter(&self) -> Option<&dyn SizeReporter> {
        None
    }
}

/// Capability: panel that consumes the host's shared state.
pub trait SharedStateReceiver {
    /// Replace the panel's view of the shared state.
    fn set_shared_state(&mut self, state: &SharedState);
}

/// Capability: panel that knows how much layout room it needs.
pub trait SizeReporter {
    /// Size hint in host layout units.
    fn measured_size(&self) -> u32;
}

/// Inert stand-in for a panel that failed to build.
///
/// Shows the failure message, accepts nothing, reports nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    message: String,
}

impl ErrorPanel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text the renderer shows in place of the panel.
    pub fn display_text(&self) -> String {
        format!("Error: {}", self.message)
    }
}

impl Panel for ErrorPanel {
    fn debug_name(&self) -> &str {
        "ErrorPanel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Gauge {
        seen: Option<SharedState>,
        rows: u32,
    }

    impl Panel for Gauge {
        fn debug_name(&self) -> &str {
            "Gauge"
        }

        fn as_state_receiver_mut(&mut self) -> Option<&mut dyn SharedStateReceiver> {
            Some(self)
        }

        fn as_size_reporter(&self) -> Option<&dyn SizeReporter> {
            Some(self)
        }
    }

    impl SharedStateReceiver for Gauge {
        fn set_shared_state(&mut self, state: &SharedState) {
            self.seen = Some(state.clone());
        }
    }

    impl SizeReporter for Gauge {
        fn measured_size(&self) -> u32 {
            self.rows
        }
    }

    #[test]
    fn test_capability_query() {
        let mut gauge = Gauge { seen: None, rows: 5 };
        let state = SharedState::new(json!({ "temp": 21 }));

        gauge.as_state_receiver_mut().unwrap().set_shared_state(&state);
        assert!(gauge.seen.as_ref().unwrap().ptr_eq(&state));
        assert_eq!(gauge.as_size_reporter().map(|r| r.measured_size()), Some(5));
    }

    #[test]
    fn test_error_panel_is_inert() {
        let mut placeholder = ErrorPanel::new("unknown card type");
        assert!(placeholder.as_state_receiver_mut().is_none());
        assert!(placeholder.as_size_reporter().is_none());
        assert_eq!(placeholder.display_text(), "Error: unknown card type");
        assert_eq!(placeholder.debug_name(), "ErrorPanel");
    }
}

//! Pull-down card - a gesture-driven drawer over a main content panel
//!
//! The card shows one main panel. Dragging down from the handle zone at its
//! top pulls a drawer of further panels over it; dragging the drawer up, a
//! tap on the dimming overlay, the escape key or a quick tap inside drawer
//! content puts it away again.
//!
//! - **Configuration**: validated JSON ([`CardConfig`])
//! - **Panels**: built once, asynchronously, by a host [`PanelFactory`]
//! - **Shared state**: fanned out to every panel that accepts it
//! - **Input**: touch and mouse, through one gesture state machine per surface
//! - **Editor**: a headless model for the configuration UI ([`ConfigEditor`])
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Instant;
//!
//! use pulldown::{PanelDescriptor, PanelFactory, PanelFuture, PullDownCard};
//! use pulldown::core::SharedState;
//! use pulldown::ui::{Panel, PointerEvent, PointerPhase, PointerTarget};
//!
//! struct Text;
//! impl Panel for Text {}
//!
//! struct Factory;
//! impl PanelFactory for Factory {
//!     fn create(&self, _descriptor: PanelDescriptor) -> PanelFuture {
//!         Box::pin(async { Ok(Box::new(Text) as Box<dyn Panel>) })
//!     }
//! }
//!
//! let mut card = PullDownCard::new(Rc::new(Factory));
//! card.set_config(&pulldown::CardConfig::stub_value()).unwrap();
//! card.set_shared_state(SharedState::new(serde_json::json!({})));
//! card.set_drawer_extent(240.0);
//!
//! let now = Instant::now();
//! card.pump(now);
//!
//! for (phase, y) in [(PointerPhase::Press, 0.0), (PointerPhase::Move, 120.0), (PointerPhase::Release, 120.0)] {
//!     card.handle_pointer(&PointerEvent::touch(phase, PointerTarget::HandleZone, y, now));
//! }
//! assert!(card.is_open());
//! ```

use std::sync::Once;

pub mod card;
pub mod config;
pub mod editor;
pub mod error;
pub mod lifecycle;
pub mod task_pool;

pub use pulldown_core as core;
pub use pulldown_ui as ui;

pub use card::{PointerResponse, PullDownCard};
pub use config::{CardConfig, CardStyle, PanelDescriptor};
pub use editor::{ConfigEditor, EditorDialogHost, EditorFields, PanelTarget};
pub use error::{ConfigError, EditorError, PanelError};
pub use lifecycle::{BuildPhase, BuiltPanels, PanelFactory, PanelFuture, PanelLifecycle, PanelSlot};
pub use task_pool::LocalTaskPool;

/// Crate version, shown in the startup banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registration metadata for card pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardInfo {
    pub card_type: &'static str,
    pub name: &'static str,
    pub preview: bool,
    pub description: &'static str,
}

pub const CARD_INFO: CardInfo = CardInfo {
    card_type: "pull-down-card",
    name: "Pull Down Card",
    preview: true,
    description: "iOS-style pull-down drawer to reveal additional cards",
};

static BANNER: Once = Once::new();

/// Log the version banner. Only the first call in a process logs.
pub fn log_banner() {
    BANNER.call_once(|| {
        tracing::info!(target: pulldown_core::LOG_TARGET, "PULL-DOWN-CARD v{}", VERSION);
    });
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::card::{PointerResponse, PullDownCard};
    pub use crate::config::{CardConfig, PanelDescriptor};
    pub use crate::editor::{ConfigEditor, EditorDialogHost, PanelTarget};
    pub use crate::error::{ConfigError, EditorError, PanelError};
    pub use crate::lifecycle::{PanelFactory, PanelFuture, PanelSlot};

    pub use pulldown_core::SharedState;
    pub use pulldown_ui::{
        DrawerFrame, DrawerState, InputSource, Key, Panel, PointerEvent, PointerPhase,
        PointerTarget, SharedStateReceiver, SizeReporter,
    };
}

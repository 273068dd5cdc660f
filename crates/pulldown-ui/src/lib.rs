//! Pulldown UI - gesture and drawer state machines
//!
//! This crate holds everything that decides where the drawer is and
//! whether it is open, independent of any renderer:
//! - [`position`]: pure drag-delta to offset/opacity mapping
//! - [`gesture`]: per-surface drag state machines and the settle rule
//! - [`input`]: pointer events and the touch/mouse adapters
//! - [`drawer`]: open/closed controller, dismissal triggers, settle transition
//! - [`transition`]: eased transitions
//! - [`listeners`]: listener lifetime bookkeeping
//! - [`panel`]: capability traits of content panels
//!
//! ## Quick Start
//!
//! ```
//! use pulldown_ui::{DrawerController, GestureTracker, InputSource, Surface};
//!
//! let mut drawer = DrawerController::default();
//! let mut handle = GestureTracker::new(Surface::Handle);
//!
//! assert!(handle.press(InputSource::Touch, 10.0, drawer.is_open(), 320.0));
//! drawer.begin_drag(Surface::Handle.direction(), 10.0, 320.0);
//!
//! let outcome = handle.motion(InputSource::Touch, 90.0);
//! if let Some(frame) = outcome.frame {
//!     drawer.apply_live(frame, 90.0);
//! }
//!
//! let threshold = drawer.settings().swipe_threshold_px;
//! if let Some(settle) = handle.release(InputSource::Touch, 90.0, threshold) {
//!     drawer.commit(settle);
//! }
//! assert!(drawer.is_open());
//! ```

pub mod drawer;
pub mod gesture;
pub mod input;
pub mod listeners;
pub mod panel;
pub mod position;
pub mod transition;

pub use drawer::{DrawerController, DrawerFrame, DrawerSettings, DrawerState, DrawerVisual};
pub use gesture::{DragSession, GestureTracker, MoveOutcome, Settle, Surface, settle_for};
pub use input::{GestureInput, InputAdapter, InputSource, Key, PointerEvent, PointerPhase, PointerTarget};
pub use listeners::{ListenerRegistry, ListenerSet};
pub use panel::{DEFAULT_PANEL_SIZE, ErrorPanel, Panel, SharedStateReceiver, SizeReporter};
pub use position::{DragDirection, DragFrame, closing_frame, map_drag, opening_frame};
pub use transition::{EasingFunction, Transition, TransitionProperty, Transitions};

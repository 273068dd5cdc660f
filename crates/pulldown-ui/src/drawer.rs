//! Drawer state controller.
//!
//! Owns the binary open/closed state, the live drag placement, the settle
//! transition and the secondary ways of dismissing the drawer (overlay tap,
//! escape key, quick tap inside drawer content).

use std::time::{Duration, Instant};

use pulldown_core::LOG_TARGET;

use crate::gesture::Settle;
use crate::position::{DragDirection, DragFrame};
use crate::transition::{EasingFunction, Transition, TransitionProperty, Transitions};

/// Interactions inside drawer content shorter than this count as taps.
pub const TAP_MAX_DURATION: Duration = Duration::from_millis(300);

/// Delay between a qualifying tap and the auto-close.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(200);

/// Vertical travel beyond which a content interaction is a scroll, not a tap.
pub const TAP_MOVE_TOLERANCE_PX: f32 = 10.0;

/// Settled drawer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerState {
    Open,
    Closed,
}

/// Behavioral settings taken from the card configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerSettings {
    pub swipe_threshold_px: f32,
    pub animation_duration: Duration,
    pub auto_close_on_tap: bool,
}

impl Default for DrawerSettings {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 50.0,
            animation_duration: Duration::from_millis(300),
            auto_close_on_tap: true,
        }
    }
}

/// Interaction bookkeeping of the drawer.
///
/// `is_open` and `is_dragging` are independent: a drag to close runs while
/// the drawer is still settled open, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawerVisual {
    pub is_open: bool,
    pub is_dragging: bool,
    pub drag_origin_y: f32,
    pub last_pointer_y: f32,
    /// Cached drawer content height, measured when a drag begins.
    pub drawer_extent_px: f32,
}

/// Everything a renderer needs to paint the drawer and overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerFrame {
    /// Settled "open" flag.
    pub is_open: bool,
    pub is_dragging: bool,
    /// A settle transition is running.
    pub animating: bool,
    pub offset_px: f32,
    pub overlay_opacity: f32,
    pub overlay_visible: bool,
    /// The overlay accepts taps (and swallows them).
    pub overlay_interactive: bool,
}

#[derive(Debug, Clone, Copy)]
struct TapPress {
    at: Instant,
    y: f32,
    moved: bool,
}

#[derive(Debug, Default)]
struct TapTracker {
    press: Option<TapPress>,
    pending_close: Option<Instant>,
}

/// Open/closed state machine with its visual side.
#[derive(Debug)]
pub struct DrawerController {
    settings: DrawerSettings,
    visual: DrawerVisual,
    live: Option<DragFrame>,
    transitions: Transitions,
    taps: TapTracker,
    last_tick: Option<Instant>,
}

impl DrawerController {
    /// Create a closed drawer.
    pub fn new(settings: DrawerSettings) -> Self {
        Self {
            settings,
            visual: DrawerVisual::default(),
            live: None,
            transitions: Transitions::new(),
            taps: TapTracker::default(),
            last_tick: None,
        }
    }

    pub fn settings(&self) -> &DrawerSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: DrawerSettings) {
        self.settings = settings;
    }

    pub fn state(&self) -> DrawerState {
        if self.visual.is_open {
            DrawerState::Open
        } else {
            DrawerState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.visual.is_open
    }

    pub fn visual(&self) -> &DrawerVisual {
        &self.visual
    }

    /// Update the cached drawer extent.
    pub fn set_extent(&mut self, extent_px: f32) {
        if extent_px.is_finite() && extent_px >= 0.0 {
            self.visual.drawer_extent_px = extent_px;
        }
    }

    /// Whether an auto-close is scheduled.
    pub fn has_pending_close(&self) -> bool {
        self.taps.pending_close.is_some()
    }

    /// Settle open.
    pub fn open(&mut self) {
        self.settle_to(true);
    }

    /// Settle closed.
    pub fn close(&mut self) {
        self.settle_to(false);
    }

    /// A drag grabbed the drawer.
    ///
    /// Any running settle transition stops right where it is: the drag and
    /// the animation never drive the drawer at the same time.
    pub fn begin_drag(&mut self, direction: DragDirection, origin_y: f32, extent_px: f32) {
        self.transitions.clear();
        self.set_extent(extent_px);
        self.visual.is_dragging = true;
        self.visual.drag_origin_y = origin_y;
        self.visual.last_pointer_y = origin_y;
        if direction == DragDirection::Opening {
            self.taps.pending_close = None;
        }
    }

    /// Apply a live placement computed from the pointer.
    ///
    /// Ignored once a settle ended the drag, so a stale pointer never moves
    /// the drawer under a running transition.
    pub fn apply_live(&mut self, frame: DragFrame, pointer_y: f32) {
        if !self.visual.is_dragging {
            return;
        }
        self.live = Some(frame);
        self.visual.last_pointer_y = pointer_y;
    }

    /// Resolve a finished drag.
    ///
    /// Drops the live placement and hands the drawer back to the eased
    /// transition toward the settled placement.
    pub fn commit(&mut self, settle: Settle) {
        tracing::debug!(target: LOG_TARGET, "drag settled {:?}", settle);
        self.settle_to(settle.is_open());
    }

    /// Tap on the overlay. Returns true if it closed the drawer.
    pub fn overlay_tap(&mut self) -> bool {
        if !self.visual.is_open {
            return false;
        }
        self.close();
        true
    }

    /// Escape key. Returns true if it closed the drawer.
    pub fn escape(&mut self) -> bool {
        if !self.visual.is_open {
            return false;
        }
        self.close();
        true
    }

    /// Pointer went down inside drawer content.
    pub fn content_press(&mut self, now: Instant, y: f32) {
        if !self.visual.is_open {
            return;
        }
        self.taps.press = Some(TapPress {
            at: now,
            y,
            moved: false,
        });
    }

    /// Pointer moved during a content interaction.
    pub fn content_motion(&mut self, y: f32) {
        if let Some(press) = self.taps.press.as_mut() {
            if (y - press.y).abs() > TAP_MOVE_TOLERANCE_PX {
                press.moved = true;
            }
        }
    }

    /// Pointer went up after a press inside drawer content.
    ///
    /// Schedules an auto-close when the interaction was a quick, still tap
    /// that also ended inside the content. Returns true if a close was
    /// scheduled.
    pub fn content_release(&mut self, now: Instant, y: f32, inside_content: bool) -> bool {
        let Some(press) = self.taps.press.take() else {
            return false;
        };
        if !inside_content || !self.visual.is_open || !self.settings.auto_close_on_tap {
            return false;
        }

        let held = now.saturating_duration_since(press.at);
        let moved = press.moved || (y - press.y).abs() > TAP_MOVE_TOLERANCE_PX;
        if held >= TAP_MAX_DURATION || moved {
            tracing::trace!(target: LOG_TARGET, "content interaction treated as scroll ({:?})", held);
            return false;
        }

        self.taps.pending_close = Some(now + AUTO_CLOSE_DELAY);
        true
    }

    /// Advance time: runs the settle transition and fires a due auto-close.
    ///
    /// Returns true if an auto-close fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        let delta = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.transitions.update(delta.as_secs_f32());

        match self.taps.pending_close {
            Some(due) if now >= due => {
                self.taps.pending_close = None;
                if self.visual.is_open {
                    tracing::debug!(target: LOG_TARGET, "auto-closing after tap in drawer content");
                    self.close();
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Snapshot for the renderer.
    pub fn frame(&self) -> DrawerFrame {
        let current = self.current_placement();
        let animating = !self.transitions.is_empty();
        let is_open = self.visual.is_open;

        DrawerFrame {
            is_open,
            is_dragging: self.visual.is_dragging,
            animating,
            offset_px: current.offset_px,
            overlay_opacity: current.overlay_opacity,
            overlay_visible: is_open || self.live.is_some() || animating,
            overlay_interactive: is_open && !self.visual.is_dragging,
        }
    }

    fn current_placement(&self) -> DragFrame {
        if let Some(live) = self.live {
            return live;
        }
        let settled = DragFrame::settled(self.visual.is_open, self.visual.drawer_extent_px);
        DragFrame {
            offset_px: self
                .transitions
                .value(TransitionProperty::Offset)
                .unwrap_or(settled.offset_px),
            overlay_opacity: self
                .transitions
                .value(TransitionProperty::Opacity)
                .unwrap_or(settled.overlay_opacity),
        }
    }

    fn settle_to(&mut self, open: bool) {
        let from = self.current_placement();

        self.visual.is_open = open;
        self.visual.is_dragging = false;
        self.live = None;

        let target = DragFrame::settled(open, self.visual.drawer_extent_px);
        let duration = self.settings.animation_duration.as_secs_f32();

        self.transitions.clear();
        if from.offset_px != target.offset_px {
            self.transitions.start(
                Transition::new(TransitionProperty::Offset)
                    .from(from.offset_px)
                    .to(target.offset_px)
                    .duration(duration)
                    .easing(EasingFunction::STANDARD),
            );
        }
        if from.overlay_opacity != target.overlay_opacity {
            self.transitions.start(
                Transition::new(TransitionProperty::Opacity)
                    .from(from.overlay_opacity)
                    .to(target.overlay_opacity)
                    .duration(duration)
                    .easing(EasingFunction::EaseInOut),
            );
        }
        // The next tick anchors the clock for the new transition.
        self.last_tick = None;
    }
}

impl Default for DrawerController {
    fn default() -> Self {
        Self::new(DrawerSettings::default())
    }
}

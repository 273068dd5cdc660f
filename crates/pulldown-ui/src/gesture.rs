//! Per-surface drag state machines.
//!
//! The card has two drag surfaces. The handle zone opens the drawer by
//! pulling down, the drawer body closes it by pushing up. Each surface owns
//! one [`GestureTracker`] cycling `Idle -> Dragging -> Idle`.

use crate::input::InputSource;
use crate::position::{DragDirection, DragFrame, map_drag};

/// A drag surface of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Grab zone over the main panel; opens the drawer.
    Handle,
    /// The revealed drawer; closes it.
    DrawerBody,
}

impl Surface {
    /// Direction a drag on this surface moves the drawer.
    pub fn direction(self) -> DragDirection {
        match self {
            Surface::Handle => DragDirection::Opening,
            Surface::DrawerBody => DragDirection::Closing,
        }
    }

    /// Whether a press may start a drag given the settled drawer state.
    fn accepts_press(self, is_open: bool) -> bool {
        match self {
            Surface::Handle => !is_open,
            Surface::DrawerBody => is_open,
        }
    }
}

/// Target state a finished drag settles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Open,
    Closed,
}

impl Settle {
    pub fn is_open(self) -> bool {
        self == Settle::Open
    }
}

/// Decide the settle target of a released drag.
///
/// Both comparisons are strict: a delta of exactly the threshold does not
/// commit, and a zero-delta tap leaves the state where it was.
pub fn settle_for(direction: DragDirection, delta_px: f32, swipe_threshold_px: f32) -> Settle {
    match direction {
        DragDirection::Opening => {
            if delta_px > swipe_threshold_px {
                Settle::Open
            } else {
                Settle::Closed
            }
        }
        DragDirection::Closing => {
            if delta_px < -swipe_threshold_px {
                Settle::Closed
            } else {
                Settle::Open
            }
        }
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Device driving this drag.
    pub source: InputSource,
    /// Pointer y at press.
    pub origin_y: f32,
    /// Pointer y of the most recent move.
    pub last_y: f32,
    /// Drawer extent snapshot taken at press.
    pub extent_px: f32,
    /// Whether any move produced a live frame.
    pub applied: bool,
}

impl DragSession {
    /// Current displacement from the press point.
    pub fn delta(&self) -> f32 {
        self.last_y - self.origin_y
    }
}

/// Result of feeding a move into a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveOutcome {
    /// The host should suppress the platform's default gesture (scrolling).
    pub prevent_default: bool,
    /// Live placement to apply without animation.
    pub frame: Option<DragFrame>,
}

impl MoveOutcome {
    fn ignored() -> Self {
        Self::default()
    }
}

/// Drag state machine for one surface.
#[derive(Debug)]
pub struct GestureTracker {
    surface: Surface,
    session: Option<DragSession>,
}

impl GestureTracker {
    /// Create an idle tracker for `surface`.
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            session: None,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Check if a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Get the current drag session.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Try to start a drag.
    ///
    /// Returns false when the press is ignored: the surface is already
    /// dragging, or the settled state is incompatible (handle while open,
    /// drawer while closed).
    pub fn press(&mut self, source: InputSource, y: f32, is_open: bool, extent_px: f32) -> bool {
        if self.session.is_some() || !self.surface.accepts_press(is_open) {
            return false;
        }

        self.session = Some(DragSession {
            source,
            origin_y: y,
            last_y: y,
            extent_px,
            applied: false,
        });
        true
    }

    /// Feed a pointer move.
    ///
    /// Only motion in the surface's direction applies: downward for the
    /// handle, upward for the drawer. Anything else leaves the drawer where
    /// it is and lets the platform handle the gesture.
    pub fn motion(&mut self, source: InputSource, y: f32) -> MoveOutcome {
        let direction = self.surface.direction();
        let Some(session) = self.session.as_mut().filter(|s| s.source == source) else {
            return MoveOutcome::ignored();
        };

        let delta = y - session.origin_y;
        let applies = match direction {
            DragDirection::Opening => delta > 0.0,
            DragDirection::Closing => delta < 0.0,
        };
        if !applies {
            return MoveOutcome::ignored();
        }

        session.last_y = y;
        session.applied = true;
        MoveOutcome {
            prevent_default: true,
            frame: Some(map_drag(delta, session.extent_px, direction)),
        }
    }

    /// Finish the drag at `y` and decide where it settles.
    ///
    /// Returns `None` if there was no drag from `source`.
    pub fn release(&mut self, source: InputSource, y: f32, swipe_threshold_px: f32) -> Option<Settle> {
        if !self.session.is_some_and(|s| s.source == source) {
            return None;
        }
        let session = self.session.take()?;
        Some(settle_for(self.surface.direction(), y - session.origin_y, swipe_threshold_px))
    }

    /// Abort the drag, settling back to the state that held at press.
    pub fn cancel(&mut self) -> Option<Settle> {
        self.session.take().map(|_| match self.surface {
            Surface::Handle => Settle::Closed,
            Surface::DrawerBody => Settle::Open,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 50.0;

    #[test]
    fn test_handle_drag_past_threshold_opens() {
        let mut tracker = GestureTracker::new(Surface::Handle);
        assert!(tracker.press(InputSource::Touch, 100.0, false, 300.0));
        assert!(tracker.is_dragging());

        let outcome = tracker.motion(InputSource::Touch, 160.0);
        assert!(outcome.prevent_default);
        let frame = outcome.frame.unwrap();
        assert!((frame.offset_px + 240.0).abs() < 0.001);

        assert_eq!(tracker.release(InputSource::Touch, 160.0, THRESHOLD), Some(Settle::Open));
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(settle_for(DragDirection::Opening, THRESHOLD, THRESHOLD), Settle::Closed);
        assert_eq!(settle_for(DragDirection::Opening, THRESHOLD + 1.0, THRESHOLD), Settle::Open);
        assert_eq!(settle_for(DragDirection::Closing, -THRESHOLD, THRESHOLD), Settle::Open);
        assert_eq!(settle_for(DragDirection::Closing, -THRESHOLD - 1.0, THRESHOLD), Settle::Closed);
    }

    #[test]
    fn test_tap_leaves_state_unchanged() {
        assert_eq!(settle_for(DragDirection::Opening, 0.0, THRESHOLD), Settle::Closed);
        assert_eq!(settle_for(DragDirection::Closing, 0.0, THRESHOLD), Settle::Open);
    }

    #[test]
    fn test_short_drawer_drag_stays_open() {
        let mut tracker = GestureTracker::new(Surface::DrawerBody);
        assert!(tracker.press(InputSource::Touch, 300.0, true, 300.0));
        tracker.motion(InputSource::Touch, 270.0);
        assert_eq!(tracker.release(InputSource::Touch, 270.0, THRESHOLD), Some(Settle::Open));
    }

    #[test]
    fn test_incompatible_presses_are_ignored() {
        let mut handle = GestureTracker::new(Surface::Handle);
        assert!(!handle.press(InputSource::Touch, 0.0, true, 300.0));

        let mut body = GestureTracker::new(Surface::DrawerBody);
        assert!(!body.press(InputSource::Mouse, 0.0, false, 300.0));
        assert!(body.session().is_none());
    }

    #[test]
    fn test_wrong_direction_motion_is_passed_through() {
        let mut tracker = GestureTracker::new(Surface::Handle);
        tracker.press(InputSource::Touch, 100.0, false, 300.0);

        let up = tracker.motion(InputSource::Touch, 80.0);
        assert_eq!(up, MoveOutcome::default());
        let still = tracker.motion(InputSource::Touch, 100.0);
        assert!(!still.prevent_default);
        assert!(!tracker.session().unwrap().applied);
    }

    #[test]
    fn test_second_press_and_foreign_source_are_ignored() {
        let mut tracker = GestureTracker::new(Surface::Handle);
        assert!(tracker.press(InputSource::Mouse, 10.0, false, 300.0));
        assert!(!tracker.press(InputSource::Touch, 50.0, false, 300.0));
        assert_eq!(tracker.session().unwrap().origin_y, 10.0);

        assert!(tracker.motion(InputSource::Touch, 200.0).frame.is_none());
        assert_eq!(tracker.release(InputSource::Touch, 200.0, THRESHOLD), None);
        assert!(tracker.is_dragging());

        assert_eq!(tracker.release(InputSource::Mouse, 10.0, THRESHOLD), Some(Settle::Closed));
    }

    #[test]
    fn test_cancel_restores_press_state() {
        let mut handle = GestureTracker::new(Surface::Handle);
        handle.press(InputSource::Touch, 0.0, false, 300.0);
        handle.motion(InputSource::Touch, 250.0);
        assert_eq!(handle.cancel(), Some(Settle::Closed));
        assert_eq!(handle.cancel(), None);

        let mut body = GestureTracker::new(Surface::DrawerBody);
        body.press(InputSource::Touch, 0.0, true, 300.0);
        assert_eq!(body.cancel(), Some(Settle::Open));
    }

    #[test]
    fn test_release_uses_release_position() {
        let mut tracker = GestureTracker::new(Surface::Handle);
        tracker.press(InputSource::Mouse, 0.0, false, 300.0);
        tracker.motion(InputSource::Mouse, 20.0);
        assert_eq!(tracker.release(InputSource::Mouse, 90.0, THRESHOLD), Some(Settle::Open));
    }
}

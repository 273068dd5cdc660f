//! Pointer and key input, and the adapters that turn raw pointer events
//! into the common gesture call sequence.
//!
//! Touch and emulated mouse input both end up as
//! [`GestureInput::Start`] / [`GestureInput::Move`] / [`GestureInput::End`]
//! for exactly one [`Surface`]. The gesture state machine never sees which
//! device produced them.

use std::time::Instant;

use crate::gesture::Surface;

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// Finger on a touch screen.
    Touch,
    /// Mouse or other pointing device emulating a drag.
    Mouse,
}

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    /// The platform aborted the pointer sequence.
    Cancel,
}

/// Part of the card a pointer event hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The grab zone at the top of the main panel.
    HandleZone,
    /// The drawer. `in_content` is set when the hit is inside the drawer
    /// panels rather than on the drawer chrome.
    Drawer { in_content: bool },
    /// The dimming overlay behind the drawer.
    Overlay,
    /// Anywhere else in the document.
    Elsewhere,
}

impl PointerTarget {
    /// Drag surface this target belongs to, if any.
    pub fn surface(self) -> Option<Surface> {
        match self {
            PointerTarget::HandleZone => Some(Surface::Handle),
            PointerTarget::Drawer { .. } => Some(Surface::DrawerBody),
            PointerTarget::Overlay | PointerTarget::Elsewhere => None,
        }
    }

    /// Whether the hit lands inside drawer panel content.
    pub fn is_drawer_content(self) -> bool {
        matches!(self, PointerTarget::Drawer { in_content: true })
    }
}

/// A raw pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub source: InputSource,
    pub target: PointerTarget,
    /// Client-space vertical coordinate in pixels.
    pub y: f32,
    pub timestamp: Instant,
}

impl PointerEvent {
    pub fn new(
        phase: PointerPhase,
        source: InputSource,
        target: PointerTarget,
        y: f32,
        timestamp: Instant,
    ) -> Self {
        Self {
            phase,
            source,
            target,
            y,
            timestamp,
        }
    }

    pub fn touch(phase: PointerPhase, target: PointerTarget, y: f32, timestamp: Instant) -> Self {
        Self::new(phase, InputSource::Touch, target, y, timestamp)
    }

    pub fn mouse(phase: PointerPhase, target: PointerTarget, y: f32, timestamp: Instant) -> Self {
        Self::new(phase, InputSource::Mouse, target, y, timestamp)
    }
}

/// Keys the card reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Other,
}

/// Source-independent gesture call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    Start(f32),
    Move(f32),
    End(f32),
    Cancel,
}

/// Translates the events of one input source into gesture calls.
///
/// A press on a drag surface captures that surface; every following move,
/// release or cancel of the same source is routed to it regardless of where
/// the pointer is now.
#[derive(Debug)]
pub struct InputAdapter {
    source: InputSource,
    captured: Option<Surface>,
}

impl InputAdapter {
    /// Adapter for touch input.
    pub fn touch() -> Self {
        Self {
            source: InputSource::Touch,
            captured: None,
        }
    }

    /// Adapter for emulated mouse input.
    pub fn mouse() -> Self {
        Self {
            source: InputSource::Mouse,
            captured: None,
        }
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    /// Surface currently captured by this source.
    pub fn captured(&self) -> Option<Surface> {
        self.captured
    }

    /// Translate a raw event. Events of another source are ignored.
    pub fn translate(&mut self, event: &PointerEvent) -> Option<(Surface, GestureInput)> {
        if event.source != self.source {
            return None;
        }

        match event.phase {
            PointerPhase::Press => {
                if self.captured.is_some() {
                    return None;
                }
                let surface = event.target.surface()?;
                self.captured = Some(surface);
                Some((surface, GestureInput::Start(event.y)))
            }
            PointerPhase::Move => self.captured.map(|s| (s, GestureInput::Move(event.y))),
            PointerPhase::Release => self.captured.take().map(|s| (s, GestureInput::End(event.y))),
            PointerPhase::Cancel => self.captured.take().map(|s| (s, GestureInput::Cancel)),
        }
    }

    /// Drop the capture, e.g. when the gesture rejected the press.
    pub fn release_capture(&mut self) -> Option<Surface> {
        self.captured.take()
    }
}

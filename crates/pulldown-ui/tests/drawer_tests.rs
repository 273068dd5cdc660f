//! Gesture tracker and drawer controller working together.

use std::time::{Duration, Instant};

use pulldown_ui::{
    DragDirection, DrawerController, DrawerSettings, DrawerState, GestureInput, GestureTracker,
    InputAdapter, InputSource, PointerEvent, PointerPhase, PointerTarget, Settle, Surface,
};

const EXTENT: f32 = 300.0;

struct Rig {
    drawer: DrawerController,
    handle: GestureTracker,
    body: GestureTracker,
}

impl Rig {
    fn new(settings: DrawerSettings) -> Self {
        Self {
            drawer: DrawerController::new(settings),
            handle: GestureTracker::new(Surface::Handle),
            body: GestureTracker::new(Surface::DrawerBody),
        }
    }

    fn tracker(&mut self, surface: Surface) -> &mut GestureTracker {
        match surface {
            Surface::Handle => &mut self.handle,
            Surface::DrawerBody => &mut self.body,
        }
    }

    /// Press, move and release on `surface`; returns the settle, if any.
    fn drag(&mut self, surface: Surface, from: f32, to: f32) -> Option<Settle> {
        let is_open = self.drawer.is_open();
        if !self.tracker(surface).press(InputSource::Touch, from, is_open, EXTENT) {
            return None;
        }
        self.drawer.begin_drag(surface.direction(), from, EXTENT);
        if let Some(frame) = self.tracker(surface).motion(InputSource::Touch, to).frame {
            self.drawer.apply_live(frame, to);
        }
        let threshold = self.drawer.settings().swipe_threshold_px;
        let settle = self.tracker(surface).release(InputSource::Touch, to, threshold)?;
        self.drawer.commit(settle);
        Some(settle)
    }
}

#[test]
fn test_open_then_close_by_drag() {
    let mut rig = Rig::new(DrawerSettings::default());

    assert_eq!(rig.drag(Surface::Handle, 10.0, 70.0), Some(Settle::Open));
    assert_eq!(rig.drawer.state(), DrawerState::Open);

    assert_eq!(rig.drag(Surface::DrawerBody, 250.0, 230.0), Some(Settle::Open));
    assert_eq!(rig.drawer.state(), DrawerState::Open);

    assert_eq!(rig.drag(Surface::DrawerBody, 250.0, 150.0), Some(Settle::Closed));
    assert_eq!(rig.drawer.state(), DrawerState::Closed);
}

#[test]
fn test_incompatible_surfaces_ignored() {
    let mut rig = Rig::new(DrawerSettings::default());
    assert_eq!(rig.drag(Surface::DrawerBody, 200.0, 0.0), None);

    rig.drawer.open();
    assert_eq!(rig.drag(Surface::Handle, 0.0, 200.0), None);
    assert!(rig.drawer.is_open());
}

#[test]
fn test_live_frame_follows_pointer() {
    let mut rig = Rig::new(DrawerSettings::default());
    rig.handle.press(InputSource::Touch, 0.0, false, EXTENT);
    rig.drawer.begin_drag(DragDirection::Opening, 0.0, EXTENT);

    let mut last_offset = -EXTENT;
    for y in [30.0, 90.0, 180.0, 400.0] {
        let frame = rig.handle.motion(InputSource::Touch, y).frame.unwrap();
        rig.drawer.apply_live(frame, y);
        let drawn = rig.drawer.frame();
        assert!(drawn.is_dragging);
        assert!(!drawn.animating);
        assert!(drawn.offset_px >= last_offset);
        assert!((-EXTENT..=0.0).contains(&drawn.offset_px));
        last_offset = drawn.offset_px;
    }
    assert_eq!(last_offset, 0.0);
    assert_eq!(rig.drawer.visual().last_pointer_y, 400.0);
}

#[test]
fn test_settle_eases_from_release_point() {
    let mut rig = Rig::new(DrawerSettings {
        animation_duration: Duration::from_millis(200),
        ..DrawerSettings::default()
    });
    let t0 = Instant::now();
    rig.drag(Surface::Handle, 0.0, 150.0);

    let at_release = rig.drawer.frame();
    assert!(at_release.animating);
    assert_eq!(at_release.offset_px, -150.0);

    rig.drawer.tick(t0);
    rig.drawer.tick(t0 + Duration::from_millis(100));
    let midway = rig.drawer.frame();
    assert!(midway.offset_px > -150.0 && midway.offset_px < 0.0);

    rig.drawer.tick(t0 + Duration::from_millis(250));
    let settled = rig.drawer.frame();
    assert!(!settled.animating);
    assert_eq!(settled.offset_px, 0.0);
    assert_eq!(settled.overlay_opacity, 1.0);
}

#[test]
fn test_adapters_feed_one_state_machine() {
    let mut rig = Rig::new(DrawerSettings::default());
    let mut touch = InputAdapter::touch();
    let mut mouse = InputAdapter::mouse();
    let now = Instant::now();

    let events = [
        PointerEvent::mouse(PointerPhase::Press, PointerTarget::HandleZone, 0.0, now),
        PointerEvent::mouse(PointerPhase::Move, PointerTarget::Elsewhere, 40.0, now),
        PointerEvent::mouse(PointerPhase::Move, PointerTarget::Elsewhere, 90.0, now),
        PointerEvent::mouse(PointerPhase::Release, PointerTarget::Elsewhere, 90.0, now),
    ];

    for event in &events {
        assert!(touch.translate(event).is_none());
        let Some((surface, input)) = mouse.translate(event) else {
            continue;
        };
        match input {
            GestureInput::Start(y) => {
                assert!(rig.tracker(surface).press(InputSource::Mouse, y, false, EXTENT));
                rig.drawer.begin_drag(surface.direction(), y, EXTENT);
            }
            GestureInput::Move(y) => {
                if let Some(frame) = rig.tracker(surface).motion(InputSource::Mouse, y).frame {
                    rig.drawer.apply_live(frame, y);
                }
            }
            GestureInput::End(y) => {
                let settle = rig.tracker(surface).release(InputSource::Mouse, y, 50.0).unwrap();
                rig.drawer.commit(settle);
            }
            GestureInput::Cancel => unreachable!(),
        }
    }

    assert!(rig.drawer.is_open());
    assert_eq!(mouse.captured(), None);
}

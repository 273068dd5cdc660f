//! The pull-down card widget.
//!
//! A [`PullDownCard`] is one mounted instance: it validates configuration,
//! builds its panels on a local executor once configuration and shared state
//! are both known, and turns raw pointer and key events into drawer state.
//! The host drives it by calling [`PullDownCard::pump`] once per frame.

use std::rc::Rc;
use std::time::Instant;

use async_executor::Task;
use pulldown_core::{LOG_TARGET, SharedState};
use pulldown_ui::{
    DrawerController, DrawerFrame, DrawerSettings, DrawerState, GestureInput, GestureTracker,
    InputAdapter, InputSource, Key, ListenerRegistry, ListenerSet, PointerEvent, PointerPhase,
    Surface,
};
use serde_json::Value;

use crate::config::{CardConfig, CardStyle};
use crate::error::ConfigError;
use crate::lifecycle::{BuildPhase, BuiltPanels, PanelFactory, PanelLifecycle, PanelSlot};
use crate::task_pool::LocalTaskPool;

/// What the host should do with a pointer event after the card saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerResponse {
    /// Suppress the platform default (scrolling) for this event.
    pub prevent_default: bool,
}

/// A single pull-down card instance.
pub struct PullDownCard {
    config: Option<CardConfig>,
    shared_state: Option<SharedState>,
    lifecycle: PanelLifecycle,
    pool: LocalTaskPool,
    build_task: Option<Task<BuiltPanels>>,
    mounted: bool,
    unmounted: bool,

    drawer: DrawerController,
    handle: GestureTracker,
    body: GestureTracker,
    touch: InputAdapter,
    mouse: InputAdapter,
    listeners: ListenerRegistry,
    /// Latest drawer content height reported by host layout.
    layout_extent_px: f32,
}

impl PullDownCard {
    pub fn new(factory: Rc<dyn PanelFactory>) -> Self {
        crate::log_banner();
        Self {
            config: None,
            shared_state: None,
            lifecycle: PanelLifecycle::new(factory),
            pool: LocalTaskPool::new(),
            build_task: None,
            mounted: false,
            unmounted: false,
            drawer: DrawerController::new(DrawerSettings::default()),
            handle: GestureTracker::new(Surface::Handle),
            body: GestureTracker::new(Surface::DrawerBody),
            touch: InputAdapter::touch(),
            mouse: InputAdapter::mouse(),
            listeners: ListenerRegistry::new(),
            layout_extent_px: 0.0,
        }
    }

    /// Validate and store a configuration.
    ///
    /// Behavioral settings take effect immediately. Panels that are already
    /// built (or being built) are kept as they are.
    pub fn set_config(&mut self, raw: &Value) -> Result<(), ConfigError> {
        let config = CardConfig::from_value(raw)?;

        if self.lifecycle.phase() != BuildPhase::Idle {
            tracing::debug!(
                target: LOG_TARGET,
                "configuration replaced after build started; panels are not rebuilt"
            );
        }
        self.drawer.set_settings(config.drawer_settings());
        self.config = Some(config);
        self.maybe_start_build();
        Ok(())
    }

    /// Receive a new shared state from the host.
    ///
    /// Delivering the same value again is a no-op.
    pub fn set_shared_state(&mut self, state: SharedState) {
        if self
            .shared_state
            .as_ref()
            .is_some_and(|current| current.ptr_eq(&state))
        {
            return;
        }
        self.lifecycle.propagate_state(&state);
        self.shared_state = Some(state);
        self.maybe_start_build();
    }

    fn maybe_start_build(&mut self) {
        if self.unmounted || self.build_task.is_some() {
            return;
        }
        let (Some(config), Some(state)) = (self.config.as_ref(), self.shared_state.as_ref()) else {
            return;
        };
        if let Some(future) = self.lifecycle.begin_build(config, state) {
            self.build_task = Some(self.pool.spawn(future));
        }
    }

    /// Advance the card to `now`.
    ///
    /// Runs pending panel construction, mounts once the build is complete,
    /// fires a due auto-close and steps the settle animation.
    pub fn pump(&mut self, now: Instant) {
        self.pool.run_until_stalled();

        if let Some(task) = self.build_task.as_mut() {
            if let Some(built) = LocalTaskPool::try_take(task) {
                self.build_task = None;
                if self.lifecycle.finish_build(built) {
                    self.mount();
                }
            }
        }

        if self.drawer.tick(now) {
            self.abandon_drags();
        }
    }

    fn mount(&mut self) {
        if self.mounted || self.unmounted {
            return;
        }
        if self.listeners.register(ListenerSet::MOUNT) {
            self.mounted = true;
            tracing::debug!(target: LOG_TARGET, "card mounted");
        }
    }

    /// Tear the card down: cancel any drag and detach every listener.
    pub fn unmount(&mut self) {
        for tracker in [&mut self.handle, &mut self.body] {
            if let Some(settle) = tracker.cancel() {
                self.drawer.commit(settle);
            }
        }
        self.touch.release_capture();
        self.mouse.release_capture();
        self.listeners.clear();
        self.build_task = None;
        self.mounted = false;
        self.unmounted = true;
        tracing::debug!(target: LOG_TARGET, "card unmounted");
    }

    /// Host layout measured the drawer content.
    pub fn set_drawer_extent(&mut self, extent_px: f32) {
        if extent_px.is_finite() && extent_px >= 0.0 {
            self.layout_extent_px = extent_px;
        }
    }

    /// Feed a raw pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerResponse {
        let mut response = PointerResponse::default();
        if !self.mounted {
            return response;
        }

        if self.listeners.is_registered(ListenerSet::CONTENT_POINTER) {
            self.track_content(event);
        }

        let Some((surface, input)) = self.route(event) else {
            return response;
        };
        let source = event.source;

        match input {
            GestureInput::Start(y) => self.start_drag(surface, source, y),
            GestureInput::Move(y) => {
                let outcome = self.tracker_mut(surface).motion(source, y);
                if let Some(frame) = outcome.frame {
                    self.drawer.apply_live(frame, y);
                }
                response.prevent_default = outcome.prevent_default;
            }
            GestureInput::End(y) => {
                let threshold = self.drawer.settings().swipe_threshold_px;
                let settle = self.tracker_mut(surface).release(source, y, threshold);
                self.end_mouse_drag(source);
                if let Some(settle) = settle {
                    self.drawer.commit(settle);
                }
            }
            GestureInput::Cancel => {
                let settle = self.tracker_mut(surface).cancel();
                self.end_mouse_drag(source);
                if let Some(settle) = settle {
                    self.drawer.commit(settle);
                }
            }
        }
        response
    }

    /// Only events with an attached listener reach the adapters.
    fn route(&mut self, event: &PointerEvent) -> Option<(Surface, GestureInput)> {
        if event.phase == PointerPhase::Press {
            let surface = event.target.surface()?;
            if !self.listeners.is_registered(surface_listener(surface, event.source)) {
                return None;
            }
        } else if event.source == InputSource::Mouse
            && !self.listeners.is_registered(ListenerSet::MOUSE_DRAG)
        {
            return None;
        }

        match event.source {
            InputSource::Touch => self.touch.translate(event),
            InputSource::Mouse => self.mouse.translate(event),
        }
    }

    fn start_drag(&mut self, surface: Surface, source: InputSource, y: f32) {
        let extent = self.measure_extent(surface);
        let is_open = self.drawer.is_open();

        if !self.tracker_mut(surface).press(source, y, is_open, extent) {
            match source {
                InputSource::Touch => self.touch.release_capture(),
                InputSource::Mouse => self.mouse.release_capture(),
            };
            return;
        }

        tracing::trace!(target: LOG_TARGET, "{:?} drag on {:?} from y={}", source, surface, y);
        self.drawer.begin_drag(surface.direction(), y, extent);
        if source == InputSource::Mouse {
            self.listeners.register(ListenerSet::MOUSE_DRAG);
        }
    }

    /// Drop every in-flight drag without committing it.
    ///
    /// Called after a trigger other than the drag itself settled the drawer;
    /// the remaining pointer events of that gesture go nowhere.
    fn abandon_drags(&mut self) {
        let mut abandoned = false;
        for tracker in [&mut self.handle, &mut self.body] {
            abandoned |= tracker.cancel().is_some();
        }
        self.touch.release_capture();
        self.mouse.release_capture();
        self.listeners.deregister(ListenerSet::MOUSE_DRAG);
        if abandoned {
            tracing::debug!(target: LOG_TARGET, "drag abandoned, drawer settled elsewhere");
        }
    }

    fn end_mouse_drag(&mut self, source: InputSource) {
        if source == InputSource::Mouse {
            self.listeners.deregister(ListenerSet::MOUSE_DRAG);
        }
    }

    /// Opening drags always take a fresh measurement; closing drags reuse
    /// the cached extent unless none was ever taken.
    fn measure_extent(&self, surface: Surface) -> f32 {
        let cached = self.drawer.visual().drawer_extent_px;
        match surface {
            Surface::Handle => self.layout_extent_px,
            Surface::DrawerBody if cached > 0.0 => cached,
            Surface::DrawerBody => self.layout_extent_px,
        }
    }

    fn tracker_mut(&mut self, surface: Surface) -> &mut GestureTracker {
        match surface {
            Surface::Handle => &mut self.handle,
            Surface::DrawerBody => &mut self.body,
        }
    }

    fn track_content(&mut self, event: &PointerEvent) {
        match event.phase {
            PointerPhase::Press if event.target.is_drawer_content() => {
                self.drawer.content_press(event.timestamp, event.y);
            }
            PointerPhase::Move => self.drawer.content_motion(event.y),
            PointerPhase::Release => {
                let inside = event.target.is_drawer_content();
                if self.drawer.content_release(event.timestamp, event.y, inside) {
                    tracing::debug!(target: LOG_TARGET, "tap in drawer content, auto-close scheduled");
                }
            }
            _ => {}
        }
    }

    /// Tap on the dimming overlay. Returns true if it closed the drawer.
    pub fn overlay_tap(&mut self) -> bool {
        if !self.listeners.is_registered(ListenerSet::OVERLAY_TAP) || !self.frame().overlay_interactive {
            return false;
        }
        let closed = self.drawer.overlay_tap();
        if closed {
            self.abandon_drags();
        }
        closed
    }

    /// Document key press. Returns true if it closed the drawer.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if key != Key::Escape || !self.listeners.is_registered(ListenerSet::ESCAPE_KEY) {
            return false;
        }
        let closed = self.drawer.escape();
        if closed {
            self.abandon_drags();
        }
        closed
    }

    /// Current render snapshot.
    pub fn frame(&self) -> DrawerFrame {
        self.drawer.frame()
    }

    pub fn state(&self) -> DrawerState {
        self.drawer.state()
    }

    pub fn is_open(&self) -> bool {
        self.drawer.is_open()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Layout size hint for the host grid.
    pub fn reported_size(&self) -> u32 {
        self.lifecycle.reported_size()
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    pub fn style(&self) -> Option<CardStyle> {
        self.config.as_ref().map(CardConfig::style)
    }

    pub fn main_panel(&self) -> Option<&PanelSlot> {
        self.lifecycle.main_panel()
    }

    pub fn drawer_panels(&self) -> &[PanelSlot] {
        self.lifecycle.drawer_panels()
    }

    pub fn lifecycle(&self) -> &PanelLifecycle {
        &self.lifecycle
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn drawer(&self) -> &DrawerController {
        &self.drawer
    }

    /// Open programmatically.
    pub fn open(&mut self) {
        self.abandon_drags();
        self.drawer.open();
    }

    /// Close programmatically.
    pub fn close(&mut self) {
        self.abandon_drags();
        self.drawer.close();
    }
}

fn surface_listener(surface: Surface, source: InputSource) -> ListenerSet {
    match (surface, source) {
        (Surface::Handle, InputSource::Touch) => ListenerSet::HANDLE_TOUCH,
        (Surface::Handle, InputSource::Mouse) => ListenerSet::HANDLE_MOUSE,
        (Surface::DrawerBody, InputSource::Touch) => ListenerSet::DRAWER_TOUCH,
        (Surface::DrawerBody, InputSource::Mouse) => ListenerSet::DRAWER_MOUSE,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_lite::future;
    use pulldown_ui::{Panel, PointerTarget};
    use serde_json::json;

    use super::*;
    use crate::error::PanelError;
    use crate::lifecycle::PanelFuture;
    use crate::config::PanelDescriptor;

    struct Blank;

    impl Panel for Blank {}

    struct BlankFactory;

    impl PanelFactory for BlankFactory {
        fn create(&self, descriptor: PanelDescriptor) -> PanelFuture {
            Box::pin(async move {
                match descriptor.kind() {
                    Some("broken") => Err(PanelError::build("broken")),
                    _ => Ok(Box::new(Blank) as Box<dyn Panel>),
                }
            })
        }
    }

    struct NeverFactory;

    impl PanelFactory for NeverFactory {
        fn create(&self, _descriptor: PanelDescriptor) -> PanelFuture {
            Box::pin(future::pending())
        }
    }

    fn mounted_card(now: Instant) -> PullDownCard {
        let mut card = PullDownCard::new(Rc::new(BlankFactory));
        card.set_config(&json!({ "main_card": {}, "drawer_cards": [{}] }))
            .unwrap();
        card.set_shared_state(SharedState::new(json!({})));
        card.set_drawer_extent(300.0);
        card.pump(now);
        card
    }

    fn touch(phase: PointerPhase, target: PointerTarget, y: f32, at: Instant) -> PointerEvent {
        PointerEvent::touch(phase, target, y, at)
    }

    #[test]
    fn test_build_waits_for_config_and_state() {
        let now = Instant::now();
        let mut card = PullDownCard::new(Rc::new(BlankFactory));
        card.set_shared_state(SharedState::new(json!({})));
        card.pump(now);
        assert!(!card.is_mounted());
        assert!(card.main_panel().is_none());

        card.set_config(&json!({ "main_card": {}, "drawer_cards": [] }))
            .unwrap();
        card.pump(now);
        assert!(card.is_mounted());
        assert!(card.main_panel().is_some_and(PanelSlot::is_live));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut card = PullDownCard::new(Rc::new(BlankFactory));
        assert!(matches!(
            card.set_config(&json!({ "drawer_cards": [] })),
            Err(ConfigError::MissingMainCard)
        ));
        assert!(card.config().is_none());
    }

    #[test]
    fn test_events_ignored_until_mounted() {
        let now = Instant::now();
        let mut card = PullDownCard::new(Rc::new(NeverFactory));
        card.set_config(&json!({ "main_card": {}, "drawer_cards": [] }))
            .unwrap();
        card.set_shared_state(SharedState::new(json!({})));
        card.pump(now);
        assert!(!card.is_mounted());

        card.handle_pointer(&touch(PointerPhase::Press, PointerTarget::HandleZone, 0.0, now));
        card.handle_pointer(&touch(PointerPhase::Move, PointerTarget::HandleZone, 100.0, now));
        card.handle_pointer(&touch(PointerPhase::Release, PointerTarget::HandleZone, 100.0, now));
        assert!(!card.is_open());
        assert!(card.listeners().active().is_empty());
    }

    #[test]
    fn test_mount_attaches_listeners_once() {
        let now = Instant::now();
        let mut card = mounted_card(now);
        assert_eq!(card.listeners().active(), ListenerSet::MOUNT);
        let attached = card.listeners().attach_count();

        card.set_shared_state(SharedState::new(json!({ "again": true })));
        card.pump(now);
        assert_eq!(card.listeners().attach_count(), attached);
    }

    #[test]
    fn test_touch_drag_prevents_default_only_when_applied() {
        let now = Instant::now();
        let mut card = mounted_card(now);

        card.handle_pointer(&touch(PointerPhase::Press, PointerTarget::HandleZone, 100.0, now));
        let up = card.handle_pointer(&touch(PointerPhase::Move, PointerTarget::HandleZone, 90.0, now));
        assert!(!up.prevent_default);
        let down = card.handle_pointer(&touch(PointerPhase::Move, PointerTarget::HandleZone, 130.0, now));
        assert!(down.prevent_default);

        let frame = card.frame();
        assert!(frame.is_dragging);
        assert_eq!(frame.offset_px, -270.0);
        assert!((frame.overlay_opacity - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_mouse_drag_listeners_are_transient() {
        let now = Instant::now();
        let mut card = mounted_card(now);

        let press = PointerEvent::mouse(PointerPhase::Press, PointerTarget::HandleZone, 0.0, now);
        card.handle_pointer(&press);
        assert!(card.listeners().is_registered(ListenerSet::MOUSE_DRAG));

        // Release lands outside the card.
        let release = PointerEvent::mouse(PointerPhase::Release, PointerTarget::Elsewhere, 80.0, now);
        card.handle_pointer(&release);
        assert!(!card.listeners().is_registered(ListenerSet::MOUSE_DRAG));
        assert!(card.is_open());
    }

    #[test]
    fn test_stray_mouse_moves_ignored() {
        let now = Instant::now();
        let mut card = mounted_card(now);
        let moved = PointerEvent::mouse(PointerPhase::Move, PointerTarget::HandleZone, 200.0, now);
        assert!(!card.handle_pointer(&moved).prevent_default);
        assert!(!card.frame().is_dragging);
    }

    #[test]
    fn test_overlay_tap_closes_only_when_open() {
        let now = Instant::now();
        let mut card = mounted_card(now);
        assert!(!card.overlay_tap());

        card.open();
        assert!(card.overlay_tap());
        assert!(!card.is_open());
    }

    #[test]
    fn test_escape() {
        let now = Instant::now();
        let mut card = mounted_card(now);
        assert!(!card.handle_key(Key::Escape));

        card.open();
        assert!(!card.handle_key(Key::Other));
        assert!(card.handle_key(Key::Escape));
        assert_eq!(card.state(), DrawerState::Closed);
    }

    #[test]
    fn test_unmount_cancels_drag_and_detaches() {
        let now = Instant::now();
        let mut card = mounted_card(now);

        card.handle_pointer(&PointerEvent::mouse(PointerPhase::Press, PointerTarget::HandleZone, 0.0, now));
        card.handle_pointer(&PointerEvent::mouse(PointerPhase::Move, PointerTarget::Elsewhere, 200.0, now));
        card.unmount();

        assert!(card.listeners().active().is_empty());
        assert!(!card.frame().is_dragging);
        assert!(!card.is_open());
        assert!(!card.handle_key(Key::Escape));
    }

    #[test]
    fn test_settle_animation_finishes() {
        let now = Instant::now();
        let mut card = mounted_card(now);

        card.handle_pointer(&touch(PointerPhase::Press, PointerTarget::HandleZone, 0.0, now));
        card.handle_pointer(&touch(PointerPhase::Move, PointerTarget::HandleZone, 150.0, now));
        card.handle_pointer(&touch(PointerPhase::Release, PointerTarget::HandleZone, 150.0, now));
        assert!(card.frame().animating);

        card.pump(now);
        card.pump(now + Duration::from_millis(400));
        let frame = card.frame();
        assert!(!frame.animating);
        assert_eq!(frame.offset_px, 0.0);
        assert_eq!(frame.overlay_opacity, 1.0);
    }
}

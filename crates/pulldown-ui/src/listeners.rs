//! Bookkeeping for the event listeners a mounted card holds.
//!
//! Surface listeners and the document-level escape/content listeners live
//! as long as the mount. Mouse move/up listeners only exist while a mouse
//! drag is in progress. The registry makes both lifetimes explicit so the
//! card can route events only to listeners that exist, and so unmount can
//! prove everything is gone.

use bitflags::bitflags;
use pulldown_core::LOG_TARGET;

bitflags! {
    /// Listener slots.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListenerSet: u16 {
        /// Touch start/move/end on the handle zone.
        const HANDLE_TOUCH = 1 << 0;
        /// Mouse down on the handle zone.
        const HANDLE_MOUSE = 1 << 1;
        /// Touch start/move/end on the drawer.
        const DRAWER_TOUCH = 1 << 2;
        /// Mouse down on the drawer.
        const DRAWER_MOUSE = 1 << 3;
        /// Click on the overlay.
        const OVERLAY_TAP = 1 << 4;
        /// Document keydown (escape).
        const ESCAPE_KEY = 1 << 5;
        /// Document pointer down/up in capture phase (auto-close).
        const CONTENT_POINTER = 1 << 6;
        /// Document mouse move during a mouse drag.
        const MOUSE_MOVE = 1 << 7;
        /// Document mouse up during a mouse drag.
        const MOUSE_UP = 1 << 8;

        /// Everything attached once at mount.
        const MOUNT = Self::HANDLE_TOUCH.bits()
            | Self::HANDLE_MOUSE.bits()
            | Self::DRAWER_TOUCH.bits()
            | Self::DRAWER_MOUSE.bits()
            | Self::OVERLAY_TAP.bits()
            | Self::ESCAPE_KEY.bits()
            | Self::CONTENT_POINTER.bits();
        /// Transient listeners of a mouse drag.
        const MOUSE_DRAG = Self::MOUSE_MOVE.bits() | Self::MOUSE_UP.bits();
    }
}

/// Tracks which listeners are currently attached.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    active: ListenerSet,
    attach_count: u32,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a group of listeners.
    ///
    /// Refuses (returns false) if any of them is already attached; a
    /// listener must never be attached twice.
    pub fn register(&mut self, set: ListenerSet) -> bool {
        if self.active.intersects(set) {
            tracing::warn!(
                target: LOG_TARGET,
                "refusing to attach {:?}: {:?} already attached",
                set,
                self.active & set
            );
            return false;
        }
        self.active |= set;
        self.attach_count += set.bits().count_ones();
        tracing::trace!(target: LOG_TARGET, "attached listeners {:?}", set);
        true
    }

    /// Detach a group of listeners. Detaching absent listeners is a no-op.
    pub fn deregister(&mut self, set: ListenerSet) {
        if self.active.intersects(set) {
            tracing::trace!(target: LOG_TARGET, "detached listeners {:?}", self.active & set);
        }
        self.active.remove(set);
    }

    /// Whether every listener in `set` is attached.
    pub fn is_registered(&self, set: ListenerSet) -> bool {
        self.active.contains(set)
    }

    pub fn active(&self) -> ListenerSet {
        self.active
    }

    /// Total number of individual attach operations over the registry's life.
    pub fn attach_count(&self) -> u32 {
        self.attach_count
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        self.deregister(ListenerSet::all());
    }
}

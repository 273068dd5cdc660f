//! Mapping from raw drag deltas to drawer transform and overlay opacity.
//!
//! Everything here is pure. The drawer is positioned by a vertical offset in
//! `[-extent, 0]`: `-extent` is fully hidden above the viewport, `0` is fully
//! revealed. Overlay opacity follows the revealed fraction.

/// Which way a drag moves the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragDirection {
    /// Drag started on the handle, moving down reveals the drawer.
    Opening,
    /// Drag started on the open drawer, moving up hides it.
    Closing,
}

/// Visual placement of the drawer and its overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    /// Vertical drawer offset in pixels, always in `[-extent, 0]`.
    pub offset_px: f32,
    /// Overlay opacity in `[0, 1]`.
    pub overlay_opacity: f32,
}

impl DragFrame {
    /// Fully revealed drawer.
    pub const REVEALED: DragFrame = DragFrame {
        offset_px: 0.0,
        overlay_opacity: 1.0,
    };

    /// Fully hidden drawer of the given extent.
    pub fn hidden(extent_px: f32) -> Self {
        Self {
            offset_px: -sanitize_extent(extent_px),
            overlay_opacity: 0.0,
        }
    }

    /// Settled placement for an open or closed drawer.
    pub fn settled(is_open: bool, extent_px: f32) -> Self {
        if is_open { Self::REVEALED } else { Self::hidden(extent_px) }
    }
}

/// Map a drag delta to a frame.
///
/// `delta_px` is `pointer_y - origin_y`: positive while pulling down,
/// negative while pushing up. A zero or negative extent never divides;
/// the drawer is then either fully revealed (positive delta) or hidden.
pub fn map_drag(delta_px: f32, extent_px: f32, direction: DragDirection) -> DragFrame {
    let delta = if delta_px.is_finite() { delta_px } else { 0.0 };
    let extent = sanitize_extent(extent_px);

    if extent <= 0.0 {
        return DragFrame {
            offset_px: 0.0,
            overlay_opacity: if delta > 0.0 { 1.0 } else { 0.0 },
        };
    }

    let visible = match direction {
        DragDirection::Opening => delta.clamp(0.0, extent),
        DragDirection::Closing => (extent + delta).clamp(0.0, extent),
    };

    DragFrame {
        offset_px: visible - extent,
        overlay_opacity: visible / extent,
    }
}

/// Frame for a drag started on the handle.
#[inline]
pub fn opening_frame(delta_px: f32, extent_px: f32) -> DragFrame {
    map_drag(delta_px, extent_px, DragDirection::Opening)
}

/// Frame for a drag started on the open drawer.
#[inline]
pub fn closing_frame(delta_px: f32, extent_px: f32) -> DragFrame {
    map_drag(delta_px, extent_px, DragDirection::Closing)
}

fn sanitize_extent(extent_px: f32) -> f32 {
    if extent_px.is_finite() { extent_px.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_opening_endpoints() {
        let hidden = opening_frame(0.0, 400.0);
        assert!((hidden.offset_px + 400.0).abs() < EPS);
        assert_eq!(hidden.overlay_opacity, 0.0);

        let revealed = opening_frame(400.0, 400.0);
        assert!(revealed.offset_px.abs() < EPS);
        assert!((revealed.overlay_opacity - 1.0).abs() < EPS);
    }

    #[test]
    fn test_opening_clamps_overshoot_and_upward_motion() {
        assert_eq!(opening_frame(1000.0, 400.0), DragFrame::REVEALED);
        assert_eq!(opening_frame(-50.0, 400.0), DragFrame::hidden(400.0));
    }

    #[test]
    fn test_opening_is_monotonic() {
        let extent = 320.0;
        let mut last = f32::NEG_INFINITY;
        for step in 0..=800 {
            let frame = opening_frame(step as f32 * 0.5, extent);
            assert!(frame.offset_px >= -extent && frame.offset_px <= 0.0);
            assert!(frame.offset_px >= last);
            last = frame.offset_px;
        }
    }

    #[test]
    fn test_closing_opacity_range() {
        let extent = 250.0;
        assert_eq!(closing_frame(0.0, extent).overlay_opacity, 1.0);
        assert_eq!(closing_frame(-extent, extent).overlay_opacity, 0.0);
        assert_eq!(closing_frame(-extent * 3.0, extent).overlay_opacity, 0.0);

        for step in 0..=500 {
            let delta = -(step as f32);
            let frame = closing_frame(delta, extent);
            assert!((0.0..=1.0).contains(&frame.overlay_opacity));
            assert!(frame.offset_px >= -extent && frame.offset_px <= 0.0);
        }
    }

    #[test]
    fn test_closing_midpoint() {
        let frame = closing_frame(-100.0, 400.0);
        assert!((frame.offset_px + 100.0).abs() < EPS);
        assert!((frame.overlay_opacity - 0.75).abs() < EPS);
    }

    #[test]
    fn test_zero_extent_does_not_divide() {
        let opened = opening_frame(12.0, 0.0);
        assert_eq!(opened.offset_px, 0.0);
        assert_eq!(opened.overlay_opacity, 1.0);

        let idle = opening_frame(0.0, 0.0);
        assert_eq!(idle.overlay_opacity, 0.0);

        let closing = closing_frame(-12.0, 0.0);
        assert_eq!(closing.overlay_opacity, 0.0);
        assert!(closing.overlay_opacity.is_finite());
    }

    #[test]
    fn test_non_finite_inputs() {
        let frame = opening_frame(f32::NAN, 300.0);
        assert_eq!(frame, DragFrame::hidden(300.0));

        let frame = closing_frame(-10.0, f32::INFINITY);
        assert_eq!(frame.offset_px, 0.0);
        assert_eq!(frame.overlay_opacity, 0.0);
    }

    #[test]
    fn test_settled_frames() {
        assert_eq!(DragFrame::settled(true, 300.0), DragFrame::REVEALED);
        assert_eq!(DragFrame::settled(false, 300.0).offset_px, -300.0);
    }
}

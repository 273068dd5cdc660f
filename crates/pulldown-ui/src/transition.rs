//! Settle transitions for the drawer.
//!
//! While the user drags, the drawer follows the pointer with no easing.
//! Once the drag settles, the drawer glides from wherever it was released to
//! its settled placement over the configured duration.
//!
//! # Example
//!
//! ```
//! use pulldown_ui::transition::{EasingFunction, Transition, TransitionProperty};
//!
//! let mut slide = Transition::new(TransitionProperty::Offset)
//!     .from(-300.0)
//!     .to(0.0)
//!     .duration(0.3)
//!     .easing(EasingFunction::STANDARD);
//!
//! slide.update(0.3);
//! assert_eq!(slide.value(), 0.0);
//! ```

use ahash::HashMap;

/// Drawer properties that transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionProperty {
    /// Vertical drawer offset in pixels.
    Offset,
    /// Overlay opacity (0.0 to 1.0).
    Opacity,
}

/// Easing functions for transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Linear interpolation
    Linear,
    /// Ease out (slow end)
    EaseOut,
    /// Ease in and out (slow start and end)
    EaseInOut,
    /// CSS-style cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1)
    CubicBezier(f32, f32, f32, f32),
}

impl EasingFunction {
    /// Standard deceleration curve used for the drawer slide.
    pub const STANDARD: EasingFunction = EasingFunction::CubicBezier(0.4, 0.0, 0.2, 1.0);

    /// Apply the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOut => t * (2.0 - t),
            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            EasingFunction::CubicBezier(x1, y1, x2, y2) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_bezier_parameter(t, x1, x2);
                bezier_component(s, y1, y2)
            }
        }
    }
}

/// One coordinate of a unit cubic bezier at parameter `s`.
fn bezier_component(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`.
///
/// Newton steps first; bisection when the slope is too flat.
fn solve_bezier_parameter(x: f32, x1: f32, x2: f32) -> f32 {
    let mut s = x;
    for _ in 0..8 {
        let err = bezier_component(s, x1, x2) - x;
        if err.abs() < 1e-5 {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let value = bezier_component(s, x1, x2);
        if (value - x).abs() < 1e-5 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    s
}

/// Transition state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    Running,
    Completed,
}

/// A transition for a single property.
#[derive(Debug, Clone)]
pub struct Transition {
    property: TransitionProperty,
    from: f32,
    to: f32,
    /// Duration in seconds
    duration: f32,
    /// Elapsed time in seconds
    elapsed: f32,
    easing: EasingFunction,
    state: TransitionState,
}

impl Transition {
    /// Create a new transition.
    pub fn new(property: TransitionProperty) -> Self {
        Self {
            property,
            from: 0.0,
            to: 1.0,
            duration: 0.3,
            elapsed: 0.0,
            easing: EasingFunction::STANDARD,
            state: TransitionState::Running,
        }
    }

    /// Set the start value.
    pub fn from(mut self, value: f32) -> Self {
        self.from = value;
        self
    }

    /// Set the end value.
    pub fn to(mut self, value: f32) -> Self {
        self.to = value;
        self
    }

    /// Set the duration in seconds.
    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn property(&self) -> TransitionProperty {
        self.property
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Get the current value.
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Advance by `delta_time` seconds.
    ///
    /// Returns true while the transition is still running.
    pub fn update(&mut self, delta_time: f32) -> bool {
        if self.state == TransitionState::Completed {
            return false;
        }

        self.elapsed += delta_time.max(0.0);
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.state = TransitionState::Completed;
            return false;
        }
        true
    }
}

/// Running transitions of the drawer, one per property.
#[derive(Debug, Clone, Default)]
pub struct Transitions {
    transitions: HashMap<TransitionProperty, Transition>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or replace) the transition for its property.
    pub fn start(&mut self, transition: Transition) {
        self.transitions.insert(transition.property(), transition);
    }

    pub fn get(&self, property: TransitionProperty) -> Option<&Transition> {
        self.transitions.get(&property)
    }

    /// Current value of a property, if it is transitioning.
    pub fn value(&self, property: TransitionProperty) -> Option<f32> {
        self.get(property).map(Transition::value)
    }

    /// Advance all transitions, dropping finished ones.
    ///
    /// Returns true if any transition is still running.
    pub fn update(&mut self, delta_time: f32) -> bool {
        let mut any_running = false;

        self.transitions.retain(|_, transition| {
            let running = transition.update(delta_time);
            any_running |= running;
            running
        });

        any_running
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Stop everything, e.g. when a new drag grabs the drawer mid-flight.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

//! Opaque host state shared with every content panel.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Host-provided state handed to content panels.
///
/// The value is reference counted so the card, the lifecycle manager and
/// every panel can hold the latest state without copying it. Identity is
/// what matters for change detection: delivering the same handle twice is a
/// no-op, delivering an equal-but-new value is a new update.
#[derive(Clone)]
pub struct SharedState(Rc<Value>);

impl SharedState {
    /// Wrap a host value.
    pub fn new(value: Value) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the underlying value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Whether both handles point at the same delivery.
    pub fn ptr_eq(&self, other: &SharedState) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Value> for SharedState {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for SharedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Top-level shape only.
        match self.0.as_ref() {
            Value::Object(map) => write!(f, "SharedState({} keys)", map.len()),
            other => write!(f, "SharedState({})", other),
        }
    }
}

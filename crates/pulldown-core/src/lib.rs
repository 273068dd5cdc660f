//! Pulldown Core
//!
//! This crate contains the pieces shared by every other pulldown crate:
//! logging bootstrap and the opaque host state handle.

pub mod logging;
pub mod state;

pub use logging::LOG_TARGET;
pub use state::SharedState;

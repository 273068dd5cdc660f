//! Test utilities for the pull-down card.
//!
//! Mocks for the host services a card depends on, so card behavior can be
//! tested without a real host.
//!
//! - [`MockPanelFactory`] - builds recording panels and can be told to fail
//! - [`Gate`] - holds panel construction until a test releases it
//! - [`MockDialogHost`] - panel editing dialog with a canned answer
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Instant;
//!
//! use pulldown::PullDownCard;
//! use pulldown_core::SharedState;
//! use pulldown_test_utils::MockPanelFactory;
//! use serde_json::json;
//!
//! let factory = MockPanelFactory::new().fail("B");
//! let mut card = PullDownCard::new(Rc::new(factory.clone()));
//! card.set_config(&json!({
//!     "main_card": { "name": "Main" },
//!     "drawer_cards": [{ "name": "A" }, { "name": "B" }]
//! }))
//! .unwrap();
//! card.set_shared_state(SharedState::new(json!({ "light": "on" })));
//! card.pump(Instant::now());
//!
//! assert_eq!(factory.created(), vec!["Main", "A", "B"]);
//! assert_eq!(factory.delivery_count("A"), 1);
//! assert_eq!(factory.delivery_count("B"), 0);
//! ```
//!
//! # Interior Mutability
//!
//! Mocks record through `&self` (the traits they implement take `&self`),
//! so their logs sit behind `parking_lot::Mutex` and are shared with clones
//! handed to the code under test.

pub mod gate;
pub mod mock_dialog;
pub mod mock_factory;

pub use gate::{Gate, GateWait};
pub use mock_dialog::MockDialogHost;
pub use mock_factory::{MockPanelFactory, RecordingPanel, panel_label};

//! Mock panel factory.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use pulldown::{PanelDescriptor, PanelError, PanelFactory, PanelFuture};
use pulldown_core::SharedState;
use pulldown_ui::{Panel, SharedStateReceiver, SizeReporter};
use serde_json::Value;

use crate::gate::Gate;

/// Test name of a descriptor: its `name`, else its `type`, else `"?"`.
pub fn panel_label(descriptor: &PanelDescriptor) -> String {
    let value = descriptor.value();
    value
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| descriptor.kind())
        .unwrap_or("?")
        .to_string()
}

#[derive(Debug, Default)]
struct FactoryLog {
    failing: Vec<String>,
    stateless: Vec<String>,
    sizes: HashMap<String, u32>,
    created: Vec<String>,
    deliveries: HashMap<String, Vec<SharedState>>,
}

/// Factory building [`RecordingPanel`]s.
///
/// Clones share one log, so a test can keep a clone to inspect after
/// handing the factory to a card.
#[derive(Debug, Clone, Default)]
pub struct MockPanelFactory {
    log: Arc<Mutex<FactoryLog>>,
    gate: Option<Gate>,
}

impl MockPanelFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construction of panels labeled `label` fails.
    pub fn fail(self, label: &str) -> Self {
        self.log.lock().failing.push(label.to_string());
        self
    }

    /// Panels labeled `label` do not accept shared state.
    pub fn stateless(self, label: &str) -> Self {
        self.log.lock().stateless.push(label.to_string());
        self
    }

    /// Panels labeled `label` report `size`.
    pub fn with_size(self, label: &str, size: u32) -> Self {
        self.log.lock().sizes.insert(label.to_string(), size);
        self
    }

    /// Every construction waits for `gate` before resolving.
    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Labels of every `create` call, in call order.
    pub fn created(&self) -> Vec<String> {
        self.log.lock().created.clone()
    }

    pub fn create_count(&self) -> usize {
        self.log.lock().created.len()
    }

    /// Shared state values delivered to the panel labeled `label`.
    pub fn states_for(&self, label: &str) -> Vec<Value> {
        self.log
            .lock()
            .deliveries
            .get(label)
            .map(|states| states.iter().map(|s| s.value().clone()).collect())
            .unwrap_or_default()
    }

    pub fn delivery_count(&self, label: &str) -> usize {
        self.log.lock().deliveries.get(label).map_or(0, Vec::len)
    }

    /// Whether the last delivery to `label` was exactly `state`.
    pub fn last_delivery_is(&self, label: &str, state: &SharedState) -> bool {
        self.log
            .lock()
            .deliveries
            .get(label)
            .and_then(|states| states.last())
            .is_some_and(|last| last.ptr_eq(state))
    }
}

impl PanelFactory for MockPanelFactory {
    fn create(&self, descriptor: PanelDescriptor) -> PanelFuture {
        let label = panel_label(&descriptor);

        let (fail, panel) = {
            let mut log = self.log.lock();
            log.created.push(label.clone());
            let panel = RecordingPanel {
                label: label.clone(),
                accepts_state: !log.stateless.contains(&label),
                size: log.sizes.get(&label).copied(),
                log: self.log.clone(),
            };
            (log.failing.contains(&label), panel)
        };
        let gate = self.gate.clone();

        Box::pin(async move {
            if let Some(gate) = gate {
                gate.wait().await;
            }
            if fail {
                return Err(PanelError::build(format!("{label} failed to load")));
            }
            Ok(Box::new(panel) as Box<dyn Panel>)
        })
    }
}

/// Panel that records the shared states it receives into its factory's log.
#[derive(Debug)]
pub struct RecordingPanel {
    label: String,
    accepts_state: bool,
    size: Option<u32>,
    log: Arc<Mutex<FactoryLog>>,
}

impl Panel for RecordingPanel {
    fn debug_name(&self) -> &str {
        &self.label
    }

    fn as_state_receiver_mut(&mut self) -> Option<&mut dyn SharedStateReceiver> {
        if self.accepts_state { Some(self) } else { None }
    }

    fn as_size_reporter(&self) -> Option<&dyn SizeReporter> {
        if self.size.is_some() { Some(self) } else { None }
    }
}

impl SharedStateReceiver for RecordingPanel {
    fn set_shared_state(&mut self, state: &SharedState) {
        self.log
            .lock()
            .deliveries
            .entry(self.label.clone())
            .or_default()
            .push(state.clone());
    }
}

impl SizeReporter for RecordingPanel {
    fn measured_size(&self) -> u32 {
        self.size.unwrap_or_default()
    }
}

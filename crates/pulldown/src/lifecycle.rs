//! Panel lifecycle: one-shot asynchronous build and shared state fan-out.

use std::rc::Rc;

use futures_lite::future::BoxedLocal;
use pulldown_core::{LOG_TARGET, SharedState};
use pulldown_ui::{DEFAULT_PANEL_SIZE, ErrorPanel, Panel};

use crate::config::{CardConfig, PanelDescriptor};
use crate::error::PanelError;

/// Future resolving to a freshly built panel.
pub type PanelFuture = BoxedLocal<Result<Box<dyn Panel>, PanelError>>;

/// Host-provided panel constructor.
pub trait PanelFactory {
    /// Build the panel described by `descriptor`.
    fn create(&self, descriptor: PanelDescriptor) -> PanelFuture;
}

/// One built panel position.
pub enum PanelSlot {
    Live(Box<dyn Panel>),
    /// The factory failed; the error panel shows why.
    Placeholder(ErrorPanel),
}

impl PanelSlot {
    pub fn is_live(&self) -> bool {
        matches!(self, PanelSlot::Live(_))
    }

    pub fn panel(&self) -> Option<&dyn Panel> {
        match self {
            PanelSlot::Live(panel) => Some(panel.as_ref()),
            PanelSlot::Placeholder(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&ErrorPanel> {
        match self {
            PanelSlot::Live(_) => None,
            PanelSlot::Placeholder(error) => Some(error),
        }
    }

    fn deliver(&mut self, state: &SharedState) {
        if let PanelSlot::Live(panel) = self {
            if let Some(receiver) = panel.as_state_receiver_mut() {
                receiver.set_shared_state(state);
            }
        }
    }
}

impl std::fmt::Debug for PanelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelSlot::Live(panel) => f.debug_tuple("Live").field(&panel.debug_name()).finish(),
            PanelSlot::Placeholder(error) => f.debug_tuple("Placeholder").field(&error.message()).finish(),
        }
    }
}

/// Output of a build: the main slot and one slot per drawer descriptor.
#[derive(Debug)]
pub struct BuiltPanels {
    pub main: PanelSlot,
    pub drawer: Vec<PanelSlot>,
    /// State the panels were built with.
    pub initial_state: SharedState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Idle,
    Building,
    Built,
}

/// Owns the panels of one card.
pub struct PanelLifecycle {
    factory: Rc<dyn PanelFactory>,
    phase: BuildPhase,
    main: Option<PanelSlot>,
    drawer: Vec<PanelSlot>,
    /// Latest shared state seen; delivered once the build completes.
    latest: Option<SharedState>,
    delivered: Option<SharedState>,
}

impl PanelLifecycle {
    pub fn new(factory: Rc<dyn PanelFactory>) -> Self {
        Self {
            factory,
            phase: BuildPhase::Idle,
            main: None,
            drawer: Vec::new(),
            latest: None,
            delivered: None,
        }
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub fn is_built(&self) -> bool {
        self.phase == BuildPhase::Built
    }

    /// Start the build.
    ///
    /// Returns the construction future, or `None` if a build is already in
    /// flight or done. The future owns everything it needs, so the caller
    /// may keep feeding state into the lifecycle while it runs.
    pub fn begin_build(
        &mut self,
        config: &CardConfig,
        state: &SharedState,
    ) -> Option<BoxedLocal<BuiltPanels>> {
        if self.phase != BuildPhase::Idle {
            tracing::trace!(target: LOG_TARGET, "build already {:?}, ignoring", self.phase);
            return None;
        }
        self.phase = BuildPhase::Building;
        if self.latest.is_none() {
            self.latest = Some(state.clone());
        }

        tracing::debug!(
            target: LOG_TARGET,
            "building {} panels",
            config.panel_count()
        );

        let factory = self.factory.clone();
        let main = config.main_card.clone();
        let drawer = config.drawer_cards.clone();
        let state = state.clone();

        Some(Box::pin(async move {
            let main = build_slot(factory.as_ref(), main, &state, "main").await;
            let mut slots = Vec::with_capacity(drawer.len());
            for descriptor in drawer {
                slots.push(build_slot(factory.as_ref(), descriptor, &state, "drawer").await);
            }
            BuiltPanels {
                main,
                drawer: slots,
                initial_state: state,
            }
        }))
    }

    /// Install the result of a build started with [`begin_build`].
    ///
    /// Applies the latest state if it changed while the build ran. Returns
    /// false if no build was in flight.
    ///
    /// [`begin_build`]: PanelLifecycle::begin_build
    pub fn finish_build(&mut self, built: BuiltPanels) -> bool {
        if self.phase != BuildPhase::Building {
            tracing::warn!(target: LOG_TARGET, "discarding build result, lifecycle is {:?}", self.phase);
            return false;
        }

        let BuiltPanels {
            main,
            drawer,
            initial_state,
        } = built;
        self.main = Some(main);
        self.drawer = drawer;
        self.phase = BuildPhase::Built;
        self.delivered = Some(initial_state);

        let failed = self.slots().filter(|slot| !slot.is_live()).count();
        tracing::debug!(
            target: LOG_TARGET,
            "build complete ({} drawer panels, {} failed)",
            self.drawer.len(),
            failed
        );

        if let Some(latest) = self.latest.clone() {
            self.deliver(&latest);
        }
        true
    }

    /// Build and install in one go.
    pub async fn build(&mut self, config: &CardConfig, state: &SharedState) -> bool {
        match self.begin_build(config, state) {
            Some(future) => {
                let built = future.await;
                self.finish_build(built)
            }
            None => false,
        }
    }

    /// Hand a new shared state to every live panel.
    ///
    /// Before the build completes only the latest value is kept.
    pub fn propagate_state(&mut self, state: &SharedState) {
        self.latest = Some(state.clone());
        if self.is_built() {
            self.deliver(state);
        }
    }

    fn deliver(&mut self, state: &SharedState) {
        if self
            .delivered
            .as_ref()
            .is_some_and(|delivered| delivered.ptr_eq(state))
        {
            return;
        }
        if let Some(main) = self.main.as_mut() {
            main.deliver(state);
        }
        for slot in &mut self.drawer {
            slot.deliver(state);
        }
        self.delivered = Some(state.clone());
    }

    /// Layout size: the main panel's hint, or [`DEFAULT_PANEL_SIZE`].
    pub fn reported_size(&self) -> u32 {
        self.main
            .as_ref()
            .and_then(PanelSlot::panel)
            .and_then(|panel| panel.as_size_reporter())
            .map(|reporter| reporter.measured_size())
            .unwrap_or(DEFAULT_PANEL_SIZE)
    }

    pub fn main_panel(&self) -> Option<&PanelSlot> {
        self.main.as_ref()
    }

    pub fn drawer_panels(&self) -> &[PanelSlot] {
        &self.drawer
    }

    fn slots(&self) -> impl Iterator<Item = &PanelSlot> {
        self.main.iter().chain(self.drawer.iter())
    }
}

async fn build_slot(
    factory: &dyn PanelFactory,
    descriptor: PanelDescriptor,
    state: &SharedState,
    role: &str,
) -> PanelSlot {
    match factory.create(descriptor).await {
        Ok(mut panel) => {
            if let Some(receiver) = panel.as_state_receiver_mut() {
                receiver.set_shared_state(state);
            }
            PanelSlot::Live(panel)
        }
        Err(err) => {
            tracing::error!(target: LOG_TARGET, "Error creating {} card: {}", role, err);
            PanelSlot::Placeholder(ErrorPanel::new(err.to_string()))
        }
    }
}

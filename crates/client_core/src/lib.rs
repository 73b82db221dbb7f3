use std::sync::Arc;

use tokio::{sync::broadcast, task::JoinHandle};
use tracing::info;

pub mod clock;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod polling;
pub mod reconciler;
pub mod render;
pub mod toggle;
pub mod transport;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dispatcher::{CommandDispatcher, TogglePolicy};
pub use error::{DashboardError, ErrorKind};
pub use events::{ClientEvent, Diagnostic, DiagnosticSource};
pub use polling::{PollingHandle, PollingTask, POLL_INTERVAL};
pub use reconciler::{ReconcilePolicy, StatusReconciler, TickOutcome};
pub use render::DashboardRender;
pub use toggle::DetectionToggle;
pub use transport::{Endpoints, GateControlPlane, HttpControlPlane};
pub use view::{DashboardView, ElementId, ElementState, MemoryView};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub initially_running: bool,
    pub toggle: TogglePolicy,
    pub reconcile: ReconcilePolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            initially_running: true,
            toggle: TogglePolicy::default(),
            reconcile: ReconcilePolicy::default(),
        }
    }
}

/// The operator dashboard: one toggle command plus a status poll, both
/// rendering into the same view.
pub struct DashboardClient {
    endpoints: Endpoints,
    toggle: Arc<DetectionToggle>,
    dispatcher: CommandDispatcher,
    reconciler: Arc<StatusReconciler>,
    events: broadcast::Sender<ClientEvent>,
}

impl DashboardClient {
    pub fn new(
        server_url: &str,
        view: Arc<dyn DashboardView>,
        options: ClientOptions,
    ) -> Result<Self, DashboardError> {
        let endpoints = Endpoints::new(server_url)?;
        let control_plane = Arc::new(HttpControlPlane::new(endpoints.clone()));
        Ok(Self::new_with_dependencies(
            endpoints,
            control_plane,
            view,
            Arc::new(SystemClock),
            options,
        ))
    }

    pub fn new_with_dependencies(
        endpoints: Endpoints,
        control_plane: Arc<dyn GateControlPlane>,
        view: Arc<dyn DashboardView>,
        clock: Arc<dyn Clock>,
        options: ClientOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let toggle = Arc::new(DetectionToggle::new(options.initially_running));
        let dispatcher = CommandDispatcher::new(
            Arc::clone(&control_plane),
            Arc::clone(&toggle),
            Arc::clone(&view),
            events.clone(),
            options.toggle,
        );
        let reconciler = Arc::new(StatusReconciler::new(
            control_plane,
            view,
            clock,
            endpoints.base().clone(),
            events.clone(),
            options.reconcile,
        ));
        Self {
            endpoints,
            toggle,
            dispatcher,
            reconciler,
            events,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn detection_toggle(&self) -> &Arc<DetectionToggle> {
        &self.toggle
    }

    /// Writes the button label for the current toggle state.
    pub fn render_initial(&self) {
        self.dispatcher.render_label();
    }

    pub fn toggle_detection(&self) -> JoinHandle<()> {
        self.dispatcher.toggle_detection()
    }

    pub async fn tick(&self) -> TickOutcome {
        self.reconciler.tick().await
    }

    pub fn start_polling(&self) -> PollingHandle {
        info!(endpoint = %self.endpoints.data(), "dashboard: polling status");
        PollingTask::start(Arc::clone(&self.reconciler), POLL_INTERVAL)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

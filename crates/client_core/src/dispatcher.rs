use std::sync::Arc;

use shared::protocol::ToggleDetectionRequest;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, error, info, warn};

use crate::{
    events::{ClientEvent, Diagnostic, DiagnosticSource},
    toggle::{button_label, DetectionToggle},
    transport::GateControlPlane,
    view::{DashboardView, ElementId},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TogglePolicy {
    /// Revert the optimistic flip when the server cannot be reached. Off by
    /// default: the operator's click stands even if the request is lost.
    pub reconcile_on_failure: bool,
}

#[derive(Clone)]
pub struct CommandDispatcher {
    control_plane: Arc<dyn GateControlPlane>,
    toggle: Arc<DetectionToggle>,
    view: Arc<dyn DashboardView>,
    events: broadcast::Sender<ClientEvent>,
    policy: TogglePolicy,
}

impl CommandDispatcher {
    pub fn new(
        control_plane: Arc<dyn GateControlPlane>,
        toggle: Arc<DetectionToggle>,
        view: Arc<dyn DashboardView>,
        events: broadcast::Sender<ClientEvent>,
        policy: TogglePolicy,
    ) -> Self {
        Self {
            control_plane,
            toggle,
            view,
            events,
            policy,
        }
    }

    pub fn render_label(&self) {
        self.view.set_text(
            ElementId::ToggleDetection,
            button_label(self.toggle.is_running()),
        );
    }

    /// Flips local state and the button label right away, then sends the new
    /// state in the background. The returned handle never needs awaiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn toggle_detection(&self) -> JoinHandle<()> {
        let (running, generation) = self.toggle.flip();
        self.view
            .set_text(ElementId::ToggleDetection, button_label(running));
        info!(running, "detection: toggle requested");
        let _ = self.events.send(ClientEvent::ToggleSent { running });

        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.deliver(running, generation).await })
    }

    async fn deliver(&self, running: bool, generation: u64) {
        match self
            .control_plane
            .send_toggle(ToggleDetectionRequest::new(running))
            .await
        {
            Ok(response) => {
                debug!(
                    running,
                    server_status = response.status.as_deref().unwrap_or_default(),
                    "detection: toggle acknowledged"
                );
                let _ = self.events.send(ClientEvent::ToggleAcknowledged {
                    running,
                    server_status: response.status,
                });
            }
            Err(err) => {
                error!(running, error = %err, "detection: toggle request failed");
                let _ = self.events.send(ClientEvent::Diagnostic(Diagnostic::from_error(
                    DiagnosticSource::Toggle,
                    &err,
                )));
                if !self.policy.reconcile_on_failure {
                    return;
                }
                let Some(restored) = self.toggle.revert_if_current(generation) else {
                    debug!(running, "detection: newer toggle pending, not reverting");
                    return;
                };
                self.view
                    .set_text(ElementId::ToggleDetection, button_label(restored));
                warn!(
                    running = restored,
                    "detection: reverted optimistic toggle after failed request"
                );
                let _ = self
                    .events
                    .send(ClientEvent::ToggleReverted { running: restored });
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;

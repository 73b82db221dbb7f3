use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};

use shared::protocol::StatusSnapshot;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use url::Url;

use crate::{
    clock::Clock,
    error::{DashboardError, ErrorKind},
    events::{ClientEvent, Diagnostic, DiagnosticSource},
    render::DashboardRender,
    transport::GateControlPlane,
    view::DashboardView,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcilePolicy {
    /// Drop a response when a later tick has already been rendered. Off by
    /// default, in which case overlapping ticks are last-write-wins.
    pub discard_stale_responses: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Applied { sequence: u64 },
    Discarded { sequence: u64, latest_applied: u64 },
    Skipped { sequence: u64, kind: ErrorKind },
}

pub struct StatusReconciler {
    control_plane: Arc<dyn GateControlPlane>,
    view: Arc<dyn DashboardView>,
    clock: Arc<dyn Clock>,
    base_url: Url,
    events: broadcast::Sender<ClientEvent>,
    policy: ReconcilePolicy,
    issued: AtomicU64,
    latest_applied: Mutex<u64>,
}

impl StatusReconciler {
    pub fn new(
        control_plane: Arc<dyn GateControlPlane>,
        view: Arc<dyn DashboardView>,
        clock: Arc<dyn Clock>,
        base_url: Url,
        events: broadcast::Sender<ClientEvent>,
        policy: ReconcilePolicy,
    ) -> Self {
        Self {
            control_plane,
            view,
            clock,
            base_url,
            events,
            policy,
            issued: AtomicU64::new(0),
            latest_applied: Mutex::new(0),
        }
    }

    pub async fn fetch_snapshot(&self) -> Result<StatusSnapshot, DashboardError> {
        self.control_plane.fetch_status().await
    }

    /// One poll: fetch, then render. Failures leave the view untouched and
    /// only show up in the log and on the event channel.
    pub async fn tick(&self) -> TickOutcome {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        match self.fetch_snapshot().await {
            Ok(snapshot) => self.apply(sequence, &snapshot),
            Err(err) => {
                warn!(sequence, kind = ?err.kind(), error = %err, "poll: tick skipped");
                let kind = err.kind();
                let _ = self.events.send(ClientEvent::Diagnostic(Diagnostic::from_error(
                    DiagnosticSource::Poll,
                    &err,
                )));
                TickOutcome::Skipped { sequence, kind }
            }
        }
    }

    pub fn apply(&self, sequence: u64, snapshot: &StatusSnapshot) -> TickOutcome {
        let mut latest_applied = self
            .latest_applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.policy.discard_stale_responses && sequence < *latest_applied {
            debug!(
                sequence,
                latest_applied = *latest_applied,
                "poll: discarded out-of-order snapshot"
            );
            let _ = self.events.send(ClientEvent::StaleSnapshotDiscarded {
                sequence,
                latest_applied: *latest_applied,
            });
            return TickOutcome::Discarded {
                sequence,
                latest_applied: *latest_applied,
            };
        }

        let render =
            DashboardRender::from_snapshot(snapshot, &self.base_url, self.clock.now_millis());
        render.apply(self.view.as_ref());
        *latest_applied = (*latest_applied).max(sequence);

        debug!(
            sequence,
            status = %render.status_text,
            plate = render.plate_label(),
            gate = %render.gate_text,
            server_running = ?snapshot.is_running,
            "poll: snapshot applied"
        );
        let _ = self.events.send(ClientEvent::SnapshotApplied { sequence });
        TickOutcome::Applied { sequence }
    }
}

#[cfg(test)]
#[path = "tests/reconciler_tests.rs"]
mod tests;
